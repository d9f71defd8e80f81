use anyhow::{Context, Result, anyhow};
use clap::{Parser, ValueEnum};
use grid_snake::game::{EnemyPlacement, GameConfig};
use grid_snake::modes::HumanMode;
use log::{LevelFilter, info};
use simplelog::{Config, WriteLogger};
use std::fs::File;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "grid_snake")]
#[command(version, about = "Snake on a fixed grid, dodging a growing crowd of enemies")]
struct Cli {
    /// JSON file with a game configuration; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Side of the square grid
    #[arg(long)]
    grid_size: Option<usize>,

    /// Initial snake length
    #[arg(long)]
    start_length: Option<usize>,

    /// Milliseconds between two ticks
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Seed for food and enemy placement
    #[arg(long)]
    seed: Option<u64>,

    /// Rule keeping enemies out of the snake's lane
    #[arg(long, value_enum)]
    enemy_placement: Option<Placement>,

    /// Where log output goes, the terminal being taken by the game
    #[arg(long, default_value = "grid_snake.log")]
    log_file: PathBuf,

    /// Log debug messages
    #[arg(long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Placement {
    /// Guard both the head's row and column
    Legacy,
    /// Guard only the lane matching the travel axis
    DirectionAware,
}

impl From<Placement> for EnemyPlacement {
    fn from(placement: Placement) -> Self {
        match placement {
            Placement::Legacy => EnemyPlacement::Legacy,
            Placement::DirectionAware => EnemyPlacement::DirectionAware,
        }
    }
}

impl Cli {
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::from_json_file(path)?,
            None => GameConfig::default(),
        };

        if let Some(grid_size) = self.grid_size {
            config.grid_size = grid_size;
        }
        if let Some(start_length) = self.start_length {
            config.start_length = start_length;
        }
        if let Some(tick_ms) = self.tick_ms {
            config.tick_interval_ms = tick_ms;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(placement) = self.enemy_placement {
            config.enemy_placement = placement.into();
        }

        config
            .validate()
            .map_err(|msg| anyhow!("Invalid game configuration: {}", msg))?;

        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let log_file = File::create(&cli.log_file)
        .with_context(|| format!("Failed to create log file {}", cli.log_file.display()))?;
    WriteLogger::init(level, Config::default(), log_file).context("Failed to initialize logger")?;

    let config = cli.game_config()?;
    info!("Starting grid_snake with {:?}", config);

    let mut human_mode = HumanMode::new(config);
    human_mode.run().await?;

    Ok(())
}

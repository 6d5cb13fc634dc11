use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use xenzia::audio::NullAudio;
use xenzia::chain::SimulatedChain;
use xenzia::game::GameConfig;
use xenzia::modes::PlayMode;

#[derive(Parser)]
#[command(name = "xenzia")]
#[command(version, about = "Grid-based snake arcade game with an on-chain leaderboard")]
struct Cli {
    /// Field width in grid cells
    #[arg(long, default_value = "40")]
    width: i32,

    /// Field height in grid cells
    #[arg(long, default_value = "30")]
    height: i32,

    /// Optional JSON config file; CLI flags override its field size
    #[arg(long)]
    config: Option<PathBuf>,

    /// Fixed RNG seed for reproducible food and hazard placement
    #[arg(long)]
    seed: Option<u64>,

    /// Treat the wallet as connected and submit scores on game over
    #[arg(long)]
    wallet: bool,

    /// Player id used for submissions and leaderboard highlighting
    #[arg(long, default_value = "0xA11CE000000000000000000000000000000000FF")]
    player: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => GameConfig::from_file(path)?,
        None => GameConfig::default(),
    };
    config.field_width = cli.width * config.grid_size;
    config.field_height = cli.height * config.grid_size;
    config.validate()?;

    let chain = Arc::new(SimulatedChain::new(cli.wallet, cli.player.clone()).with_sample_board());

    let mut play_mode = PlayMode::new(config, cli.seed, chain, cli.player, NullAudio);
    play_mode.run().await?;

    Ok(())
}

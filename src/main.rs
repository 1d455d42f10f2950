use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use hecs::World;
use tracing_subscriber::EnvFilter;

use ledgewalk::app::GameApp;
use ledgewalk::config::GameConfig;
use ledgewalk::fsm::StateId;
use ledgewalk::scene::test_scene::{demo_script, load_test_scene};

#[derive(Parser)]
#[command(name = "ledgewalk", about = "Headless side-scroller behavior demo")]
struct Args {
    /// Simulated seconds to run
    #[arg(long, default_value_t = 10.0)]
    seconds: f32,

    /// Logic frames per simulated second
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Seed for AI dwell-time sampling
    #[arg(long, default_value_t = 7)]
    seed: u64,

    /// JSON tuning file; omitted fields keep their defaults
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ledgewalk=info")))
        .init();

    let args = Args::parse();
    anyhow::ensure!(args.fps > 0, "--fps must be at least 1");

    let config = match &args.config {
        Some(path) => GameConfig::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => GameConfig::default(),
    };

    let mut world = World::new();
    let scene = load_test_scene(&mut world, &config, args.seed).context("spawning test scene")?;
    let enemy = scene.enemy;
    let mut app = GameApp::new(world, scene.level, scene.player, config, 1.0 / args.fps as f32);

    let summary = app.run(&mut demo_script(), args.seconds);

    tracing::info!(
        frames = summary.frames,
        physics_steps = summary.physics_steps,
        player = summary.player_state.map(StateId::name),
        enemy = app.enemy_state(enemy).map(StateId::name),
        strikes = summary.strikes,
        "run finished"
    );
    Ok(())
}

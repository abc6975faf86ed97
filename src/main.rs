/// Entry point and agent loop.

mod config;
mod domain;
mod error;
mod net;
mod plan;
mod search;
mod sim;
mod ui;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use config::AgentConfig;
use error::{AgentError, AgentResult};
use net::transport::Transport;
use sim::agent::Agent;
use ui::renderer::Renderer;

const PORT_RANGE: std::ops::RangeInclusive<u32> = 1025..=65535;

#[derive(Parser, Debug)]
#[command(name = "islerunner", version, about = "Treasure-hunting agent for the island world server")]
struct Cli {
    /// World server port
    #[arg(short, long)]
    port: Option<u32>,

    /// World server host
    #[arg(long)]
    host: Option<String>,

    /// Path to config.toml (default: next to the executable, then CWD)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the known map after every tick
    #[arg(long)]
    render: bool,
}

fn validate_port(port: u32) -> AgentResult<u16> {
    if !PORT_RANGE.contains(&port) {
        return Err(AgentError::InvalidPort { port });
    }
    u16::try_from(port).map_err(|_| AgentError::InvalidPort { port })
}

fn init_logging(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli, config: AgentConfig) -> AgentResult<()> {
    let port = validate_port(cli.port.unwrap_or(u32::from(config.connection.port)))?;
    let host = cli.host.unwrap_or(config.connection.host);
    let render = cli.render || config.render_map;

    let mut transport = Transport::connect(&host, port)?;
    let mut agent = Agent::new(config.search);
    let mut renderer = render.then(Renderer::new);

    let mut tick: u64 = 0;
    while let Some(view) = transport.read_view()? {
        tick += 1;
        let (action, _events) = agent.tick(&view);
        if let Some(r) = renderer.as_mut() {
            r.render(&agent.map, &agent.player, tick)?;
        }
        transport.send(action)?;
    }

    info!(
        tick,
        treasure = agent.player.inventory.has_treasure,
        pos = %agent.player.pos,
        "server closed the game"
    );
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let (config, fallbacks) = match AgentConfig::load(cli.config.as_deref()) {
        Ok(loaded) => loaded,
        Err(e) => {
            init_logging("info");
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };
    init_logging(&config.log_filter);
    for fallback in &fallbacks {
        warn!("{fallback}");
    }

    match run(cli, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

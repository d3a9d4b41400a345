use anyhow::Result;
use clap::Parser;
use startup_layers::cli::{self, Cli};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli::load_config(&cli)?;

    // CLI --log-level flag takes highest precedence, then RUST_LOG, then config.
    startup_layers::debug::init_log_bridge(
        cli.log_level.map(|level| level.to_level_filter()),
        config.log_level.to_level_filter(),
    );
    log::info!("Running startup-layers {}", startup_layers::VERSION);

    let result = cli::run(cli, &config);
    if let Err(ref e) = result {
        log::error!("startup-layers failed: {e:#}");
    }
    result
}

use anyhow::Result;
use clap::CommandFactory;

use volley_bench::bench;
use volley_bench::config::{Args, RunConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse configuration from environment variables and CLI arguments
    let config = match RunConfig::from_env_and_args() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            eprintln!();
            eprintln!("{}", Args::command().render_help());
            std::process::exit(1);
        }
    };

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(format!("volley_wire={}", config.log_level).parse()?)
                .add_directive(format!("volley_bench={}", config.log_level).parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let metrics = bench::run(&config).await?;

    metrics.print_summary();

    Ok(())
}

use anyhow::{Context, Result};
use band_screener::{
    cli::{Cli, Commands},
    config::ScreenConfig,
    screener::Screener,
    symbols::load_symbols,
};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = ScreenConfig::load(cli.config.as_deref()).context("loading configuration")?;

    match cli.command {
        Commands::Symbols { symbols } => {
            let list = load_symbols(&symbols)
                .with_context(|| format!("reading symbols from {}", symbols.display()))?;
            for symbol in &list {
                println!("{}", config.qualify(symbol));
            }
            eprintln!("{} symbols", list.len());
        }

        Commands::Analyze(args) => {
            args.apply(&mut config);
            config.validate()?;

            let symbols = load_symbols(&args.symbols)
                .with_context(|| format!("reading symbols from {}", args.symbols.display()))?;
            info!(count = symbols.len(), file = %args.symbols.display(), "symbols loaded");

            let screener = Screener::from_config(config)?;
            let summary = screener.run(&symbols).await?;

            // Paths on stdout, summary on stderr, so the output can be piped.
            for (_, path) in summary.rendered() {
                println!("{}", path.display());
            }
            eprintln!("SUMMARY: {summary}");
        }
    }

    Ok(())
}

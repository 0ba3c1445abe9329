use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::{LookbackPeriod, MomentumWindow, ScreenConfig};

#[derive(Parser, Debug)]
#[command(author, version, about = "Bollinger Band / MACD stock screener")]
pub struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch, filter and chart every symbol in a CSV file
    Analyze(AnalyzeArgs),

    /// Print the symbols a CSV file would be screened for
    Symbols {
        /// CSV file with a "Symbol" column
        #[arg(long, value_name = "FILE")]
        symbols: PathBuf,
    },
}

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// CSV file with a "Symbol" column
    #[arg(long, value_name = "FILE")]
    pub symbols: PathBuf,

    /// Momentum look-back: 3m, 6m or 9m
    #[arg(long)]
    pub period: Option<LookbackPeriod>,

    /// Keep only symbols whose return beats the benchmark's
    #[arg(long, overrides_with = "no_relative_strength")]
    pub relative_strength: bool,

    /// Turn the relative strength filter off, even if the config enables it
    #[arg(long, overrides_with = "relative_strength")]
    pub no_relative_strength: bool,

    /// Keep only symbols whose latest close is above the base close
    #[arg(long, overrides_with = "no_self_momentum")]
    pub self_momentum: bool,

    /// Turn the self momentum filter off, even if the config enables it
    #[arg(long, overrides_with = "self_momentum")]
    pub no_self_momentum: bool,

    /// Base close for self momentum: fetch-window or selected-period
    #[arg(long)]
    pub momentum_window: Option<MomentumWindow>,

    /// Directory the SVG charts are written to
    #[arg(long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Benchmark index symbol (e.g. "^NSEI")
    #[arg(long)]
    pub benchmark: Option<String>,

    /// Suffix appended to every input symbol (e.g. ".NS")
    #[arg(long)]
    pub suffix: Option<String>,
}

impl AnalyzeArgs {
    /// Flags win over whatever the config file and environment said.
    pub fn apply(&self, config: &mut ScreenConfig) {
        if let Some(period) = self.period {
            config.filters.period = period;
        }
        if let Some(on) = toggle(self.relative_strength, self.no_relative_strength) {
            config.filters.relative_strength = on;
        }
        if let Some(on) = toggle(self.self_momentum, self.no_self_momentum) {
            config.filters.self_momentum = on;
        }
        if let Some(window) = self.momentum_window {
            config.filters.momentum_window = window;
        }
        if let Some(dir) = &self.out_dir {
            config.out_dir = dir.clone();
        }
        if let Some(benchmark) = &self.benchmark {
            config.benchmark_symbol = benchmark.clone();
        }
        if let Some(suffix) = &self.suffix {
            config.market_suffix = suffix.clone();
        }
    }
}

/// `--flag` / `--no-flag` pair; `None` when neither was given.
fn toggle(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

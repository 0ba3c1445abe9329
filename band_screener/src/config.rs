//! Run configuration.
//!
//! A [`ScreenConfig`] is resolved once before a run and never mutated while
//! the run is in progress. Values come from, in increasing precedence:
//! built-in defaults, an optional TOML file, environment variables and
//! finally command-line flags (applied by the binary).
//!
//! ```toml
//! benchmark_symbol = "^NSEI"
//! market_suffix = ".NS"
//! out_dir = "charts"
//!
//! [filters]
//! relative_strength = true
//! period = "6m"
//! ```

use std::{
    fmt,
    num::NonZeroU32,
    path::{Path, PathBuf},
    str::FromStr,
};

use market_data_ingestor::providers::yahoo_chart::provider::DEFAULT_BASE_URL;
use nonzero_ext::nonzero;
use serde::{Deserialize, Serialize};
use shared_utils::env::{get_env_var_opt, parse_env_var};

use crate::errors::ConfigError;

/// Calendar days of history fetched per symbol.
pub const FETCH_WINDOW_DAYS: u32 = 700;

pub const ENV_BASE_URL: &str = "BAND_SCREENER_BASE_URL";
pub const ENV_REQUESTS_PER_SECOND: &str = "BAND_SCREENER_REQUESTS_PER_SECOND";

/// Momentum look-back choice.
///
/// The value is used as a count of observations (trading days in the
/// fetched series), not as a calendar offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LookbackPeriod {
    #[default]
    #[serde(rename = "3m", alias = "3months", alias = "3 months")]
    ThreeMonths,
    #[serde(rename = "6m", alias = "6months", alias = "6 months")]
    SixMonths,
    #[serde(rename = "9m", alias = "9months", alias = "9 months")]
    NineMonths,
}

impl LookbackPeriod {
    pub const ALL: [LookbackPeriod; 3] = [Self::ThreeMonths, Self::SixMonths, Self::NineMonths];

    pub const fn observations(self) -> usize {
        match self {
            Self::ThreeMonths => 90,
            Self::SixMonths => 180,
            Self::NineMonths => 270,
        }
    }
}

impl fmt::Display for LookbackPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::ThreeMonths => "3 months",
            Self::SixMonths => "6 months",
            Self::NineMonths => "9 months",
        };
        f.write_str(label)
    }
}

impl FromStr for LookbackPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();
        match compact.as_str() {
            "3m" | "3months" | "90" => Ok(Self::ThreeMonths),
            "6m" | "6months" | "180" => Ok(Self::SixMonths),
            "9m" | "9months" | "270" => Ok(Self::NineMonths),
            _ => Err(format!(
                "unknown period {s:?}; expected one of 3m, 6m, 9m"
            )),
        }
    }
}

/// Which base price self momentum compares the latest close against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MomentumWindow {
    /// First close of the whole fetched series.
    #[default]
    FetchWindow,
    /// Close `period` observations from the end, like relative strength.
    SelectedPeriod,
}

impl FromStr for MomentumWindow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fetch-window" | "fetch_window" | "full" => Ok(Self::FetchWindow),
            "selected-period" | "selected_period" | "period" => Ok(Self::SelectedPeriod),
            _ => Err(format!(
                "unknown momentum window {s:?}; expected fetch-window or selected-period"
            )),
        }
    }
}

/// Filter toggles for one run. Unselected filters never exclude a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterSelection {
    pub relative_strength: bool,
    pub self_momentum: bool,
    pub period: LookbackPeriod,
    pub momentum_window: MomentumWindow,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScreenConfig {
    /// Index the relative strength filter compares against.
    pub benchmark_symbol: String,
    /// Appended to every symbol from the input file before fetching.
    pub market_suffix: String,
    pub fetch_window_days: u32,
    pub requests_per_second: NonZeroU32,
    pub base_url: String,
    pub out_dir: PathBuf,
    pub filters: FilterSelection,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            benchmark_symbol: "^NSEI".to_string(),
            market_suffix: ".NS".to_string(),
            fetch_window_days: FETCH_WINDOW_DAYS,
            requests_per_second: nonzero!(2u32),
            base_url: DEFAULT_BASE_URL.to_string(),
            out_dir: PathBuf::from("charts"),
            filters: FilterSelection::default(),
        }
    }
}

impl ScreenConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: ScreenConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults, overlaid with `path` when given, overlaid with the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => {
                let s = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
                Self::from_toml_str(&s)?
            }
            None => Self::default(),
        };
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Some(url) = get_env_var_opt(ENV_BASE_URL) {
            self.base_url = url;
        }
        if let Some(rps) = parse_env_var::<NonZeroU32>(ENV_REQUESTS_PER_SECOND)? {
            self.requests_per_second = rps;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.benchmark_symbol.trim().is_empty() {
            return Err(ConfigError::Invalid("benchmark_symbol must not be empty".into()));
        }
        if self.fetch_window_days == 0 {
            return Err(ConfigError::Invalid("fetch_window_days must be at least 1".into()));
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "base_url must be an http(s) URL, got {:?}",
                self.base_url
            )));
        }
        Ok(())
    }

    /// The provider-side symbol for a bare ticker from the input file.
    pub fn qualify(&self, symbol: &str) -> String {
        format!("{}{}", symbol, self.market_suffix)
    }
}

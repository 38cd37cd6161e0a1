use std::path::{Path, PathBuf};

use fintrack_domain::{GoalFundingPolicy, MAX_SERIES_WINDOW_DAYS};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Keys accepted by [`Config::set`], in display order.
pub const SETTING_KEYS: [&str; 8] = [
    "locale",
    "currency",
    "precision",
    "daily_window_days",
    "top_categories",
    "goal_funding",
    "ui_color",
    "ledger_root",
];

/// Stores user-configurable preferences and session metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub locale: String,
    /// Display label only; amounts are never converted.
    pub currency: String,
    #[serde(default)]
    pub default_currency_precision: Option<u8>,
    #[serde(default = "Config::default_daily_window_days")]
    pub daily_window_days: u32,
    #[serde(default = "Config::default_top_categories")]
    pub top_categories: usize,
    #[serde(default)]
    pub goal_funding: GoalFundingPolicy,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_user: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional custom directory for ledger files. Defaults to `<base>/ledgers`.
    pub ledger_root: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "en-US".into(),
            currency: "USD".into(),
            default_currency_precision: None,
            daily_window_days: Self::default_daily_window_days(),
            top_categories: Self::default_top_categories(),
            goal_funding: GoalFundingPolicy::default(),
            ui_color_enabled: Self::default_ui_color_enabled(),
            last_user: None,
            ledger_root: None,
        }
    }
}

impl Config {
    pub fn default_daily_window_days() -> u32 {
        30
    }

    pub fn default_top_categories() -> usize {
        5
    }

    pub fn default_ui_color_enabled() -> bool {
        true
    }

    /// Fraction digits used when formatting amounts.
    ///
    /// Falls back to 0 for currencies without minor units in everyday use
    /// and 2 for everything else.
    pub fn currency_precision(&self) -> u8 {
        self.default_currency_precision
            .unwrap_or(match self.currency.to_ascii_uppercase().as_str() {
                "IDR" | "JPY" | "KRW" | "VND" => 0,
                _ => 2,
            })
    }

    pub fn resolve_ledger_root(&self, base: &Path) -> PathBuf {
        match &self.ledger_root {
            Some(path) => path.clone(),
            None => base.join("ledgers"),
        }
    }

    /// Updates a single setting from its textual form.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let trimmed = value.trim();
        let invalid = |reason: &str| ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        };
        match key {
            "locale" => {
                if trimmed.is_empty() {
                    return Err(invalid("locale cannot be empty"));
                }
                self.locale = trimmed.to_string();
            }
            "currency" => {
                if trimmed.is_empty() {
                    return Err(invalid("currency cannot be empty"));
                }
                self.currency = trimmed.to_ascii_uppercase();
            }
            "precision" => {
                self.default_currency_precision = match trimmed {
                    "" | "auto" => None,
                    digits => {
                        let parsed: u8 = digits.parse().map_err(|_| invalid("expected 0-6"))?;
                        if parsed > 6 {
                            return Err(invalid("expected 0-6"));
                        }
                        Some(parsed)
                    }
                };
            }
            "daily_window_days" => {
                let days: u32 = trimmed
                    .parse()
                    .map_err(|_| invalid("expected a whole number of days"))?;
                if days > MAX_SERIES_WINDOW_DAYS {
                    return Err(invalid("window is longer than the series maximum"));
                }
                self.daily_window_days = days;
            }
            "top_categories" => {
                self.top_categories = trimmed
                    .parse()
                    .map_err(|_| invalid("expected a whole number"))?;
            }
            "goal_funding" => {
                self.goal_funding = GoalFundingPolicy::from_label(trimmed)
                    .ok_or_else(|| invalid("expected `incremental` or `recompute_on_load`"))?;
            }
            "ui_color" => {
                self.ui_color_enabled = match trimmed.to_ascii_lowercase().as_str() {
                    "on" | "true" | "yes" => true,
                    "off" | "false" | "no" => false,
                    _ => return Err(invalid("expected on/off")),
                };
            }
            "ledger_root" => {
                self.ledger_root = match trimmed {
                    "" | "default" => None,
                    path => Some(PathBuf::from(path)),
                };
            }
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }
        Ok(())
    }

    /// Current value of every setting, keyed as in [`SETTING_KEYS`].
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        SETTING_KEYS
            .iter()
            .map(|key| {
                let value = match *key {
                    "locale" => self.locale.clone(),
                    "currency" => self.currency.clone(),
                    "precision" => match self.default_currency_precision {
                        Some(digits) => digits.to_string(),
                        None => format!("auto ({})", self.currency_precision()),
                    },
                    "daily_window_days" => self.daily_window_days.to_string(),
                    "top_categories" => self.top_categories.to_string(),
                    "goal_funding" => self.goal_funding.to_string(),
                    "ui_color" => (if self.ui_color_enabled { "on" } else { "off" }).to_string(),
                    _ => self
                        .ledger_root
                        .as_ref()
                        .map(|path| path.display().to_string())
                        .unwrap_or_else(|| "default".into()),
                };
                (*key, value)
            })
            .collect()
    }
}

//! Host configuration read from the environment.
//!
//! | Variable            | Default                           |
//! |---------------------|-----------------------------------|
//! | `CHARACTER_API_URL` | `https://rickandmortyapi.com/api` |
//! | `BROWSER_LAYOUT`    | `desktop` (`mobile` accepted)     |
//! | `NO_COLOR`          | unset: badges are colored         |

use character_core::card::ParseLayoutError;
use character_core::{CardLayout, DEFAULT_BASE_URL};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("BROWSER_LAYOUT: {0}")]
    Layout(#[from] ParseLayoutError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_url: String,
    pub layout: CardLayout,
    pub color: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_url = lookup("CHARACTER_API_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let layout = match lookup("BROWSER_LAYOUT") {
            Some(value) => value.parse()?,
            None => CardLayout::default(),
        };
        Ok(Self {
            api_url,
            layout,
            color: lookup("NO_COLOR").is_none(),
        })
    }
}

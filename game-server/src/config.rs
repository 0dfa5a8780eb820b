use anyhow::{Result, anyhow};
use game_core::{DEFAULT_THEME_KEY, RoundTiming, CELEBRATION_STREAK};
use game_persistence::DEFAULT_DATABASE_URL;
use game_types::Theme;
use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use crate::session::SessionSettings;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub theme_key: String,
    pub default_theme: Theme,
    pub countdown_step_ms: u64,
    pub shuffle_interval_ms: u64,
    pub celebration_ms: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build a config from any variable source. Unset variables take their
    /// defaults; malformed ones are an error.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_or(&lookup, "PORT", defaults.port)?,
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            theme_key: lookup("THEME_KEY").unwrap_or(defaults.theme_key),
            default_theme: parse_or(&lookup, "DEFAULT_THEME", defaults.default_theme)?,
            countdown_step_ms: parse_or(&lookup, "COUNTDOWN_STEP_MS", defaults.countdown_step_ms)?,
            shuffle_interval_ms: parse_or(
                &lookup,
                "SHUFFLE_INTERVAL_MS",
                defaults.shuffle_interval_ms,
            )?,
            celebration_ms: parse_or(&lookup, "CELEBRATION_MS", defaults.celebration_ms)?,
        })
    }

    pub fn round_timing(&self) -> RoundTiming {
        RoundTiming {
            countdown_step: Duration::from_millis(self.countdown_step_ms),
            shuffle_interval: Duration::from_millis(self.shuffle_interval_ms.max(1)),
            celebration: Duration::from_millis(self.celebration_ms),
            streak_threshold: CELEBRATION_STREAK,
        }
    }

    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            timing: self.round_timing(),
            theme_key: self.theme_key.clone(),
            default_theme: self.default_theme,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            theme_key: DEFAULT_THEME_KEY.to_string(),
            default_theme: Theme::Dark,
            countdown_step_ms: 500,
            shuffle_interval_ms: 180,
            celebration_ms: 4000,
        }
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|e| anyhow!("Invalid {}: {}", name, e)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults_match_round_timing() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.theme_key, "rps-theme");
        assert_eq!(config.round_timing(), RoundTiming::default());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("PORT", "9000"),
            ("DEFAULT_THEME", "light"),
            ("COUNTDOWN_STEP_MS", "250"),
        ]))
        .unwrap();

        assert_eq!(config.port, 9000);
        assert_eq!(config.default_theme, Theme::Light);
        assert_eq!(
            config.round_timing().countdown_total(),
            Duration::from_millis(1000)
        );
    }

    #[test]
    fn test_invalid_values_are_errors() {
        let err = Config::from_lookup(lookup_from(&[("PORT", "eighty")])).unwrap_err();
        assert!(err.to_string().contains("Invalid PORT"));

        let err = Config::from_lookup(lookup_from(&[("DEFAULT_THEME", "sepia")])).unwrap_err();
        assert!(err.to_string().contains("Invalid DEFAULT_THEME"));
    }
}

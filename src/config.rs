use crate::dates::{DayBoundary, WeekdayLocale};
use std::{env, path::PathBuf};
use tracing::warn;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATA_PATH: &str = "data/habits.json";
const DEFAULT_HISTORY_DAYS: i64 = 365;
const MAX_HISTORY_DAYS: i64 = 36_500;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub data_path: PathBuf,
    pub day_boundary: DayBoundary,
    pub weekday_locale: WeekdayLocale,
    pub history_days: i64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            day_boundary: DayBoundary::default(),
            weekday_locale: WeekdayLocale::default(),
            history_days: DEFAULT_HISTORY_DAYS,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let port = parse_or(&lookup, "PORT", defaults.port, |value| value.parse().ok());
        let data_path = lookup("APP_DATA_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.data_path);
        let day_boundary = parse_or(&lookup, "APP_DAY_BOUNDARY", defaults.day_boundary, |value| {
            match value.to_ascii_lowercase().as_str() {
                "local" => Some(DayBoundary::Local),
                "utc" => Some(DayBoundary::Utc),
                _ => None,
            }
        });
        let weekday_locale =
            parse_or(&lookup, "APP_WEEKDAY_LOCALE", defaults.weekday_locale, |value| {
                match value.to_ascii_lowercase().as_str() {
                    "en" => Some(WeekdayLocale::En),
                    "hr" => Some(WeekdayLocale::Hr),
                    _ => None,
                }
            });
        let history_days = parse_or(&lookup, "APP_HISTORY_DAYS", defaults.history_days, |value| {
            value
                .parse()
                .ok()
                .filter(|days: &i64| (1..=MAX_HISTORY_DAYS).contains(days))
        });

        Self {
            port,
            data_path,
            day_boundary,
            weekday_locale,
            history_days,
        }
    }
}

fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
    parse: impl Fn(&str) -> Option<T>,
) -> T {
    let Some(raw) = lookup(key) else {
        return default;
    };
    match parse(raw.trim()) {
        Some(value) => value,
        None => {
            warn!("ignoring invalid {key}={raw:?}");
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = config_from(&[]);
        assert_eq!(config.port, 8080);
        assert_eq!(config.data_path, PathBuf::from("data/habits.json"));
        assert_eq!(config.day_boundary, DayBoundary::Local);
        assert_eq!(config.weekday_locale, WeekdayLocale::En);
        assert_eq!(config.history_days, 365);
    }

    #[test]
    fn reads_overrides() {
        let config = config_from(&[
            ("PORT", "9000"),
            ("APP_DATA_PATH", "/tmp/h.json"),
            ("APP_DAY_BOUNDARY", "UTC"),
            ("APP_WEEKDAY_LOCALE", "hr"),
            ("APP_HISTORY_DAYS", "90"),
        ]);
        assert_eq!(config.port, 9000);
        assert_eq!(config.data_path, PathBuf::from("/tmp/h.json"));
        assert_eq!(config.day_boundary, DayBoundary::Utc);
        assert_eq!(config.weekday_locale, WeekdayLocale::Hr);
        assert_eq!(config.history_days, 90);
    }

    #[test]
    fn invalid_values_fall_back() {
        let config = config_from(&[
            ("PORT", "http"),
            ("APP_DAY_BOUNDARY", "mars"),
            ("APP_HISTORY_DAYS", "-3"),
        ]);
        assert_eq!(config.port, 8080);
        assert_eq!(config.day_boundary, DayBoundary::Local);
        assert_eq!(config.history_days, 365);
    }

    #[test]
    fn oversized_history_window_falls_back() {
        let config = config_from(&[("APP_HISTORY_DAYS", "1000000000")]);
        assert_eq!(config.history_days, 365);
        let config = config_from(&[("APP_HISTORY_DAYS", "36500")]);
        assert_eq!(config.history_days, 36_500);
    }
}

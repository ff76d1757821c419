use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use log::LevelFilter;

use crate::location::Position;
use crate::model::Permission;
use crate::streaming::StreamingConf;

pub const STREAM_URI: &str = "wss://stream.binance.com:9443/ws";
pub const RECONNECT_INTERVAL_MS: u64 = 3000;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid value {value:?} for {name}")]
pub struct ConfigError {
    name: &'static str,
    value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub stream_uri: String,
    pub reconnect_interval: Duration,
    pub calendar_dir: PathBuf,
    pub calendar_container: String,
    pub calendar_access: Permission,
    pub position: Option<Position>,
    pub log_level: LevelFilter,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let latitude: Option<f64> = parse(&var, "CRYPTOTRACKER_LATITUDE")?;
        let longitude: Option<f64> = parse(&var, "CRYPTOTRACKER_LONGITUDE")?;
        let position = match (latitude, longitude) {
            (Some(latitude), Some(longitude)) => Some(Position { latitude, longitude, accuracy: None }),
            (None, None) => None,
            (Some(_), None) => return Err(ConfigError { name: "CRYPTOTRACKER_LONGITUDE", value: String::new() }),
            (None, Some(_)) => return Err(ConfigError { name: "CRYPTOTRACKER_LATITUDE", value: String::new() }),
        };
        let reconnect_ms = parse(&var, "CRYPTOTRACKER_RECONNECT_MS")?.unwrap_or(RECONNECT_INTERVAL_MS);
        Ok(Self {
            stream_uri: var("CRYPTOTRACKER_STREAM_URL").unwrap_or_else(|| STREAM_URI.to_owned()),
            reconnect_interval: Duration::from_millis(reconnect_ms),
            calendar_dir: var("CRYPTOTRACKER_CALENDAR_DIR").unwrap_or_else(|| ".cryptotracker-calendar".to_owned()).into(),
            calendar_container: var("CRYPTOTRACKER_CALENDAR_NAME").unwrap_or_else(|| "personal".to_owned()),
            calendar_access: parse(&var, "CRYPTOTRACKER_CALENDAR_ACCESS")?.unwrap_or(Permission::Granted),
            position,
            log_level: parse(&var, "CRYPTOTRACKER_LOG")?.unwrap_or(LevelFilter::Info),
        })
    }

    pub fn streaming(&self) -> StreamingConf {
        StreamingConf { uri: self.stream_uri.clone(), reconnect_interval: self.reconnect_interval }
    }
}

fn parse<T: FromStr>(var: &impl Fn(&str) -> Option<String>, name: &'static str) -> Result<Option<T>, ConfigError> {
    match var(name) {
        None => Ok(None),
        Some(value) => value.trim().parse().map(Some).map_err(|_| ConfigError { name, value }),
    }
}

#[cfg(test)]
mod test {
    use std::collections::HashMap;

    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let conf = Config::from_vars(vars(&[])).unwrap();
        assert_eq!(conf.stream_uri, STREAM_URI);
        assert_eq!(conf.reconnect_interval, Duration::from_millis(3000));
        assert_eq!(conf.calendar_access, Permission::Granted);
        assert_eq!(conf.position, None);
        assert_eq!(conf.log_level, LevelFilter::Info);
    }

    #[test]
    fn test_overrides() {
        let conf = Config::from_vars(vars(&[
            ("CRYPTOTRACKER_RECONNECT_MS", "500"),
            ("CRYPTOTRACKER_CALENDAR_ACCESS", "denied"),
            ("CRYPTOTRACKER_LATITUDE", "-27.59"),
            ("CRYPTOTRACKER_LONGITUDE", "-48.54"),
            ("CRYPTOTRACKER_LOG", "debug"),
        ]))
        .unwrap();
        assert_eq!(conf.streaming().reconnect_interval, Duration::from_millis(500));
        assert_eq!(conf.calendar_access, Permission::Denied);
        assert_eq!(conf.position, Some(Position { latitude: -27.59, longitude: -48.54, accuracy: None }));
        assert_eq!(conf.log_level, LevelFilter::Debug);
    }

    #[test]
    fn test_invalid() {
        let err = Config::from_vars(vars(&[("CRYPTOTRACKER_RECONNECT_MS", "soon")])).unwrap_err();
        assert_eq!(err.to_string(), "invalid value \"soon\" for CRYPTOTRACKER_RECONNECT_MS");
        assert!(Config::from_vars(vars(&[("CRYPTOTRACKER_LATITUDE", "1.0")])).is_err());
    }
}

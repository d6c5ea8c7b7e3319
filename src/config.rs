use std::collections::BTreeMap;
use std::time::Duration;

use crate::sensors::SensorKind;

const DEFAULT_BADGE_PORT: &str = "/dev/tty.usbmodem1101";
const DEFAULT_BAUD_RATE: u32 = 115_200;
const DEFAULT_ACK_TIMEOUT_SECS: u64 = 5;
const MAX_ACK_TIMEOUT_SECS: u64 = 3600;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),

    #[error("{key} has an invalid value: {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub ha_url: String,
    pub ha_token: String,
    pub entities: BTreeMap<SensorKind, String>,
    pub badge_port: String,
    pub baud_rate: u32,
    /// `None` sends frames without waiting for the badge to answer.
    pub ack_timeout: Option<Duration>,
    pub debug_borders: bool,
    pub fast_refresh: bool,
}

impl Config {
    /// Reads the process environment; `.env` is loaded by the binary first.
    pub fn from_env() -> Result<Config, ConfigError> {
        Config::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let ha_url = get("HA_URL").ok_or(ConfigError::Missing("HA_URL"))?;
        let ha_url = ha_url.trim_end_matches('/').to_string();
        let ha_token = get("HA_TOKEN").ok_or(ConfigError::Missing("HA_TOKEN"))?;

        let entities = SensorKind::ALL
            .iter()
            .filter_map(|&kind| get(kind.entity_key()).map(|id| (kind, id)))
            .collect();

        let badge_port = get("BADGE_PORT").unwrap_or_else(|| DEFAULT_BADGE_PORT.to_string());
        let baud_rate = match get("BADGE_BAUD") {
            Some(v) => v.parse().map_err(|_| ConfigError::Invalid {
                key: "BADGE_BAUD",
                value: v,
            })?,
            None => DEFAULT_BAUD_RATE,
        };
        let ack_secs = match get("BADGE_ACK_TIMEOUT_SECS") {
            Some(v) => match v.parse::<u64>() {
                Ok(secs) if secs <= MAX_ACK_TIMEOUT_SECS => secs,
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "BADGE_ACK_TIMEOUT_SECS",
                        value: v,
                    })
                }
            },
            None => DEFAULT_ACK_TIMEOUT_SECS,
        };
        let ack_timeout = (ack_secs > 0).then(|| Duration::from_secs(ack_secs));

        Ok(Config {
            ha_url,
            ha_token,
            entities,
            badge_port,
            baud_rate,
            ack_timeout,
            debug_borders: parse_flag("BADGE_DEBUG_BORDERS", get("BADGE_DEBUG_BORDERS"))?,
            fast_refresh: parse_flag("BADGE_FAST_REFRESH", get("BADGE_FAST_REFRESH"))?,
        })
    }

    /// Kinds with no configured entity; these always render as no data.
    pub fn missing_entities(&self) -> Vec<SensorKind> {
        SensorKind::ALL
            .iter()
            .copied()
            .filter(|kind| !self.entities.contains_key(kind))
            .collect()
    }
}

fn parse_flag(key: &'static str, value: Option<String>) -> Result<bool, ConfigError> {
    let lowered = value.as_deref().map(str::to_ascii_lowercase);
    match lowered.as_deref() {
        None | Some("0") | Some("false") | Some("no") | Some("off") => Ok(false),
        Some("1") | Some("true") | Some("yes") | Some("on") => Ok(true),
        Some(_) => Err(ConfigError::Invalid {
            key,
            value: value.unwrap_or_default(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn requires_url_and_token() {
        let err = Config::from_lookup(lookup(&[("HA_TOKEN", "t")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("HA_URL"));

        let err = Config::from_lookup(lookup(&[("HA_URL", "http://ha:8123")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("HA_TOKEN"));
    }

    #[test]
    fn blank_values_count_as_missing() {
        let err = Config::from_lookup(lookup(&[("HA_URL", "  "), ("HA_TOKEN", "t")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("HA_URL"));
    }

    #[test]
    fn defaults_and_entities() {
        let config = Config::from_lookup(lookup(&[
            ("HA_URL", "http://ha:8123/"),
            ("HA_TOKEN", "secret"),
            ("CO2_ENTITY", "sensor.co2"),
            ("WEATHER_ENTITY", "weather.home"),
        ]))
        .unwrap();

        assert_eq!(config.ha_url, "http://ha:8123");
        assert_eq!(config.badge_port, DEFAULT_BADGE_PORT);
        assert_eq!(config.baud_rate, 115_200);
        assert_eq!(config.ack_timeout, Some(Duration::from_secs(5)));
        assert!(!config.debug_borders);
        assert!(!config.fast_refresh);
        assert_eq!(config.entities.get(&SensorKind::Co2).map(String::as_str), Some("sensor.co2"));
        assert_eq!(
            config.entities.get(&SensorKind::OutsideTemp).map(String::as_str),
            Some("weather.home")
        );
        assert_eq!(
            config.missing_entities(),
            vec![SensorKind::Co, SensorKind::Pm25, SensorKind::Humidity, SensorKind::IndoorTemp]
        );
    }

    #[test]
    fn zero_ack_timeout_disables_waiting() {
        let config = Config::from_lookup(lookup(&[
            ("HA_URL", "http://ha"),
            ("HA_TOKEN", "t"),
            ("BADGE_ACK_TIMEOUT_SECS", "0"),
            ("BADGE_FAST_REFRESH", "yes"),
        ]))
        .unwrap();
        assert_eq!(config.ack_timeout, None);
        assert!(config.fast_refresh);
    }

    #[test]
    fn rejects_garbage_numbers_and_flags() {
        let err = Config::from_lookup(lookup(&[
            ("HA_URL", "u"),
            ("HA_TOKEN", "t"),
            ("BADGE_BAUD", "fast"),
        ]))
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                key: "BADGE_BAUD",
                value: "fast".into()
            }
        );

        let err = Config::from_lookup(lookup(&[
            ("HA_URL", "u"),
            ("HA_TOKEN", "t"),
            ("BADGE_DEBUG_BORDERS", "maybe"),
        ]))
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                key: "BADGE_DEBUG_BORDERS",
                value: "maybe".into()
            }
        );
    }

    #[test]
    fn rejects_ack_timeouts_past_an_hour() {
        for value in ["18446744073709551615", "3601"] {
            let err = Config::from_lookup(lookup(&[
                ("HA_URL", "u"),
                ("HA_TOKEN", "t"),
                ("BADGE_ACK_TIMEOUT_SECS", value),
            ]))
            .unwrap_err();
            assert_eq!(
                err,
                ConfigError::Invalid {
                    key: "BADGE_ACK_TIMEOUT_SECS",
                    value: value.into()
                }
            );
        }

        let config = Config::from_lookup(lookup(&[
            ("HA_URL", "u"),
            ("HA_TOKEN", "t"),
            ("BADGE_ACK_TIMEOUT_SECS", "3600"),
        ]))
        .unwrap();
        assert_eq!(config.ack_timeout, Some(Duration::from_secs(3600)));
    }
}

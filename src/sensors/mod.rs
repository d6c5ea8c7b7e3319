//! Home Assistant entity polling.
mod parsing;
mod query;

pub use parsing::{parse_state, reading_for, Attributes, EntityState};
pub use query::{Client, SensorError};

use std::fmt;

/// One physical quantity shown on the badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SensorKind {
    Co2,
    Co,
    Pm25,
    Humidity,
    OutsideTemp,
    IndoorTemp,
}

/// Where in the entity response the value lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueSource {
    State,
    Attribute(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Truncated to an integer.
    Integer,
    Decimals(usize),
}

impl SensorKind {
    pub const COUNT: usize = 6;

    /// Indexed by `kind as usize`.
    pub const ALL: [SensorKind; SensorKind::COUNT] = [
        SensorKind::Co2,
        SensorKind::Co,
        SensorKind::Pm25,
        SensorKind::Humidity,
        SensorKind::OutsideTemp,
        SensorKind::IndoorTemp,
    ];

    pub fn entity_key(self) -> &'static str {
        match self {
            SensorKind::Co2 => "CO2_ENTITY",
            SensorKind::Co => "CO_ENTITY",
            SensorKind::Pm25 => "PM25_ENTITY",
            SensorKind::Humidity => "HUMIDITY_ENTITY",
            SensorKind::OutsideTemp => "WEATHER_ENTITY",
            SensorKind::IndoorTemp => "TEMP_ENTITY",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SensorKind::Co2 => "CO2",
            SensorKind::Co => "CO",
            SensorKind::Pm25 => "PM2.5",
            SensorKind::Humidity => "Humidity",
            SensorKind::OutsideTemp => "Outside",
            SensorKind::IndoorTemp => "Temp",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            SensorKind::Co2 | SensorKind::Co => "ppm",
            SensorKind::Pm25 => "µg",
            SensorKind::Humidity => "%",
            SensorKind::OutsideTemp | SensorKind::IndoorTemp => "°C",
        }
    }

    pub fn format(self) -> Format {
        match self {
            SensorKind::Co2 => Format::Integer,
            SensorKind::Humidity => Format::Decimals(0),
            _ => Format::Decimals(1),
        }
    }

    pub fn source(self) -> ValueSource {
        match self {
            // Weather entities keep the condition in `state`.
            SensorKind::OutsideTemp => ValueSource::Attribute("temperature"),
            _ => ValueSource::State,
        }
    }
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Current value of one entity. Failed fetches are `Unavailable`, never a
/// sentinel number.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Reading {
    Number(f64),
    Text(String),
    #[default]
    Unavailable,
}

impl Reading {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Reading::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_available(&self) -> bool {
        !matches!(self, Reading::Unavailable)
    }

    /// Display text without unit, `None` when there is nothing to show.
    pub fn format(&self, format: Format) -> Option<String> {
        match self {
            Reading::Number(v) => Some(match format {
                // adding zero turns -0 into 0
                Format::Integer => format!("{:.0}", v.trunc() + 0.0),
                Format::Decimals(places) => format!("{v:.places$}"),
            }),
            Reading::Text(text) => Some(text.clone()),
            Reading::Unavailable => None,
        }
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reading::Number(v) => write!(f, "{v}"),
            Reading::Text(text) => f.write_str(text),
            Reading::Unavailable => f.write_str("ERR"),
        }
    }
}

/// Anything that can produce a reading per sensor kind.
pub trait SensorSource {
    fn read(&self, kind: SensorKind) -> Reading;
}

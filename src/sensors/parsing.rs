use serde::Deserialize;
use serde_aux::prelude::*;

use super::{Reading, SensorKind, ValueSource};

/// Body of `GET /api/states/<entity_id>`.
#[derive(Deserialize, Debug)]
pub struct EntityState {
    #[serde(default)]
    pub entity_id: Option<String>,
    pub state: String,
    #[serde(default)]
    pub attributes: Attributes,
}

/// The few attributes we care about; everything else is ignored.
#[derive(Deserialize, Debug, Default)]
pub struct Attributes {
    #[serde(default)]
    pub unit_of_measurement: Option<String>,
    // Weather integrations disagree on whether this is a number or a string.
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    pub temperature: Option<f64>,
}

const UNAVAILABLE_STATES: &[&str] = &["unavailable", "unknown", "none"];

pub fn parse_state(state: &str) -> Reading {
    let state = state.trim();
    if state.is_empty() || UNAVAILABLE_STATES.iter().any(|s| state.eq_ignore_ascii_case(s)) {
        return Reading::Unavailable;
    }
    match state.parse::<f64>() {
        Ok(v) if v.is_finite() => Reading::Number(v),
        Ok(_) => Reading::Unavailable,
        Err(_) => Reading::Text(state.to_string()),
    }
}

/// Extracts the reading for `kind` from an entity response.
pub fn reading_for(kind: SensorKind, entity: &EntityState) -> Result<Reading, &'static str> {
    match kind.source() {
        ValueSource::State => Ok(parse_state(&entity.state)),
        ValueSource::Attribute("temperature") => entity
            .attributes
            .temperature
            .filter(|v| v.is_finite())
            .map(Reading::Number)
            .ok_or("temperature"),
        ValueSource::Attribute(name) => Err(name),
    }
}

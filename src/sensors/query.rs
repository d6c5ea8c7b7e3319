use core::time::Duration;
use std::collections::BTreeMap;

use reqwest::blocking::Client as HttpClient;
use reqwest::StatusCode;
use tracing::{debug, warn};

use super::parsing::{reading_for, EntityState};
use super::{Reading, SensorKind, SensorSource};
use crate::config::Config;

const TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, thiserror::Error)]
pub enum SensorError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server answered {0}")]
    Status(StatusCode),

    #[error("malformed entity JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("entity has no '{0}' attribute")]
    MissingAttribute(&'static str),
}

/// Home Assistant REST client, built once and reused for every cycle.
pub struct Client {
    http: HttpClient,
    base_url: String,
    token: String,
    entities: BTreeMap<SensorKind, String>,
}

impl Client {
    pub fn new(config: &Config) -> Result<Client, SensorError> {
        let http = HttpClient::builder().timeout(TIMEOUT).build()?;
        Ok(Client {
            http,
            base_url: config.ha_url.clone(),
            token: config.ha_token.clone(),
            entities: config.entities.clone(),
        })
    }

    pub fn get_state(&self, entity_id: &str) -> Result<EntityState, SensorError> {
        let url = format!("{}/api/states/{entity_id}", self.base_url);
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.token)
            .header("Content-Type", "application/json")
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(SensorError::Status(status));
        }

        let body = response.text()?;
        Ok(serde_json::from_str::<EntityState>(&body)?)
    }

    fn fetch(&self, kind: SensorKind, entity_id: &str) -> Result<Reading, SensorError> {
        let entity = self.get_state(entity_id)?;
        let reading = reading_for(kind, &entity).map_err(SensorError::MissingAttribute)?;
        debug!(
            %kind,
            entity_id = entity.entity_id.as_deref().unwrap_or(entity_id),
            value = %reading,
            unit = entity.attributes.unit_of_measurement.as_deref().unwrap_or(""),
            "fetched entity"
        );
        Ok(reading)
    }
}

impl SensorSource for Client {
    fn read(&self, kind: SensorKind) -> Reading {
        let Some(entity_id) = self.entities.get(&kind) else {
            return Reading::Unavailable;
        };
        self.fetch(kind, entity_id).unwrap_or_else(|err| {
            warn!(%kind, entity_id = entity_id.as_str(), "error fetching entity: {err}");
            Reading::Unavailable
        })
    }
}

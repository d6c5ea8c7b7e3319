//! Polls Home Assistant for air-quality and climate readings, renders them
//! into a 1-bit bitmap and pushes it to a Badger2040 e-ink badge over
//! serial once a minute.

pub mod config;
pub mod render;
pub mod scheduler;
pub mod sensors;
pub mod state;
pub mod thresholds;
pub mod transport;

pub use config::{Config, ConfigError};
pub use render::{render, Bitmap, RenderOptions};
pub use scheduler::{Cadence, CycleError, Job, Stage};
pub use sensors::{Reading, SensorKind, SensorSource};
pub use state::DisplayState;
pub use thresholds::{Severity, ThresholdConfig, Thresholds};
pub use transport::{Badge, Frame, FrameSink, Port, TransportError};

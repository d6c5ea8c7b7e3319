//! # Job
//! Runs the fetch -> render -> send cycle forever. Every cycle starts from
//! scratch; a failed cycle is logged and the next one runs on schedule.

use std::thread;
use std::time::Duration;

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Timelike};
use tracing::{debug, error, info, info_span};

use crate::render::{self, RenderOptions};
use crate::sensors::SensorSource;
use crate::state::DisplayState;
use crate::thresholds::ThresholdConfig;
use crate::transport::{Frame, FrameSink, TransportError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Fetching,
    Rendering,
    Sending,
}

#[derive(Debug, thiserror::Error)]
pub enum CycleError {
    #[error("sending frame failed: {0}")]
    Send(#[from] TransportError),
}

impl CycleError {
    pub fn stage(&self) -> Stage {
        match self {
            CycleError::Send(_) => Stage::Sending,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cadence {
    /// At the top of every wall-clock minute, so the clock panel is current.
    EveryMinute,
    Every(Duration),
}

impl Cadence {
    pub fn time_till_next_run<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Duration {
        match *self {
            Cadence::Every(interval) => interval,
            Cadence::EveryMinute => {
                // nanosecond() exceeds 1e9 during a leap second
                let millis = u64::from(now.nanosecond().min(999_999_999)) / 1_000_000;
                let into_minute_ms = u64::from(now.second()) * 1000 + millis;
                Duration::from_millis(60_000u64.saturating_sub(into_minute_ms).max(1))
            }
        }
    }
}

pub struct Job<S, K> {
    name: String,
    cadence: Cadence,
    source: S,
    sink: K,
    thresholds: ThresholdConfig,
    options: RenderOptions,
    stage: Stage,
}

impl<S, K> Job<S, K>
where
    S: SensorSource,
    K: FrameSink,
{
    pub fn new(
        name: &str,
        cadence: Cadence,
        source: S,
        sink: K,
        thresholds: ThresholdConfig,
        options: RenderOptions,
    ) -> Job<S, K> {
        Job {
            name: name.to_string(),
            cadence,
            source,
            sink,
            thresholds,
            options,
            stage: Stage::Idle,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    fn enter(&mut self, stage: Stage) {
        debug!(from = ?self.stage, to = ?stage, "stage");
        self.stage = stage;
    }

    /// One complete cycle. Always ends back in [`Stage::Idle`].
    pub fn tick(&mut self, now: NaiveDateTime) -> Result<(), CycleError> {
        let result = self.cycle(now);
        self.enter(Stage::Idle);
        result
    }

    fn cycle(&mut self, now: NaiveDateTime) -> Result<(), CycleError> {
        self.enter(Stage::Fetching);
        let state = DisplayState::collect(&self.source, &self.thresholds, now);
        info!("{state}");

        self.enter(Stage::Rendering);
        let frame = Frame::from_bitmap(render::render(&state, &self.options));

        self.enter(Stage::Sending);
        self.sink.send(&frame)?;
        Ok(())
    }

    pub fn run(mut self) -> ! {
        let span = info_span!("job", name = %self.name);
        let _guard = span.enter();
        info!(cadence = ?self.cadence, "started");

        loop {
            let now = Local::now();
            match self.tick(now.naive_local()) {
                Ok(()) => debug!("cycle finished"),
                Err(err) => error!(stage = ?err.stage(), "cycle failed: {err}"),
            }

            let sleep_for = self.cadence.time_till_next_run(&Local::now());
            debug!("sleeping for {sleep_for:?}");
            thread::sleep(sleep_for);
        }
    }
}

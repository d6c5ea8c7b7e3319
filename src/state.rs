use std::fmt;

use chrono::NaiveDateTime;

use crate::sensors::{Reading, SensorKind, SensorSource};
use crate::thresholds::{Severity, ThresholdConfig};

#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub kind: SensorKind,
    pub reading: Reading,
    pub severity: Severity,
}

/// Everything one render pass needs. Always holds an entry for every
/// [`SensorKind`]; failed sensors are present as [`Reading::Unavailable`].
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayState {
    entries: [Entry; SensorKind::COUNT],
    now: NaiveDateTime,
}

impl DisplayState {
    /// Builds a state from whatever readings are at hand; missing kinds are
    /// filled in as unavailable.
    pub fn new<I>(readings: I, thresholds: &ThresholdConfig, now: NaiveDateTime) -> DisplayState
    where
        I: IntoIterator<Item = (SensorKind, Reading)>,
    {
        let mut collected: [Reading; SensorKind::COUNT] = Default::default();
        for (kind, reading) in readings {
            collected[kind as usize] = reading;
        }
        let entries = SensorKind::ALL.map(|kind| {
            let reading = std::mem::take(&mut collected[kind as usize]);
            let severity = thresholds.evaluate(kind, &reading);
            Entry {
                kind,
                reading,
                severity,
            }
        });
        DisplayState {
            entries,
            now,
        }
    }

    /// Fetches every kind from `source`, one after another.
    pub fn collect<S>(source: &S, thresholds: &ThresholdConfig, now: NaiveDateTime) -> DisplayState
    where
        S: SensorSource + ?Sized,
    {
        DisplayState::new(
            SensorKind::ALL.iter().map(|&kind| (kind, source.read(kind))),
            thresholds,
            now,
        )
    }

    pub fn entry(&self, kind: SensorKind) -> &Entry {
        &self.entries[kind as usize]
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn time(&self) -> String {
        self.now.format("%H:%M").to_string()
    }

    pub fn date(&self) -> String {
        self.now.format("%d/%m").to_string()
    }

    pub fn unavailable_count(&self) -> usize {
        self.entries.iter().filter(|e| !e.reading.is_available()).count()
    }
}

impl fmt::Display for DisplayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.time())?;
        for (i, entry) in self.entries.iter().enumerate() {
            let sep = if i == 0 { " " } else { ", " };
            write!(f, "{sep}{}: {}", entry.kind, entry.reading)?;
            if entry.reading.is_available() {
                f.write_str(entry.kind.unit())?;
            }
        }
        Ok(())
    }
}

//! Current glucose reading for one user session

use crate::measurement::measurement_from_utterance;

/// Holds the reference measurement used for scoring.
///
/// Starts at a baseline and only changes when an utterance yields a number.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    baseline: f64,
    reference: f64,
}

impl Session {
    pub fn new(baseline: f64) -> Self {
        Self {
            baseline,
            reference: baseline,
        }
    }

    pub fn reference(&self) -> f64 {
        self.reference
    }

    pub fn baseline(&self) -> f64 {
        self.baseline
    }

    /// Record a reading spoken by the user
    pub fn set_reference(&mut self, reading: f64) {
        tracing::info!("Glucose reading updated: {} → {}", self.reference, reading);
        self.reference = reading;
    }

    /// Parse a reading out of `utterance`. Keeps the previous reading when nothing is found
    pub fn update_from_utterance(&mut self, utterance: Option<&str>) -> Option<f64> {
        if utterance.is_none() {
            tracing::warn!("No glucose reading shared yet");
            return None;
        }

        match measurement_from_utterance(utterance) {
            Some(reading) => {
                self.set_reference(reading);
                Some(reading)
            }
            None => {
                tracing::warn!("No number found in utterance, asking the user to repeat");
                None
            }
        }
    }

    /// Forget spoken readings and return to the baseline
    pub fn reset(&mut self) {
        self.reference = self.baseline;
    }
}

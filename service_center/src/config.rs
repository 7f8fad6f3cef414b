use std::ops::RangeInclusive;
use std::time::Duration;

use crate::error::ConfigError;

/// Parameters of a service center run.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    /// Number of ticks in the running phase
    pub ticks: usize,
    /// Fixed pause at the end of every tick
    pub tick_interval: Duration,
    /// Upper bound (inclusive) of new requests per tick
    pub max_arrivals: usize,
    /// Range of the number embedded in each payload
    pub payload_range: RangeInclusive<u16>,
    /// Range of the simulated work step
    pub processing_delay: RangeInclusive<Duration>,
    /// Optional queue capacity, unbounded when `None`
    pub max_queue_size: Option<usize>,
    /// Seed for the random workload, OS entropy when `None`
    pub seed: Option<u64>,
}

impl SimulationConfig {
    /// The reference setup: 20 ticks 400ms apart, 0-2 arrivals per tick,
    /// 200-600ms of work per request, no queue limit.
    pub fn baseline() -> Self {
        SimulationConfig {
            ticks: 20,
            tick_interval: Duration::from_millis(400),
            max_arrivals: 2,
            payload_range: 100..=999,
            processing_delay: Duration::from_millis(200)..=Duration::from_millis(600),
            max_queue_size: None,
            seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_max_queue_size(mut self, max_queue_size: usize) -> Self {
        self.max_queue_size = Some(max_queue_size);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.payload_range.is_empty() {
            return Err(ConfigError::EmptyPayloadRange {
                low: *self.payload_range.start(),
                high: *self.payload_range.end(),
            });
        }
        if self.processing_delay.start() > self.processing_delay.end() {
            return Err(ConfigError::InvertedDelayRange {
                min_ms: self.processing_delay.start().as_millis(),
                max_ms: self.processing_delay.end().as_millis(),
            });
        }
        if self.max_queue_size == Some(0) {
            return Err(ConfigError::ZeroCapacity);
        }
        Ok(())
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::baseline()
    }
}

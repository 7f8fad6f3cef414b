//! Sources of the randomness that drives a run.
//!
//! The service center never touches an RNG directly. Everything it needs to
//! draw (how many requests arrive, what they carry, how long they take) comes
//! from a [`Workload`], so scenarios can be replayed exactly.

use std::collections::VecDeque;
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Uniform};

use crate::config::SimulationConfig;
use crate::error::ConfigError;

pub trait Workload {
    /// Number of requests created by one generation step
    fn arrivals(&mut self) -> usize;

    /// Value embedded in a new request's payload
    fn payload_value(&mut self) -> u16;

    /// Length of the blocking work step for one request
    fn processing_delay(&mut self) -> Duration;
}

impl<W: Workload + ?Sized> Workload for Box<W> {
    fn arrivals(&mut self) -> usize {
        (**self).arrivals()
    }

    fn payload_value(&mut self) -> u16 {
        (**self).payload_value()
    }

    fn processing_delay(&mut self) -> Duration {
        (**self).processing_delay()
    }
}

/// Uniformly distributed arrivals, payloads and work durations.
#[derive(Debug, Clone)]
pub struct RandomWorkload {
    arrivals: Uniform<usize>,
    payload: Uniform<u16>,
    delay: Uniform<Duration>,
    rng: StdRng,
}

impl RandomWorkload {
    /// Build from config ranges. `seed` makes the draw sequence reproducible.
    pub fn new(config: &SimulationConfig, seed: Option<u64>) -> Result<Self, ConfigError> {
        config.validate()?;

        let arrivals = Uniform::new_inclusive(0, config.max_arrivals)
            .map_err(|e| ConfigError::Distribution(e.to_string()))?;
        let payload = Uniform::new_inclusive(
            *config.payload_range.start(),
            *config.payload_range.end(),
        )
        .map_err(|e| ConfigError::Distribution(e.to_string()))?;
        let delay = Uniform::new_inclusive(
            *config.processing_delay.start(),
            *config.processing_delay.end(),
        )
        .map_err(|e| ConfigError::Distribution(e.to_string()))?;

        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_os_rng(),
        };

        Ok(RandomWorkload {
            arrivals,
            payload,
            delay,
            rng,
        })
    }

    /// Uses the seed carried by the config, if any.
    pub fn from_config(config: &SimulationConfig) -> Result<Self, ConfigError> {
        Self::new(config, config.seed)
    }
}

impl Workload for RandomWorkload {
    fn arrivals(&mut self) -> usize {
        self.arrivals.sample(&mut self.rng)
    }

    fn payload_value(&mut self) -> u16 {
        self.payload.sample(&mut self.rng)
    }

    fn processing_delay(&mut self) -> Duration {
        self.delay.sample(&mut self.rng)
    }
}

/// Replays a fixed list of arrival counts, then repeats `fallback`.
///
/// Payload values and work durations are constant.
#[derive(Debug, Clone)]
pub struct ScriptedWorkload {
    arrivals: VecDeque<usize>,
    fallback: usize,
    payload_value: u16,
    delay: Duration,
}

impl ScriptedWorkload {
    pub fn new(arrivals: impl IntoIterator<Item = usize>) -> Self {
        ScriptedWorkload {
            arrivals: arrivals.into_iter().collect(),
            fallback: 0,
            payload_value: 100,
            delay: Duration::from_millis(200),
        }
    }

    /// Every generation step creates exactly `count` requests.
    pub fn constant(count: usize) -> Self {
        Self::new(Vec::new()).then_repeat(count)
    }

    pub fn then_repeat(mut self, count: usize) -> Self {
        self.fallback = count;
        self
    }

    pub fn with_payload_value(mut self, value: u16) -> Self {
        self.payload_value = value;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

impl Workload for ScriptedWorkload {
    fn arrivals(&mut self) -> usize {
        self.arrivals.pop_front().unwrap_or(self.fallback)
    }

    fn payload_value(&mut self) -> u16 {
        self.payload_value
    }

    fn processing_delay(&mut self) -> Duration {
        self.delay
    }
}

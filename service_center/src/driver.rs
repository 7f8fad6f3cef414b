//! The tick loop.
//!
//! A run moves through three phases:
//!
//! - `Running`: ticks 1..=N, each one generation step, one processing step
//!   and a fixed pause
//! - `Draining`: process until the queue is empty
//! - `Done`: confirm every request is complete, report, stop
//!
//! An external stop moves `Running` straight to `Draining`. It is observed at
//! the start of a tick and between slices of the inter-tick pause; a request
//! already being worked on always finishes.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use log::{debug, info};

use crate::SimEvent;
use crate::center::{CenterStats, ServiceCenter};
use crate::config::SimulationConfig;
use crate::error::SimError;
use crate::observer::Observer;
use crate::pause::Pause;
use crate::workload::Workload;

/// Longest uninterrupted stretch of the inter-tick pause.
const PAUSE_SLICE: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Running,
    Draining,
    Done,
}

/// Cancellation flag shared with whoever can interrupt the run.
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trigger(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_triggered(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// What happened over a complete run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Ticks that executed generation
    pub ticks_run: usize,
    pub interrupted: bool,
    pub generated: usize,
    pub processed: usize,
    /// Requests processed in the drain phase
    pub drained: usize,
    pub stats: CenterStats,
}

pub struct Simulation<W, P> {
    config: SimulationConfig,
    center: ServiceCenter<W, P>,
    stop: StopSignal,
    phase: Phase,
    ticks_run: usize,
}

impl<W: Workload, P: Pause> Simulation<W, P> {
    pub fn new(
        config: SimulationConfig,
        workload: W,
        pause: P,
        stop: StopSignal,
    ) -> Result<Self, SimError> {
        config.validate()?;
        let center = ServiceCenter::new(workload, pause).with_capacity(config.max_queue_size);
        Ok(Simulation {
            config,
            center,
            stop,
            phase: Phase::Running,
            ticks_run: 0,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn center(&self) -> &ServiceCenter<W, P> {
        &self.center
    }

    /// Runs all phases to completion.
    pub fn run(mut self, observer: &mut impl Observer) -> Result<RunSummary, SimError> {
        let interrupted = self.run_ticks(observer);
        if interrupted {
            observer.on_event(&SimEvent::Interrupted);
        }

        self.enter(Phase::Draining);
        let drained = self.drain(observer);
        observer.on_event(&SimEvent::Drained { processed: drained });

        self.enter(Phase::Done);
        let processed = self.center.join()?;
        observer.on_event(&SimEvent::Finished);

        let stats = self.center.stats().clone();
        info!(
            "run finished: {} tick(s), {} generated, {} processed ({} while draining), interrupted: {}",
            self.ticks_run, stats.generated, processed, drained, interrupted
        );

        Ok(RunSummary {
            ticks_run: self.ticks_run,
            interrupted,
            generated: stats.generated,
            processed,
            drained,
            stats,
        })
    }

    fn enter(&mut self, phase: Phase) {
        debug!(
            "{:?} -> {:?} with {} request(s) queued",
            self.phase,
            phase,
            self.center.len()
        );
        self.phase = phase;
    }

    /// Returns true if the loop ended because of a stop.
    fn run_ticks(&mut self, observer: &mut impl Observer) -> bool {
        for tick in 1..=self.config.ticks {
            if self.stop.is_triggered() {
                return true;
            }
            self.ticks_run = tick;
            observer.on_event(&SimEvent::TickStarted { tick });

            let created = self.center.generate_request(observer);
            debug!("tick {}: {} new request(s)", tick, created.len());
            // at most one per tick, even if more just arrived
            self.center.process_request(observer);

            if !self.wait(self.config.tick_interval) {
                return true;
            }
        }
        false
    }

    /// Pauses in slices, checking for a stop in between. Returns false if
    /// the wait was cut short.
    fn wait(&mut self, duration: Duration) -> bool {
        let mut remaining = duration;
        while !remaining.is_zero() {
            if self.stop.is_triggered() {
                return false;
            }
            let slice = remaining.min(PAUSE_SLICE);
            self.center.pause_mut().pause(slice);
            remaining -= slice;
        }
        !self.stop.is_triggered()
    }

    fn drain(&mut self, observer: &mut impl Observer) -> usize {
        let mut drained = 0;
        while !self.center.is_empty() {
            if self.center.process_request(observer).is_some() {
                drained += 1;
            }
        }
        drained
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::EventLog;
    use crate::pause::NoPause;
    use crate::workload::ScriptedWorkload;

    fn config(ticks: usize) -> SimulationConfig {
        SimulationConfig {
            ticks,
            ..SimulationConfig::baseline()
        }
    }

    #[test]
    fn stop_signal_is_shared_between_clones() {
        let stop = StopSignal::new();
        let handle = stop.clone();
        assert!(!stop.is_triggered());
        handle.trigger();
        assert!(stop.is_triggered());
    }

    #[test]
    fn tick_interval_is_sliced() {
        let mut sim = Simulation::new(
            config(1),
            ScriptedWorkload::constant(0),
            NoPause::new(),
            StopSignal::new(),
        )
        .unwrap();
        assert!(sim.wait(Duration::from_millis(400)));
        assert_eq!(sim.center.pause_mut().calls(), 8);
        assert_eq!(sim.center.pause_mut().total(), Duration::from_millis(400));
    }

    #[test]
    fn wait_stops_early_when_triggered() {
        let stop = StopSignal::new();
        let mut sim = Simulation::new(
            config(1),
            ScriptedWorkload::constant(0),
            NoPause::new(),
            stop.clone(),
        )
        .unwrap();
        stop.trigger();
        assert!(!sim.wait(Duration::from_millis(400)));
        assert_eq!(sim.center.pause_mut().calls(), 0);
    }

    #[test]
    fn zero_ticks_goes_straight_to_done() {
        let sim = Simulation::new(
            config(0),
            ScriptedWorkload::constant(2),
            NoPause::new(),
            StopSignal::new(),
        )
        .unwrap();
        let mut log = EventLog::new();
        let summary = sim.run(&mut log).unwrap();

        assert_eq!(summary.ticks_run, 0);
        assert_eq!(summary.generated, 0);
        assert_eq!(
            log.events(),
            [SimEvent::Drained { processed: 0 }, SimEvent::Finished]
        );
    }

    #[test]
    fn starts_in_running_phase() {
        let sim = Simulation::new(
            config(3),
            ScriptedWorkload::constant(1),
            NoPause::new(),
            StopSignal::new(),
        )
        .unwrap();
        assert_eq!(sim.phase(), Phase::Running);
        assert!(sim.center().is_empty());
    }

    #[test]
    fn invalid_config_is_refused() {
        let result = Simulation::new(
            config(3).with_max_queue_size(0),
            ScriptedWorkload::constant(1),
            NoPause::new(),
            StopSignal::new(),
        );
        assert!(matches!(result, Err(SimError::Config(_))));
    }
}

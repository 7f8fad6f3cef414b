//! Service center simulation
//!
//! A single worker serves a FIFO queue of requests. Each tick a workload
//! source decides how many new requests arrive (0..=2 by default), the
//! center enqueues them, then serves at most one request with a simulated
//! blocking work step. When the tick budget runs out, or the run is
//! interrupted, the remaining queue is drained before the run finishes.
//!
//! Key pieces:
//! - ServiceCenter: owns the queue and the id counter
//! - Workload: injectable source of arrivals, payloads and work durations
//! - Simulation: the Running -> Draining -> Done driver
//! - Observer: receives every [`SimEvent`] (console output, event logs)

use std::fmt;

pub mod center;
pub mod config;
pub mod driver;
pub mod error;
pub mod observer;
pub mod pause;
pub mod request;
pub mod workload;

pub use center::{CenterStats, ServiceCenter};
pub use config::SimulationConfig;
pub use driver::{Phase, RunSummary, Simulation, StopSignal};
pub use error::{ConfigError, ServiceError, SimError};
pub use observer::{ConsoleObserver, EventLog, Observer};
pub use pause::{NoPause, Pause, ThreadPause};
pub use request::{Request, RequestId};
pub use workload::{RandomWorkload, ScriptedWorkload, Workload};

/// Everything observable that happens during a run, in emission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimEvent {
    /// A new tick of the running phase begins (1-based)
    TickStarted { tick: usize },

    /// A request was appended to the queue; `depth` includes it
    Enqueued { id: RequestId, depth: usize },

    /// Generation stopped early because the queue is at capacity
    QueueFull { capacity: usize },

    /// A processing attempt found nothing to do
    QueueEmpty,

    /// A request left the head of the queue and work began
    ProcessingStarted { id: RequestId },

    /// The work step for a request finished and it was marked complete
    ProcessingDone { id: RequestId },

    /// An external stop was observed while running
    Interrupted,

    /// The drain phase finished after processing this many requests
    Drained { processed: usize },

    /// All enqueued work is complete, the run is over
    Finished,
}

impl SimEvent {
    /// Whether this event has a console line. `Drained` is bookkeeping only.
    pub fn is_printable(&self) -> bool {
        !matches!(self, SimEvent::Drained { .. })
    }
}

impl fmt::Display for SimEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimEvent::TickStarted { tick } => write!(f, "\n-- Tick {} --", tick),
            SimEvent::Enqueued { id, depth } => {
                write!(f, "[NEW ] added request #{} (in queue: {})", id, depth)
            }
            SimEvent::QueueFull { capacity } => write!(
                f,
                "[FULL] queue is at capacity ({}), request not accepted",
                capacity
            ),
            SimEvent::QueueEmpty => write!(f, "[INFO] queue is empty, nothing to process"),
            SimEvent::ProcessingStarted { id } => write!(f, "[PROC] processing #{} ...", id),
            SimEvent::ProcessingDone { id } => write!(f, "[DONE] finished #{}", id),
            SimEvent::Interrupted => write!(f, "\nStopped by user."),
            SimEvent::Drained { processed } => {
                write!(f, "drained {} remaining request(s)", processed)
            }
            SimEvent::Finished => write!(f, "\nAll requests processed. Done."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn console_lines_carry_category_tags() {
        let id = RequestId::new(7);
        assert_eq!(
            SimEvent::Enqueued { id, depth: 3 }.to_string(),
            "[NEW ] added request #7 (in queue: 3)"
        );
        assert_eq!(
            SimEvent::QueueEmpty.to_string(),
            "[INFO] queue is empty, nothing to process"
        );
        assert_eq!(
            SimEvent::ProcessingStarted { id }.to_string(),
            "[PROC] processing #7 ..."
        );
        assert_eq!(
            SimEvent::ProcessingDone { id }.to_string(),
            "[DONE] finished #7"
        );
    }

    #[test]
    fn banners_start_on_a_blank_line() {
        assert_eq!(SimEvent::TickStarted { tick: 4 }.to_string(), "\n-- Tick 4 --");
        assert!(SimEvent::Interrupted.to_string().starts_with('\n'));
        assert!(SimEvent::Finished.to_string().starts_with('\n'));
    }

    #[test]
    fn drained_is_not_printed() {
        assert!(!SimEvent::Drained { processed: 2 }.is_printable());
        assert!(SimEvent::Finished.is_printable());
    }
}

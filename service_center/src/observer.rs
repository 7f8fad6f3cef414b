use std::io::Write;

use log::error;

use crate::SimEvent;
use crate::request::RequestId;

pub trait Observer {
    fn on_event(&mut self, event: &SimEvent);
}

impl<O: Observer + ?Sized> Observer for &mut O {
    fn on_event(&mut self, event: &SimEvent) {
        (**self).on_event(event);
    }
}

/// Prints one line per event to a writer (stdout in the binary).
pub struct ConsoleObserver<W: Write> {
    out: W,
    failed: bool,
}

impl<W: Write> ConsoleObserver<W> {
    pub fn new(out: W) -> Self {
        ConsoleObserver { out, failed: false }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Observer for ConsoleObserver<W> {
    fn on_event(&mut self, event: &SimEvent) {
        if !event.is_printable() {
            return;
        }
        let written = writeln!(self.out, "{}", event).and_then(|_| self.out.flush());
        if let Err(e) = written {
            // only report the first failure, the run carries on regardless
            if !self.failed {
                error!("console output failed: {}", e);
                self.failed = true;
            }
        }
    }
}

/// Keeps every event in emission order.
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    events: Vec<SimEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[SimEvent] {
        &self.events
    }

    /// Ids in the order they were enqueued
    pub fn enqueued(&self) -> Vec<RequestId> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SimEvent::Enqueued { id, .. } => Some(*id),
                _ => None,
            })
            .collect()
    }

    /// Ids in the order their processing started
    pub fn started(&self) -> Vec<RequestId> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SimEvent::ProcessingStarted { id } => Some(*id),
                _ => None,
            })
            .collect()
    }

    /// Ids in the order they were marked done
    pub fn completed(&self) -> Vec<RequestId> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SimEvent::ProcessingDone { id } => Some(*id),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, pred: impl Fn(&SimEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl Observer for EventLog {
    fn on_event(&mut self, event: &SimEvent) {
        self.events.push(event.clone());
    }
}

use std::collections::VecDeque;
use std::time::Duration;

use chrono::Utc;
use log::{debug, warn};

use crate::SimEvent;
use crate::error::ServiceError;
use crate::observer::Observer;
use crate::pause::Pause;
use crate::request::{Request, RequestId};
use crate::workload::Workload;

/// Running totals kept by the service center.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CenterStats {
    pub generated: usize,
    pub processed: usize,
    pub empty_polls: usize,
    pub rejected: usize,
    pub max_depth: usize,
    /// Sum over processed requests of creation -> start of work
    pub total_wait: Duration,
    /// Sum of work step durations
    pub total_work: Duration,
}

impl CenterStats {
    pub fn mean_wait(&self) -> Option<Duration> {
        Self::mean(self.total_wait, self.processed)
    }

    pub fn mean_work(&self) -> Option<Duration> {
        Self::mean(self.total_work, self.processed)
    }

    fn mean(total: Duration, n: usize) -> Option<Duration> {
        u32::try_from(n).ok().filter(|&n| n > 0).map(|n| total / n)
    }
}

/// Single-worker FIFO service center.
///
/// Owns the queue and the id counter; nothing else mutates either.
pub struct ServiceCenter<W, P> {
    queue: VecDeque<Request>,
    next_id: u64,
    capacity: Option<usize>,
    // enqueued but not yet marked complete
    unfinished: usize,
    stats: CenterStats,
    workload: W,
    pause: P,
}

impl<W: Workload, P: Pause> ServiceCenter<W, P> {
    pub fn new(workload: W, pause: P) -> Self {
        ServiceCenter {
            queue: VecDeque::new(),
            next_id: 1,
            capacity: None,
            unfinished: 0,
            stats: CenterStats::default(),
            workload,
            pause,
        }
    }

    /// Bounded queue; `None` keeps it unbounded.
    pub fn with_capacity(mut self, capacity: Option<usize>) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    pub fn stats(&self) -> &CenterStats {
        &self.stats
    }

    pub fn pause_mut(&mut self) -> &mut P {
        &mut self.pause
    }

    /// Requests waiting in the queue, head first
    pub fn queued(&self) -> impl Iterator<Item = &Request> {
        self.queue.iter()
    }

    fn is_full(&self) -> bool {
        self.capacity.is_some_and(|cap| self.queue.len() >= cap)
    }

    /// Appends to the tail. Returns the new queue length.
    pub fn enqueue(&mut self, request: Request) -> Result<usize, ServiceError> {
        if let Some(capacity) = self.capacity.filter(|_| self.is_full()) {
            return Err(ServiceError::QueueFull { capacity });
        }
        self.queue.push_back(request);
        self.unfinished += 1;
        self.stats.max_depth = self.stats.max_depth.max(self.queue.len());
        Ok(self.queue.len())
    }

    /// Creates 0..=max_arrivals new requests and enqueues them in order.
    ///
    /// If the queue fills up, the rest of this step's arrivals are turned
    /// away before an id is assigned, so ids stay contiguous.
    pub fn generate_request(&mut self, observer: &mut impl Observer) -> Vec<RequestId> {
        let count = self.workload.arrivals();
        let mut created = Vec::with_capacity(count);

        for _ in 0..count {
            if let Some(capacity) = self.capacity.filter(|_| self.is_full()) {
                let turned_away = count - created.len();
                warn!(
                    "queue at capacity {}, turning away {} arrival(s)",
                    capacity, turned_away
                );
                self.stats.rejected += turned_away;
                observer.on_event(&SimEvent::QueueFull { capacity });
                break;
            }

            let id = RequestId::new(self.next_id);
            let payload = Request::payload_for(self.workload.payload_value());
            let request = Request::new(id, payload);

            // capacity was checked above, this cannot fail
            match self.enqueue(request) {
                Ok(depth) => {
                    self.next_id += 1;
                    self.stats.generated += 1;
                    created.push(id);
                    observer.on_event(&SimEvent::Enqueued { id, depth });
                }
                Err(e) => {
                    warn!("request #{} not enqueued: {}", id, e);
                    break;
                }
            }
        }

        created
    }

    /// Serves the request at the head of the queue, if any.
    ///
    /// Blocks for the drawn work duration. The returned request has been
    /// marked complete.
    pub fn process_request(&mut self, observer: &mut impl Observer) -> Option<Request> {
        let Some(request) = self.queue.pop_front() else {
            self.stats.empty_polls += 1;
            observer.on_event(&SimEvent::QueueEmpty);
            return None;
        };

        let id = request.id();
        let waited = request.age(Utc::now());
        observer.on_event(&SimEvent::ProcessingStarted { id });

        let work = self.workload.processing_delay();
        debug!(
            "request #{} ({}) waited {:?}, working for {:?}",
            id,
            request.payload(),
            waited,
            work
        );
        self.pause.pause(work);

        observer.on_event(&SimEvent::ProcessingDone { id });
        self.task_done();
        self.stats.processed += 1;
        self.stats.total_wait += waited;
        self.stats.total_work += work;

        Some(request)
    }

    fn task_done(&mut self) {
        self.unfinished = self.unfinished.saturating_sub(1);
    }

    /// Confirms every enqueued request has been marked complete.
    ///
    /// With a single worker there is nobody to wait for: outstanding work at
    /// this point is reported instead of blocking forever.
    pub fn join(&self) -> Result<usize, ServiceError> {
        if self.unfinished > 0 {
            return Err(ServiceError::Unfinished {
                pending: self.unfinished,
            });
        }
        Ok(self.stats.processed)
    }
}

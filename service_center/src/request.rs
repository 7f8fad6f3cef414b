use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};

/// Identifier handed out by the service center, unique for the whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

impl RequestId {
    pub fn new(value: u64) -> Self {
        RequestId(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A unit of simulated work. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    id: RequestId,
    created_at: DateTime<Utc>,
    payload: String,
}

impl Request {
    pub fn new(id: RequestId, payload: String) -> Self {
        Request {
            id,
            created_at: Utc::now(),
            payload,
        }
    }

    /// Payload text for a drawn value, e.g. `data-417`
    pub fn payload_for(value: u16) -> String {
        format!("data-{}", value)
    }

    pub fn id(&self) -> RequestId {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// Time since creation, zero if `now` is earlier than the creation stamp
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        (now - self.created_at).to_std().unwrap_or(Duration::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_embeds_value() {
        assert_eq!(Request::payload_for(100), "data-100");
        assert_eq!(Request::payload_for(999), "data-999");
    }

    #[test]
    fn age_is_never_negative() {
        let request = Request::new(RequestId::new(1), Request::payload_for(123));
        let before = request.created_at() - chrono::Duration::seconds(5);
        assert_eq!(request.age(before), Duration::ZERO);

        let later = request.created_at() + chrono::Duration::milliseconds(250);
        assert_eq!(request.age(later), Duration::from_millis(250));
    }

    #[test]
    fn ids_order_numerically() {
        assert!(RequestId::new(2) > RequestId::new(1));
        assert_eq!(RequestId::new(42).to_string(), "42");
    }
}

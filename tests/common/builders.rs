//! Test data builders for creating test objects

use chrono::TimeDelta;
use sensorview::{Session, SessionId, Signal};

/// Builder for creating test Sessions
pub struct SessionBuilder {
    id: SessionId,
    duration_secs: Option<i64>,
    totals: Vec<(Signal, usize)>,
}

impl SessionBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            id: SessionId::parse(id).expect("valid session id"),
            duration_secs: None,
            totals: Vec::new(),
        }
    }

    /// Mark the session as ended `secs` after it started
    pub fn ended_after(mut self, secs: i64) -> Self {
        self.duration_secs = Some(secs);
        self
    }

    pub fn total(mut self, signal: Signal, count: usize) -> Self {
        self.totals.push((signal, count));
        self
    }

    pub fn build(self) -> Session {
        let start = self.id.started_at();
        let mut session = Session::new(self.id);
        if let Some(secs) = self.duration_secs {
            session = session.with_end(start + TimeDelta::seconds(secs));
        }
        for (signal, count) in self.totals {
            session = session.with_total(signal, count);
        }
        session
    }

    /// Sample counts, for seeding a memory source
    pub fn counts(&self) -> Vec<(Signal, usize)> {
        self.totals.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_builder() {
        let session = SessionBuilder::new("20250307_100000")
            .ended_after(60)
            .total(Signal::Ecg, 15_000)
            .build();

        assert_eq!(session.total_for(Signal::Ecg), 15_000);
        assert_eq!(session.duration().unwrap().as_secs(), 60);
    }
}

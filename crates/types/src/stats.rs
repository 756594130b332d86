//! Timing and byte counters for a single load

use tokio::time::Instant;

/// Mutable statistics record owned by one loader instance.
///
/// Timestamps are monotonic and clamped so that
/// `request_started_at <= first_byte_at <= load_completed_at` holds for
/// every settled load, even when the caller supplies skewed instants.
#[derive(Debug, Clone, Default)]
pub struct LoadStats {
    /// Set by an explicit abort; never set by a timeout.
    pub aborted: bool,
    pub request_started_at: Option<Instant>,
    pub first_byte_at: Option<Instant>,
    pub load_completed_at: Option<Instant>,
    pub bytes_loaded: u64,
    /// 0 until known from a length header; overridden with the payload
    /// size on success.
    pub bytes_total: u64,
}

impl LoadStats {
    pub fn mark_request_start(&mut self, now: Instant) {
        self.request_started_at = Some(now);
    }

    /// Record first-byte arrival, clamped against the request start.
    pub fn mark_first_byte(&mut self, now: Instant) {
        if self.first_byte_at.is_some() {
            return;
        }
        let clamped = match self.request_started_at {
            Some(start) => now.max(start),
            None => now,
        };
        self.first_byte_at = Some(clamped);
    }

    pub fn record_chunk(&mut self, len: u64) {
        self.bytes_loaded += len;
    }

    pub fn set_total(&mut self, total: u64) {
        self.bytes_total = total;
    }

    /// Record completion, clamped against the first byte (or request start
    /// when no byte ever arrived).
    pub fn mark_completed(&mut self, now: Instant) {
        let floor = self
            .first_byte_at
            .or(self.request_started_at)
            .unwrap_or(now);
        self.load_completed_at = Some(now.max(floor));
    }

    /// On success both counters equal the decoded payload size, overriding
    /// any total previously inferred from headers.
    pub fn finalize_success(&mut self, payload_len: u64) {
        self.bytes_loaded = payload_len;
        self.bytes_total = payload_len;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn timestamps_are_monotonic_under_skew() {
        let start = Instant::now();
        let earlier = start - Duration::from_millis(250);

        let mut stats = LoadStats::default();
        stats.mark_request_start(start);
        // A skewed clock reports first-byte before the request started.
        stats.mark_first_byte(earlier);
        assert_eq!(stats.first_byte_at, Some(start));

        stats.mark_completed(earlier);
        assert_eq!(stats.load_completed_at, Some(start));
    }

    #[test]
    fn first_byte_is_recorded_once() {
        let start = Instant::now();
        let later = start + Duration::from_millis(10);

        let mut stats = LoadStats::default();
        stats.mark_request_start(start);
        stats.mark_first_byte(later);
        stats.mark_first_byte(later + Duration::from_millis(50));
        assert_eq!(stats.first_byte_at, Some(later));
    }

    #[test]
    fn chunks_accumulate_and_success_overrides_totals() {
        let mut stats = LoadStats::default();
        stats.set_total(1000);
        stats.record_chunk(300);
        stats.record_chunk(200);
        assert_eq!(stats.bytes_loaded, 500);
        assert_eq!(stats.bytes_total, 1000);

        stats.finalize_success(512);
        assert_eq!(stats.bytes_loaded, 512);
        assert_eq!(stats.bytes_total, 512);
    }

    #[test]
    fn completion_without_any_byte_falls_back_to_request_start() {
        let start = Instant::now();
        let mut stats = LoadStats::default();
        stats.mark_request_start(start);
        stats.mark_completed(start - Duration::from_millis(5));
        assert_eq!(stats.load_completed_at, Some(start));
    }
}

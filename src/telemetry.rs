//! Turn metrics
//!
//! Every chat turn records how it ended, how long it took and how many
//! fragments the model streamed, labeled by the retrieval source the
//! question was routed to. Nothing is exported unless the `prometheus`
//! feature installs an exporter.
//!
//! # Metrics
//!
//! - `search_agent_turns_total`: Counter of finished turns by source and status
//! - `search_agent_turn_duration_seconds`: Histogram of turn duration
//! - `search_agent_fragments`: Histogram of streamed fragments per answer
//! - `search_agent_active_turns`: Gauge of turns in flight
//! - `search_agent_retrievals_total`: Counter of retrieval calls (recorded by the router)
//!
//! # Examples
//!
//! ```
//! use search_agent::telemetry::TurnMetrics;
//! use search_agent::retrieval::Source;
//!
//! let metrics = TurnMetrics::new(Source::Wikipedia);
//! metrics.record_completion(12);
//! ```

use crate::retrieval::Source;
use metrics::{decrement_gauge, histogram, increment_counter, increment_gauge};
use std::cell::Cell;
use std::time::Instant;

/// Metrics collection for a single chat turn
///
/// Records exactly once: the first `record_*` call wins and later calls
/// are ignored. A guard dropped without recording still releases the
/// active-turn gauge.
#[derive(Debug)]
pub struct TurnMetrics {
    source: Source,
    start: Instant,
    recorded: Cell<bool>,
}

impl TurnMetrics {
    /// Start tracking a turn routed to `source`
    pub fn new(source: Source) -> Self {
        increment_gauge!("search_agent_active_turns", 1.0);

        Self {
            source,
            start: Instant::now(),
            recorded: Cell::new(false),
        }
    }

    /// Record a turn whose answer streamed to the end
    ///
    /// # Arguments
    ///
    /// * `fragments` - Number of text fragments displayed
    pub fn record_completion(&self, fragments: usize) {
        if !self.mark_recorded() {
            return;
        }

        histogram!(
            "search_agent_fragments",
            fragments as f64,
            "source" => self.source.label()
        );
        self.finish("success");
    }

    /// Record a turn aborted by a retrieval or generation failure
    ///
    /// # Arguments
    ///
    /// * `stage` - Where the turn failed ("retrieval" or "generation")
    pub fn record_failure(&self, stage: &str) {
        if !self.mark_recorded() {
            return;
        }

        tracing::debug!("Turn routed to {} failed during {}", self.source, stage);
        self.finish(&format!("{}_error", stage));
    }

    /// Source label this turn is attributed to
    pub fn source(&self) -> Source {
        self.source
    }

    /// Elapsed time since the turn started
    pub fn elapsed(&self) -> std::time::Duration {
        self.start.elapsed()
    }

    fn mark_recorded(&self) -> bool {
        !self.recorded.replace(true)
    }

    fn finish(&self, status: &str) {
        histogram!(
            "search_agent_turn_duration_seconds",
            self.start.elapsed().as_secs_f64(),
            "source" => self.source.label()
        );
        increment_counter!(
            "search_agent_turns_total",
            "source" => self.source.label(),
            "status" => status.to_string()
        );
        decrement_gauge!("search_agent_active_turns", 1.0);
    }
}

impl Drop for TurnMetrics {
    fn drop(&mut self) {
        if !self.recorded.get() {
            decrement_gauge!("search_agent_active_turns", 1.0);
        }
    }
}

/// Initializes the metrics exporter for Prometheus
///
/// A no-op unless the crate is built with the `prometheus` feature.
pub fn init_metrics_exporter() {
    #[cfg(feature = "prometheus")]
    {
        use metrics_exporter_prometheus::PrometheusBuilder;
        let _ = PrometheusBuilder::new().install().map_err(|e| {
            tracing::warn!("Failed to install Prometheus exporter: {}", e);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_metrics_source() {
        let metrics = TurnMetrics::new(Source::Arxiv);
        assert_eq!(metrics.source(), Source::Arxiv);
        assert!(metrics.elapsed().as_secs() < 5);
    }

    #[test]
    fn test_record_completion_sets_flag() {
        let metrics = TurnMetrics::new(Source::DuckDuckGo);
        metrics.record_completion(3);
        assert!(metrics.recorded.get());
    }

    #[test]
    fn test_record_failure_sets_flag() {
        let metrics = TurnMetrics::new(Source::Wikipedia);
        metrics.record_failure("retrieval");
        assert!(metrics.recorded.get());
    }

    #[test]
    fn test_records_only_once() {
        let metrics = TurnMetrics::new(Source::Wikipedia);
        assert!(metrics.mark_recorded());
        assert!(!metrics.mark_recorded());
        // Already recorded; both calls are no-ops
        metrics.record_completion(1);
        metrics.record_failure("generation");
        assert!(metrics.recorded.get());
    }

    #[test]
    fn test_drop_without_recording() {
        let _metrics = TurnMetrics::new(Source::Arxiv);
    }

    #[test]
    fn test_init_metrics_exporter() {
        init_metrics_exporter();
    }
}

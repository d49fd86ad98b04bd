// crates/observability/src/lib.rs

use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use voxcal_core::IntentKind;

pub mod metrics;

pub use metrics::{MetricType, Metrics};

/// Metrics collector
pub struct MetricsCollector {
    enabled: bool,
    metrics: Arc<Metrics>,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::with_enabled(true)
    }

    /// A disabled collector accepts every call and records nothing.
    pub fn with_enabled(enabled: bool) -> Self {
        Self {
            enabled,
            metrics: Arc::new(Metrics::new()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn record(&self, metric: MetricType, value: f64) {
        if self.enabled {
            self.metrics.record(metric, value);
        }
    }

    pub fn add(&self, metric: MetricType, value: f64) {
        if self.enabled {
            self.metrics.add(metric, value);
        }
    }

    pub fn increment(&self, metric: MetricType) {
        if self.enabled {
            self.metrics.increment(metric);
        }
    }

    /// Counts one finished turn.
    pub fn observe_turn(&self, intent: IntentKind, elapsed: Duration) {
        self.increment(MetricType::Turns);
        self.increment(MetricType::Intent(intent));
        self.record(
            MetricType::LastTurnDurationMs,
            elapsed.as_secs_f64() * 1000.0,
        );
    }

    pub fn summary(&self) -> MetricsSummary {
        self.metrics.get_summary()
    }

    pub fn log_summary(&self) {
        if !self.enabled {
            return;
        }
        let summary = self.summary();
        info!(
            turns = summary.turns,
            clarifications = summary.clarifications,
            not_found = summary.not_found,
            service_failures = summary.service_failures,
            unrecognized = summary.unrecognized,
            intents = ?summary.intents,
            "Conversation metrics"
        );
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricsSummary {
    pub turns: u64,
    /// Turns per intent name; intents never seen are left out.
    pub intents: BTreeMap<String, u64>,
    pub clarifications: u64,
    pub not_found: u64,
    pub service_failures: u64,
    pub unrecognized: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observed_turns_show_up_in_summary() {
        let collector = MetricsCollector::new();
        collector.observe_turn(IntentKind::CreateEvent, Duration::from_millis(40));
        collector.observe_turn(IntentKind::Unknown, Duration::from_millis(2));
        collector.increment(MetricType::Unrecognized);

        let summary = collector.summary();
        assert_eq!(summary.turns, 2);
        assert_eq!(summary.unrecognized, 1);
        assert_eq!(summary.intents.get("create_event"), Some(&1));

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["intents"]["unknown"], 1);
    }

    #[test]
    fn test_disabled_collector_records_nothing() {
        let collector = MetricsCollector::with_enabled(false);
        collector.observe_turn(IntentKind::Greeting, Duration::from_millis(1));
        collector.increment(MetricType::ServiceFailures);

        assert!(!collector.is_enabled());
        assert_eq!(collector.summary(), MetricsSummary::default());
    }
}

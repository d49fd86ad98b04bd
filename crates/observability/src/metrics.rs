// crates/observability/src/metrics.rs

use crate::MetricsSummary;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use voxcal_core::IntentKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricType {
    Turns,
    Intent(IntentKind),
    Clarifications,
    NotFound,
    ServiceFailures,
    Unrecognized,
    LastTurnDurationMs,
}

#[derive(Default)]
pub struct Metrics {
    values: RwLock<HashMap<MetricType, f64>>,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, metric: MetricType, value: f64) {
        let mut values = self.values.write();
        values.insert(metric, value);
    }

    pub fn add(&self, metric: MetricType, value: f64) {
        let mut values = self.values.write();
        *values.entry(metric).or_insert(0.0) += value;
    }

    pub fn increment(&self, metric: MetricType) {
        self.add(metric, 1.0);
    }

    pub fn get_summary(&self) -> MetricsSummary {
        let values = self.values.read();
        let count = |metric: MetricType| values.get(&metric).copied().unwrap_or_default() as u64;

        let intents = IntentKind::ALL
            .iter()
            .filter_map(|kind| {
                let seen = count(MetricType::Intent(*kind));
                (seen > 0).then(|| (kind.name().to_string(), seen))
            })
            .collect::<BTreeMap<_, _>>();

        MetricsSummary {
            turns: count(MetricType::Turns),
            intents,
            clarifications: count(MetricType::Clarifications),
            not_found: count(MetricType::NotFound),
            service_failures: count(MetricType::ServiceFailures),
            unrecognized: count(MetricType::Unrecognized),
        }
    }

    pub fn get(&self, metric: MetricType) -> Option<f64> {
        let values = self.values.read();
        values.get(&metric).copied()
    }
}

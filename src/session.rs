// src/session.rs

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, info_span, Instrument};
use uuid::Uuid;
use voxcal_actions::{Dispatcher, Outcome, Reply};
use voxcal_core::{DialogueState, Intent, Utterance};
use voxcal_nlu::NluEngine;
use voxcal_observability::{MetricType, MetricsCollector};

/// One answered utterance.
#[derive(Debug, Clone)]
pub struct Turn {
    pub utterance_id: Uuid,
    pub intent: Intent,
    pub reply: Reply,
}

/// Owns the dialogue state of one conversation and runs turns strictly one
/// after another.
pub struct Conversation {
    nlu: NluEngine,
    dispatcher: Dispatcher,
    state: DialogueState,
    metrics: Arc<MetricsCollector>,
}

impl Conversation {
    pub fn new(nlu: NluEngine, dispatcher: Dispatcher, metrics: Arc<MetricsCollector>) -> Self {
        Self {
            nlu,
            dispatcher,
            state: DialogueState::new(),
            metrics,
        }
    }

    pub fn state(&self) -> &DialogueState {
        &self.state
    }

    pub fn metrics(&self) -> &Arc<MetricsCollector> {
        &self.metrics
    }

    /// Classifies, dispatches and answers one utterance.
    pub async fn handle_utterance(&mut self, text: &str) -> Turn {
        let utterance = Utterance::new(text);
        let span = info_span!("turn", utterance_id = %utterance.id);

        async {
            let started = Instant::now();
            debug!(text = %utterance.text, "Utterance received");

            let intent = self.nlu.classify_and_extract(&utterance.text, &self.state);
            let reply = self.dispatcher.handle(&intent, &mut self.state).await;

            self.metrics.observe_turn(intent.kind, started.elapsed());
            if let Some(metric) = outcome_metric(reply.outcome) {
                self.metrics.increment(metric);
            }
            info!(intent = %intent.kind, outcome = ?reply.outcome, "Turn answered");

            Turn {
                utterance_id: utterance.id,
                intent,
                reply,
            }
        }
        .instrument(span)
        .await
    }

    /// Response text only.
    pub async fn respond(&mut self, text: &str) -> String {
        self.handle_utterance(text).await.reply.text
    }
}

fn outcome_metric(outcome: Outcome) -> Option<MetricType> {
    match outcome {
        Outcome::Completed => None,
        Outcome::Clarification => Some(MetricType::Clarifications),
        Outcome::NotFound => Some(MetricType::NotFound),
        Outcome::ServiceFailure => Some(MetricType::ServiceFailures),
        Outcome::Unrecognized => Some(MetricType::Unrecognized),
    }
}

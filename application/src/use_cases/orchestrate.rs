//! Orchestrate use case
//!
//! Entry point of the engine: resolves the model list, runs the configured
//! topology, combines contributions where the topology asks for it, updates
//! the performance ledger and returns a [`ResponseEnvelope`]. It never
//! returns an error; every failure ends up in the envelope.

use crate::config::ExecutionParams;
use crate::ledger::PerformanceLedger;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::llm_gateway::LlmGateway;
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::use_cases::collaborate::Collaboration;
use crate::use_cases::combine::Combiner;
use crate::use_cases::invoke_model::InvocationScope;
use ensemble_domain::{
    CollaborationConfig, OrchestrationError, ResponseEnvelope, RunPhase, RunTracker,
    SituationalContext,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Use case for running one request through a model ensemble
pub struct OrchestrateUseCase {
    gateway: Arc<dyn LlmGateway>,
    ledger: Arc<PerformanceLedger>,
    params: ExecutionParams,
    logger: Arc<dyn ConversationLogger>,
}

impl OrchestrateUseCase {
    pub fn new(gateway: Arc<dyn LlmGateway>) -> Self {
        Self {
            gateway,
            ledger: Arc::new(PerformanceLedger::new()),
            params: ExecutionParams::default(),
            logger: Arc::new(NoConversationLogger),
        }
    }

    /// Share a ledger across use case instances (or inspect it from tests).
    pub fn with_ledger(mut self, ledger: Arc<PerformanceLedger>) -> Self {
        self.ledger = ledger;
        self
    }

    pub fn with_params(mut self, params: ExecutionParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn ledger(&self) -> &Arc<PerformanceLedger> {
        &self.ledger
    }

    /// Run `request` with no progress reporting and no cancellation.
    pub async fn orchestrate(
        &self,
        request: &str,
        config: &CollaborationConfig,
        context: Option<SituationalContext>,
        tools: &[String],
    ) -> ResponseEnvelope {
        self.orchestrate_with_cancellation(request, config, context, tools, CancellationToken::new())
            .await
    }

    /// Run `request`; firing `cancellation` resolves in-flight calls as
    /// cancelled contributions.
    pub async fn orchestrate_with_cancellation(
        &self,
        request: &str,
        config: &CollaborationConfig,
        context: Option<SituationalContext>,
        tools: &[String],
        cancellation: CancellationToken,
    ) -> ResponseEnvelope {
        self.orchestrate_with_progress(request, config, context, tools, &NoProgress, cancellation)
            .await
    }

    pub async fn orchestrate_with_progress(
        &self,
        request: &str,
        config: &CollaborationConfig,
        context: Option<SituationalContext>,
        tools: &[String],
        progress: &dyn ProgressNotifier,
        cancellation: CancellationToken,
    ) -> ResponseEnvelope {
        let started = Instant::now();
        let strategy = config.strategy_label();
        let mut run = RunTracker::new();

        let models = match config.resolve_models() {
            Ok(models) => models,
            Err(error) => {
                warn!("Configuration rejected before dispatch: {}", error);
                run.advance(RunPhase::Failed);
                let envelope =
                    ResponseEnvelope::failed(error, Vec::new(), strategy, elapsed_ms(started));
                self.log_finished(&envelope, &run);
                return envelope;
            }
        };

        let context = context.unwrap_or_else(|| SituationalContext::classify(request));
        info!(
            "Orchestrating with {} models ({})",
            models.len(),
            strategy
        );
        self.logger.log(ConversationEvent::new(
            "run_started",
            json!({
                "request": request,
                "strategy": strategy,
                "models": models.iter().map(|m| m.id.as_str()).collect::<Vec<_>>(),
                "context": context,
                "tools": tools,
            }),
        ));

        let scope = InvocationScope::new(cancellation.clone())
            .with_context(Some(context))
            .with_tools(tools.to_vec())
            .with_call_timeout(self.params.call_timeout);

        let outcome = Collaboration::new(&self.gateway, &scope, progress)
            .run(config.topology, request, &models)
            .await;

        for contribution in &outcome.contributions {
            self.logger.log(ConversationEvent::new(
                "contribution",
                json!({
                    "model_id": contribution.model_id,
                    "outcome": contribution.outcome,
                    "latency_ms": contribution.latency_ms,
                    "confidence": contribution.confidence,
                }),
            ));
        }

        self.ledger.record(&outcome.contributions);

        if !outcome.contributions.iter().any(|c| c.is_success()) {
            let error = if cancellation.is_cancelled() {
                OrchestrationError::Cancelled
            } else {
                OrchestrationError::AllModelsFailed
            };
            warn!("No model produced an answer: {}", error);
            run.advance(RunPhase::Failed);
            let envelope = ResponseEnvelope::failed(
                error,
                outcome.contributions,
                strategy,
                elapsed_ms(started),
            );
            self.log_finished(&envelope, &run);
            return envelope;
        }

        run.advance(RunPhase::Combining);
        let answer = if config.topology.uses_combination() {
            progress.on_phase_start(RunPhase::Combining, 1);
            let combined = Combiner::new(self.gateway.as_ref(), &scope, self.logger.as_ref())
                .combine(config.combination, request, &outcome.contributions, &models)
                .await;
            progress.on_phase_complete(RunPhase::Combining);
            combined
        } else {
            debug!("{} topology selected its own answer", config.topology);
            outcome.answer
        };

        let envelope = match answer {
            Some(content) => {
                run.advance(RunPhase::Done);
                ResponseEnvelope::completed(
                    content,
                    outcome.contributions,
                    strategy,
                    elapsed_ms(started),
                )
            }
            None => {
                run.advance(RunPhase::Failed);
                ResponseEnvelope::failed(
                    OrchestrationError::AllModelsFailed,
                    outcome.contributions,
                    strategy,
                    elapsed_ms(started),
                )
            }
        };

        info!(
            "Run finished in {} ms ({} of {} models answered)",
            envelope.total_time_ms,
            envelope.contributions.iter().filter(|c| c.is_success()).count(),
            envelope.contributions.len()
        );
        self.log_finished(&envelope, &run);
        envelope
    }

    fn log_finished(&self, envelope: &ResponseEnvelope, run: &RunTracker) {
        self.logger.log(ConversationEvent::new(
            "run_finished",
            json!({
                "phase": run.phase().as_str(),
                "success": envelope.success,
                "strategy": envelope.strategy,
                "error": envelope.error,
                "total_time_ms": envelope.total_time_ms,
            }),
        ));
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}

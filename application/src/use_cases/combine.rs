//! Combination runner
//!
//! Collapses the contributions of a parallel run into one answer. `merge`
//! and `vote` are pure; `synthesis` and `critique_then_improve` make one extra
//! backend call and fall back to the first successful text when it fails.

use crate::ports::conversation_logger::{ConversationEvent, ConversationLogger};
use crate::ports::llm_gateway::{GenerationRequest, LlmGateway};
use crate::use_cases::invoke_model::{InvocationScope, call_backend};
use ensemble_domain::orchestration::combination;
use ensemble_domain::orchestration::value_objects::successful_texts;
use ensemble_domain::{CombinationStrategy, Contribution, ModelDescriptor, ModelRole, PromptTemplate};
use serde_json::json;
use tracing::{debug, info, warn};

pub struct Combiner<'a> {
    gateway: &'a dyn LlmGateway,
    scope: &'a InvocationScope,
    logger: &'a dyn ConversationLogger,
}

impl<'a> Combiner<'a> {
    pub fn new(
        gateway: &'a dyn LlmGateway,
        scope: &'a InvocationScope,
        logger: &'a dyn ConversationLogger,
    ) -> Self {
        Self {
            gateway,
            scope,
            logger,
        }
    }

    /// Combine `contributions` under `strategy`.
    ///
    /// Returns `None` only when no contribution succeeded.
    pub async fn combine(
        &self,
        strategy: CombinationStrategy,
        request: &str,
        contributions: &[Contribution],
        models: &[&ModelDescriptor],
    ) -> Option<String> {
        let texts = successful_texts(contributions);
        let first = texts.first()?.to_string();

        match strategy {
            CombinationStrategy::Merge => Some(combination::merge(contributions)),
            CombinationStrategy::Vote => combination::vote(contributions),
            CombinationStrategy::Synthesis => {
                let Some(model) = pick(models, ModelRole::Synthesizer) else {
                    return Some(first);
                };
                let request = GenerationRequest::for_model(
                    model,
                    PromptTemplate::synthesis_system(),
                    PromptTemplate::synthesis_prompt(request, &texts),
                );
                Some(self.extra_call(strategy, model, &request, first).await)
            }
            CombinationStrategy::CritiqueThenImprove => {
                if texts.len() < 2 {
                    debug!("Only {} successful answer(s), skipping critique", texts.len());
                    return Some(first);
                }
                let Some(model) = pick(models, ModelRole::Critic) else {
                    return Some(first);
                };
                let request = GenerationRequest::for_model(
                    model,
                    PromptTemplate::critique_system(),
                    PromptTemplate::critique_prompt(request, &first),
                );
                Some(self.extra_call(strategy, model, &request, first).await)
            }
        }
    }

    async fn extra_call(
        &self,
        strategy: CombinationStrategy,
        model: &ModelDescriptor,
        request: &GenerationRequest,
        fallback: String,
    ) -> String {
        info!("Combining via {} on {}", strategy, model.id);

        match call_backend(self.gateway, request, self.scope).await {
            Ok(text) => text,
            Err(failure) => {
                warn!(
                    "{} call on {} failed ({}), using first answer",
                    strategy, model.id, failure.message
                );
                self.logger.log(ConversationEvent::new(
                    "combination_fallback",
                    json!({
                        "strategy": strategy.as_str(),
                        "model_id": model.id,
                        "kind": failure.kind.as_str(),
                        "message": failure.message,
                    }),
                ));
                fallback
            }
        }
    }
}

/// Descriptor with `role`, else the first one.
fn pick<'m>(models: &[&'m ModelDescriptor], role: ModelRole) -> Option<&'m ModelDescriptor> {
    models
        .iter()
        .find(|m| m.role == role)
        .or_else(|| models.first())
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::conversation_logger::NoConversationLogger;
    use crate::use_cases::testing::{Script, ScriptedGateway, model};
    use ensemble_domain::FailureKind;
    use std::sync::Mutex;
    use tokio_util::sync::CancellationToken;

    #[derive(Default)]
    struct RecordingLogger {
        events: Mutex<Vec<&'static str>>,
    }

    impl ConversationLogger for RecordingLogger {
        fn log(&self, event: ConversationEvent) {
            self.events.lock().unwrap().push(event.event_type);
        }
    }

    fn ok(m: &ModelDescriptor, text: &str) -> Contribution {
        Contribution::success(m, text, 10, 0.5)
    }

    async fn combine_with(
        gateway: &ScriptedGateway,
        logger: &dyn ConversationLogger,
        strategy: CombinationStrategy,
        contributions: &[Contribution],
        models: &[ModelDescriptor],
    ) -> Option<String> {
        let scope = InvocationScope::new(CancellationToken::new());
        let refs: Vec<&ModelDescriptor> = models.iter().collect();
        Combiner::new(gateway, &scope, logger)
            .combine(strategy, "the question", contributions, &refs)
            .await
    }

    #[tokio::test]
    async fn test_merge_skips_failures() {
        let a = model("a", ModelRole::Primary);
        let b = model("b", ModelRole::Secondary);
        let c = model("c", ModelRole::Secondary);
        let contributions = vec![
            ok(&a, "A"),
            Contribution::failure(&b, FailureKind::Timeout, "slow", 5),
            ok(&c, "B"),
        ];

        let merged = combine_with(
            &ScriptedGateway::new(),
            &NoConversationLogger,
            CombinationStrategy::Merge,
            &contributions,
            &[a, b, c],
        )
        .await;

        assert_eq!(merged.as_deref(), Some("A\n\nB"));
    }

    #[tokio::test]
    async fn test_nothing_successful_gives_none() {
        let a = model("a", ModelRole::Primary);
        let contributions = vec![Contribution::failure(&a, FailureKind::Backend, "x", 1)];

        let combined = combine_with(
            &ScriptedGateway::new(),
            &NoConversationLogger,
            CombinationStrategy::Vote,
            &contributions,
            &[a],
        )
        .await;

        assert!(combined.is_none());
    }

    #[tokio::test]
    async fn test_synthesis_uses_synthesizer_descriptor() {
        let a = model("a", ModelRole::Primary);
        let s = model("s", ModelRole::Synthesizer);
        let gateway = ScriptedGateway::new().reply("s", "one combined answer");
        let contributions = vec![ok(&a, "first"), ok(&s, "second")];

        let combined = combine_with(
            &gateway,
            &NoConversationLogger,
            CombinationStrategy::Synthesis,
            &contributions,
            &[a, s],
        )
        .await;

        assert_eq!(combined.as_deref(), Some("one combined answer"));
        let requests = gateway.requests_for("s");
        assert_eq!(requests.len(), 1);
        assert!(requests[0].user_text.contains("Combine these 2 answers"));
        assert_eq!(requests[0].system_instruction, PromptTemplate::synthesis_system());
    }

    #[tokio::test]
    async fn test_synthesis_failure_falls_back_and_logs() {
        let a = model("a", ModelRole::Primary);
        let b = model("b", ModelRole::Secondary);
        let gateway = ScriptedGateway::new().with("a", Script::Fail("overloaded".to_string()));
        let logger = RecordingLogger::default();
        let contributions = vec![ok(&a, "first"), ok(&b, "second")];

        let combined = combine_with(
            &gateway,
            &logger,
            CombinationStrategy::Synthesis,
            &contributions,
            &[a, b],
        )
        .await;

        // No synthesizer: the first descriptor makes the call
        assert_eq!(gateway.requests_for("a").len(), 1);
        assert_eq!(combined.as_deref(), Some("first"));
        assert_eq!(*logger.events.lock().unwrap(), vec!["combination_fallback"]);
    }

    #[tokio::test]
    async fn test_critique_needs_two_answers() {
        let a = model("a", ModelRole::Critic);
        let b = model("b", ModelRole::Secondary);
        let gateway = ScriptedGateway::new().reply("a", "should not be called");
        let contributions = vec![
            ok(&a, "only"),
            Contribution::failure(&b, FailureKind::Backend, "x", 1),
        ];

        let combined = combine_with(
            &gateway,
            &NoConversationLogger,
            CombinationStrategy::CritiqueThenImprove,
            &contributions,
            &[a, b],
        )
        .await;

        assert_eq!(combined.as_deref(), Some("only"));
        assert!(gateway.requests().is_empty());
    }

    #[tokio::test]
    async fn test_critique_improves_first_text_via_critic() {
        let a = model("a", ModelRole::Primary);
        let c = model("c", ModelRole::Critic);
        let gateway = ScriptedGateway::new().reply("c", "improved");
        let contributions = vec![ok(&a, "first draft"), ok(&c, "other")];

        let combined = combine_with(
            &gateway,
            &NoConversationLogger,
            CombinationStrategy::CritiqueThenImprove,
            &contributions,
            &[a, c],
        )
        .await;

        assert_eq!(combined.as_deref(), Some("improved"));
        let prompt = &gateway.requests_for("c")[0].user_text;
        assert!(prompt.contains("first draft"));
        assert!(!prompt.contains("other"));
    }

    #[tokio::test]
    async fn test_critique_empty_reply_falls_back() {
        let a = model("a", ModelRole::Critic);
        let b = model("b", ModelRole::Secondary);
        let gateway = ScriptedGateway::new().with("a", Script::Empty);
        let contributions = vec![ok(&a, "first"), ok(&b, "second")];

        let combined = combine_with(
            &gateway,
            &NoConversationLogger,
            CombinationStrategy::CritiqueThenImprove,
            &contributions,
            &[a, b],
        )
        .await;

        assert_eq!(combined.as_deref(), Some("first"));
    }
}

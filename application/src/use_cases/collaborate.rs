//! Collaboration topologies
//!
//! Each topology decides which models run, in what order and with which
//! prompt, and yields one [`Contribution`] per model in descriptor order.
//!
//! | Topology     | Dispatch                  | Answer                          |
//! |--------------|---------------------------|---------------------------------|
//! | parallel     | concurrent                | combination strategy            |
//! | sequential   | descriptor order          | last contribution               |
//! | voting       | concurrent                | max `confidence × weight`       |
//! | hierarchical | primary, then the rest    | primary contribution            |

use crate::ports::llm_gateway::LlmGateway;
use crate::ports::progress::ProgressNotifier;
use crate::use_cases::invoke_model::{InvocationScope, invoke_model};
use ensemble_domain::orchestration::combination;
use ensemble_domain::{
    Contribution, FailureKind, ModelDescriptor, ModelRole, PromptTemplate, RunPhase, Topology,
};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Contributions of one topology run plus the answer it selected.
#[derive(Debug, Clone)]
pub struct TopologyOutcome {
    /// One per dispatched model, in descriptor order
    pub contributions: Vec<Contribution>,
    /// Answer chosen by the topology; `None` for parallel runs (the
    /// combination strategy decides) or when no model succeeded.
    pub answer: Option<String>,
}

/// Runs one topology against a resolved model list.
pub struct Collaboration<'a> {
    gateway: &'a Arc<dyn LlmGateway>,
    scope: &'a InvocationScope,
    progress: &'a dyn ProgressNotifier,
}

impl<'a> Collaboration<'a> {
    pub fn new(
        gateway: &'a Arc<dyn LlmGateway>,
        scope: &'a InvocationScope,
        progress: &'a dyn ProgressNotifier,
    ) -> Self {
        Self {
            gateway,
            scope,
            progress,
        }
    }

    pub async fn run(
        &self,
        topology: Topology,
        request: &str,
        models: &[&ModelDescriptor],
    ) -> TopologyOutcome {
        info!("Dispatching {} models ({})", models.len(), topology);
        self.progress.on_phase_start(RunPhase::Dispatching, models.len());

        let outcome = match topology {
            Topology::Parallel => self.parallel(request, models).await,
            Topology::Sequential => self.sequential(request, models).await,
            Topology::Voting => self.voting(request, models).await,
            Topology::Hierarchical => self.hierarchical(request, models).await,
        };

        self.progress.on_phase_complete(RunPhase::Dispatching);
        outcome
    }

    /// Every model concurrently; the combination strategy picks the answer.
    pub async fn parallel(&self, request: &str, models: &[&ModelDescriptor]) -> TopologyOutcome {
        TopologyOutcome {
            contributions: self.fan_out(request, models).await,
            answer: None,
        }
    }

    /// Every model concurrently; the best `confidence × weight` wins.
    pub async fn voting(&self, request: &str, models: &[&ModelDescriptor]) -> TopologyOutcome {
        let contributions = self.fan_out(request, models).await;
        let answer = combination::select_weighted(&contributions, models).and_then(|i| {
            debug!("Vote won by {}", contributions[i].model_id);
            contributions[i].content().map(str::to_string)
        });

        TopologyOutcome {
            contributions,
            answer,
        }
    }

    /// One model at a time; each prompt depends on the role that ran before it.
    pub async fn sequential(&self, request: &str, models: &[&ModelDescriptor]) -> TopologyOutcome {
        let mut contributions: Vec<Contribution> = Vec::with_capacity(models.len());
        let mut prompt = request.to_string();

        for model in models {
            let contribution = invoke_model(self.gateway.as_ref(), model, &prompt, self.scope).await;
            self.progress
                .on_contribution(RunPhase::Dispatching, &contribution);

            prompt = match (model.role, contribution.content()) {
                (ModelRole::Critic, Some(text)) => PromptTemplate::critique_and_improve(request, text),
                (ModelRole::Synthesizer, Some(_)) => {
                    let prior: Vec<(&str, &str)> = contributions
                        .iter()
                        .chain(std::iter::once(&contribution))
                        .filter_map(|c| c.content().map(|t| (c.model_name.as_str(), t)))
                        .collect();
                    PromptTemplate::synthesize_prior(request, &prior)
                }
                _ => request.to_string(),
            };

            contributions.push(contribution);
        }

        let answer = match contributions.last() {
            Some(last) if last.is_success() => last.content().map(str::to_string),
            _ => combination::last_text(&contributions).map(str::to_string),
        };

        TopologyOutcome {
            contributions,
            answer,
        }
    }

    /// Primary first, then every other model seeded with the primary's answer.
    ///
    /// Follow-up contributions are recorded but the answer stays the primary's.
    pub async fn hierarchical(&self, request: &str, models: &[&ModelDescriptor]) -> TopologyOutcome {
        let primary_idx = models.iter().position(|m| m.is_primary()).unwrap_or(0);
        let Some(&primary) = models.get(primary_idx) else {
            return TopologyOutcome {
                contributions: Vec::new(),
                answer: None,
            };
        };

        let mut slots: Vec<Option<Contribution>> = vec![None; models.len()];

        let lead = invoke_model(self.gateway.as_ref(), primary, request, self.scope).await;
        self.progress.on_contribution(RunPhase::Dispatching, &lead);
        let primary_answer = lead.content().map(str::to_string);
        slots[primary_idx] = Some(lead);

        for (i, model) in models.iter().enumerate() {
            if i == primary_idx {
                continue;
            }
            let prompt = match &primary_answer {
                Some(answer) => PromptTemplate::hierarchical_follow_up(request, answer, model.role),
                None => request.to_string(),
            };
            let contribution = invoke_model(self.gateway.as_ref(), model, &prompt, self.scope).await;
            self.progress
                .on_contribution(RunPhase::Dispatching, &contribution);
            slots[i] = Some(contribution);
        }

        let contributions = fill_slots(slots, models);
        let answer = primary_answer
            .or_else(|| combination::first_text(&contributions).map(str::to_string));

        TopologyOutcome {
            contributions,
            answer,
        }
    }

    /// Dispatch `request` to every model concurrently, preserving descriptor order.
    async fn fan_out(&self, request: &str, models: &[&ModelDescriptor]) -> Vec<Contribution> {
        let mut join_set = JoinSet::new();

        for (index, model) in models.iter().enumerate() {
            let gateway = Arc::clone(self.gateway);
            let scope = self.scope.clone();
            let model = (*model).clone();
            let prompt = request.to_string();

            join_set.spawn(async move {
                let contribution = invoke_model(gateway.as_ref(), &model, &prompt, &scope).await;
                (index, contribution)
            });
        }

        let mut slots: Vec<Option<Contribution>> = vec![None; models.len()];

        while let Some(result) = join_set.join_next().await {
            match result {
                Ok((index, contribution)) => {
                    self.progress
                        .on_contribution(RunPhase::Dispatching, &contribution);
                    slots[index] = Some(contribution);
                }
                Err(e) => {
                    warn!("Task join error: {}", e);
                }
            }
        }

        fill_slots(slots, models)
    }
}

/// Replace empty slots (tasks that never reported) with failure contributions.
fn fill_slots(slots: Vec<Option<Contribution>>, models: &[&ModelDescriptor]) -> Vec<Contribution> {
    slots
        .into_iter()
        .zip(models)
        .map(|(slot, model)| {
            slot.unwrap_or_else(|| {
                Contribution::failure(model, FailureKind::Backend, "invocation task did not complete", 0)
            })
        })
        .collect()
}

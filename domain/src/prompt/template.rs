//! Prompt templates for orchestration runs

use crate::context::situational::SituationalContext;
use crate::core::model::{ModelDescriptor, ModelRole};

/// Templates for generating prompts at each stage
pub struct PromptTemplate;

impl PromptTemplate {
    /// Instruction prefix sent as the system instruction of every model call.
    ///
    /// Identity, role statement and capabilities always appear; context
    /// guidance and tool names only when supplied.
    pub fn instruction_prefix(
        model: &ModelDescriptor,
        context: Option<&SituationalContext>,
        tools: &[String],
    ) -> String {
        let mut prompt = format!(
            "You are {}, running on {}/{}.\nRole ({}): {}",
            model.name,
            model.provider,
            model.model,
            model.role,
            model.role.statement()
        );

        if !model.capabilities.is_empty() {
            prompt.push_str(&format!(
                "\nCapabilities: {}.",
                model.capabilities.join(", ")
            ));
        }

        if let Some(context) = context {
            let guidance = context.guidance();
            if !guidance.is_empty() {
                prompt.push_str("\n\nSituational guidance:");
                for line in guidance {
                    prompt.push_str("\n- ");
                    prompt.push_str(line);
                }
            }
        }

        if !tools.is_empty() {
            prompt.push_str(&format!("\n\nAvailable tools: {}.", tools.join(", ")));
        }

        prompt
    }

    /// Sequential step after a critic: critique and improve the prior text.
    pub fn critique_and_improve(request: &str, prior: &str) -> String {
        format!(
            r#"Original request: {}

Previous answer:
{}

Critique the previous answer: point out errors, gaps and unclear reasoning.
Then write an improved answer that fixes them."#,
            request, prior
        )
    }

    /// Sequential step after a synthesizer: merge every prior answer.
    pub fn synthesize_prior(request: &str, prior: &[(&str, &str)]) -> String {
        let mut prompt = format!("Original request: {}\n\nAnswers so far:\n", request);
        for (name, text) in prior {
            prompt.push_str(&format!("\n--- {} ---\n{}\n", name, text));
        }
        prompt.push_str(
            "\nSynthesize these answers into a single, coherent response that keeps the strongest points of each.",
        );
        prompt
    }

    /// Prompt for a non-primary model in a hierarchical run.
    pub fn hierarchical_follow_up(request: &str, primary_answer: &str, role: ModelRole) -> String {
        let instruction = match role {
            ModelRole::Critic => {
                "Critique the primary answer: identify mistakes, risks and missing points."
            }
            _ => "Refine and enhance the primary answer: add missing detail and improve clarity.",
        };
        format!(
            r#"Original request: {}

Primary answer:
{}

{}"#,
            request, primary_answer, instruction
        )
    }

    /// System instruction for the synthesis combination call
    pub fn synthesis_system() -> &'static str {
        r#"You are a moderator combining several expert answers into one.
Keep what the answers agree on, resolve disagreements in favour of the better supported position,
and produce a single self-contained answer."#
    }

    /// User prompt for the synthesis combination call
    pub fn synthesis_prompt(request: &str, answers: &[&str]) -> String {
        let mut prompt = format!(
            "Original request: {}\n\nCombine these {} answers into one:\n",
            request,
            answers.len()
        );
        for (i, answer) in answers.iter().enumerate() {
            prompt.push_str(&format!("\n--- Answer {} ---\n{}\n", i + 1, answer));
        }
        prompt
    }

    /// System instruction for the critique-then-improve combination call
    pub fn critique_system() -> &'static str {
        r#"You are a critical reviewer. First critique the answer you are given,
then output an improved version of it. Output only the improved answer."#
    }

    /// User prompt for the critique-then-improve combination call
    pub fn critique_prompt(request: &str, answer: &str) -> String {
        format!(
            r#"Original request: {}

Answer to critique and improve:
{}"#,
            request, answer
        )
    }
}

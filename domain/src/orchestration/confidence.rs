//! Confidence scoring for contributions
//!
//! This is a shape heuristic, not a calibrated probability: it looks at the
//! response length and the descriptor's role and weight only.

use crate::core::model::{ModelDescriptor, ModelRole};

const BASE: f64 = 0.5;
const LENGTH_BONUS: f64 = 0.2;
const MIN_LEN: usize = 50;
const MAX_LEN: usize = 2000;

/// Score a successful response in `[0, 1]`.
pub fn score(text: &str, model: &ModelDescriptor) -> f64 {
    let mut confidence = BASE;

    let len = text.chars().count();
    if (MIN_LEN..=MAX_LEN).contains(&len) {
        confidence += LENGTH_BONUS;
    }

    confidence += match model.role {
        ModelRole::Primary => 0.2,
        ModelRole::Specialist => 0.1,
        _ => 0.0,
    };

    confidence += (model.weight - 1.0) * 0.1;

    confidence.clamp(0.0, 1.0)
}

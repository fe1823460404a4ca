//! Override gate: combine a resolution with an optional live instruction.
//!
//! Pure and total. A live instruction always outranks the standing policy
//! for the single query it accompanies; it never persists anywhere.

use crate::core::resolve::ResolutionResult;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where an effective policy's text came from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PolicySource {
    /// A live instruction supplied with the query.
    Instruction,
    /// The standing policy claiming `dir`.
    Policy { dir: PathBuf },
    /// No instruction and no governing policy.
    Unpoliced,
}

/// The text that governs one query, plus its provenance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectivePolicy {
    pub text: String,
    pub source: PolicySource,
}

/// A non-blank live instruction wins outright; otherwise the resolved
/// policy applies; otherwise the result is an empty unpoliced policy.
/// Instructions that are blank after trimming are treated as absent.
pub fn effective_policy(
    resolution: &ResolutionResult,
    live_instruction: Option<&str>,
) -> EffectivePolicy {
    if let Some(instruction) = live_instruction {
        if !instruction.trim().is_empty() {
            return EffectivePolicy {
                text: instruction.to_string(),
                source: PolicySource::Instruction,
            };
        }
    }
    match &resolution.policy {
        Some(policy) => EffectivePolicy {
            text: policy.content.clone(),
            source: PolicySource::Policy {
                dir: policy.dir.clone(),
            },
        },
        None => EffectivePolicy {
            text: String::new(),
            source: PolicySource::Unpoliced,
        },
    }
}

pub fn schema() -> serde_json::Value {
    serde_json::json!({
        "name": "gate",
        "version": "1.0.0",
        "description": "Live-instruction override gate applied on top of a resolution",
        "commands": [
            { "name": "effective", "description": "Instruction wins when present and non-blank; policy otherwise" }
        ],
        "storage": []
    })
}

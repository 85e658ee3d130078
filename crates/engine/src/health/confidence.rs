// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Additive confidence score for text-parsed agent state.

use shep_core::{AgentState, AgentType};

pub const BASE_CONFIDENCE: f64 = 0.5;
/// The agent printed how much context it has left
pub const CONTEXT_BOOST: f64 = 0.25;
/// The agent printed a token count
pub const TOKENS_BOOST: f64 = 0.05;
/// Per distinct work indicator, up to [`MAX_WORK_INDICATORS`]
pub const WORK_INDICATOR_BOOST: f64 = 0.1;
pub const MAX_WORK_INDICATORS: usize = 3;
/// Any rate/usage limit indicator
pub const LIMIT_BOOST: f64 = 0.2;
pub const UNKNOWN_TYPE_PENALTY: f64 = 0.3;
/// Working and idle reported at once
pub const CONFLICT_PENALTY: f64 = 0.2;

/// How far the parsed state can be trusted, in `0.0..=1.0`.
pub fn calculate_confidence(state: &AgentState) -> f64 {
    let mut score = BASE_CONFIDENCE;
    if state.context_remaining.is_some() {
        score += CONTEXT_BOOST;
    }
    if state.tokens_used.is_some() {
        score += TOKENS_BOOST;
    }
    score += WORK_INDICATOR_BOOST * state.work_indicators.len().min(MAX_WORK_INDICATORS) as f64;
    if !state.limit_indicators.is_empty() {
        score += LIMIT_BOOST;
    }
    match state.agent_type {
        AgentType::Unknown => score -= UNKNOWN_TYPE_PENALTY,
        AgentType::ClaudeCode
        | AgentType::Codex
        | AgentType::Gemini
        | AgentType::Cursor
        | AgentType::Windsurf
        | AgentType::Aider
        | AgentType::Ollama
        | AgentType::User => {}
    }
    if state.is_working && state.is_idle {
        score -= CONFLICT_PENALTY;
    }
    score.clamp(0.0, 1.0)
}

#[cfg(test)]
#[path = "confidence_tests.rs"]
mod tests;

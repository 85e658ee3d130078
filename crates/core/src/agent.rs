// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Agent kinds running inside multiplexer panes.

use serde::{Deserialize, Serialize};

/// The kind of program occupying a pane.
///
/// Closed set: classifier heuristics (idle prompts, confidence penalties)
/// match on it exhaustively, so adding a kind is a compile-checked change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentType {
    ClaudeCode,
    Codex,
    Gemini,
    Cursor,
    Windsurf,
    Aider,
    Ollama,
    /// A plain user shell, no agent attached
    User,
    #[serde(other)]
    Unknown,
}

impl AgentType {
    pub const ALL: [AgentType; 9] = [
        AgentType::ClaudeCode,
        AgentType::Codex,
        AgentType::Gemini,
        AgentType::Cursor,
        AgentType::Windsurf,
        AgentType::Aider,
        AgentType::Ollama,
        AgentType::User,
        AgentType::Unknown,
    ];

    /// Parse a pane label or alias ("cc", "codex", "gmi", ...).
    ///
    /// Anything unrecognized maps to [`AgentType::Unknown`].
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "cc" | "claude" | "claude_code" | "claude-code" => AgentType::ClaudeCode,
            "cod" | "codex" => AgentType::Codex,
            "gmi" | "gemini" => AgentType::Gemini,
            "cursor" => AgentType::Cursor,
            "ws" | "windsurf" => AgentType::Windsurf,
            "aider" => AgentType::Aider,
            "ollama" => AgentType::Ollama,
            "user" | "shell" => AgentType::User,
            _ => AgentType::Unknown,
        }
    }

    /// Human-facing profile name
    pub fn profile_name(&self) -> &'static str {
        match self {
            AgentType::ClaudeCode => "Claude Code",
            AgentType::Codex => "Codex",
            AgentType::Gemini => "Gemini",
            AgentType::Cursor => "Cursor",
            AgentType::Windsurf => "Windsurf",
            AgentType::Aider => "Aider",
            AgentType::Ollama => "Ollama",
            AgentType::User => "User",
            AgentType::Unknown => "Unknown",
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, AgentType::Unknown)
    }
}

impl std::str::FromStr for AgentType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(AgentType::parse(s))
    }
}

crate::simple_display! {
    AgentType {
        ClaudeCode => "cc",
        Codex => "cod",
        Gemini => "gmi",
        Cursor => "cursor",
        Windsurf => "windsurf",
        Aider => "aider",
        Ollama => "ollama",
        User => "user",
        Unknown => "unknown",
    }
}

#[cfg(test)]
#[path = "agent_tests.rs"]
mod tests;

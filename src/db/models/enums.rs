//! Enumerated column values
//!
//! The database stores these as TEXT (with CHECK constraints); the engine
//! works with the typed forms and converts at the row boundary.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed interleaving points in the retrieval-to-generation flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelinePosition {
    AfterRetrieval,
    AfterGeneration,
    PostGeneration,
}

impl PipelinePosition {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelinePosition::AfterRetrieval => "after_retrieval",
            PipelinePosition::AfterGeneration => "after_generation",
            PipelinePosition::PostGeneration => "post_generation",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "after_retrieval" => Some(PipelinePosition::AfterRetrieval),
            "after_generation" => Some(PipelinePosition::AfterGeneration),
            "post_generation" => Some(PipelinePosition::PostGeneration),
            _ => None,
        }
    }
}

impl fmt::Display for PipelinePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Experimental condition of a task; selects which definitions apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskMode {
    Baseline,
    HitlR,
    HitlG,
    HitlFull,
}

impl TaskMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskMode::Baseline => "baseline",
            TaskMode::HitlR => "hitl_r",
            TaskMode::HitlG => "hitl_g",
            TaskMode::HitlFull => "hitl_full",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "baseline" => Some(TaskMode::Baseline),
            "hitl_r" => Some(TaskMode::HitlR),
            "hitl_g" => Some(TaskMode::HitlG),
            "hitl_full" => Some(TaskMode::HitlFull),
            _ => None,
        }
    }
}

impl fmt::Display for TaskMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of a checkpoint instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckpointState {
    Pending,
    Offered,
    Active,
    Submitted,
    Skipped,
    Failed,
    TimedOut,
    Collapsed,
}

impl CheckpointState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckpointState::Pending => "pending",
            CheckpointState::Offered => "offered",
            CheckpointState::Active => "active",
            CheckpointState::Submitted => "submitted",
            CheckpointState::Skipped => "skipped",
            CheckpointState::Failed => "failed",
            CheckpointState::TimedOut => "timed_out",
            CheckpointState::Collapsed => "collapsed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(CheckpointState::Pending),
            "offered" => Some(CheckpointState::Offered),
            "active" => Some(CheckpointState::Active),
            "submitted" => Some(CheckpointState::Submitted),
            "skipped" => Some(CheckpointState::Skipped),
            "failed" => Some(CheckpointState::Failed),
            "timed_out" => Some(CheckpointState::TimedOut),
            "collapsed" => Some(CheckpointState::Collapsed),
            _ => None,
        }
    }

    /// Terminal states admit no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            CheckpointState::Submitted | CheckpointState::Skipped | CheckpointState::Collapsed
        )
    }

    /// Failed and timed-out instances can be retried while budget remains.
    pub fn is_retry_eligible(&self) -> bool {
        matches!(self, CheckpointState::Failed | CheckpointState::TimedOut)
    }
}

impl fmt::Display for CheckpointState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_round_trip() {
        for position in [
            PipelinePosition::AfterRetrieval,
            PipelinePosition::AfterGeneration,
            PipelinePosition::PostGeneration,
        ] {
            assert_eq!(PipelinePosition::parse(position.as_str()), Some(position));
        }
        assert_eq!(PipelinePosition::parse("mid_retrieval"), None);
    }

    #[test]
    fn test_mode_round_trip() {
        for mode in [
            TaskMode::Baseline,
            TaskMode::HitlR,
            TaskMode::HitlG,
            TaskMode::HitlFull,
        ] {
            assert_eq!(TaskMode::parse(mode.as_str()), Some(mode));
        }
        assert_eq!(TaskMode::parse(""), None);
    }

    #[test]
    fn test_state_round_trip() {
        for state in [
            CheckpointState::Pending,
            CheckpointState::Offered,
            CheckpointState::Active,
            CheckpointState::Submitted,
            CheckpointState::Skipped,
            CheckpointState::Failed,
            CheckpointState::TimedOut,
            CheckpointState::Collapsed,
        ] {
            assert_eq!(CheckpointState::parse(state.as_str()), Some(state));
        }
    }

    #[test]
    fn test_terminal_states() {
        assert!(CheckpointState::Submitted.is_terminal());
        assert!(CheckpointState::Skipped.is_terminal());
        assert!(CheckpointState::Collapsed.is_terminal());
        assert!(!CheckpointState::Failed.is_terminal());
        assert!(!CheckpointState::TimedOut.is_terminal());
        assert!(!CheckpointState::Offered.is_terminal());
    }

    #[test]
    fn test_retry_eligible_states() {
        assert!(CheckpointState::Failed.is_retry_eligible());
        assert!(CheckpointState::TimedOut.is_retry_eligible());
        assert!(!CheckpointState::Submitted.is_retry_eligible());
        assert!(!CheckpointState::Offered.is_retry_eligible());
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&CheckpointState::TimedOut).unwrap();
        assert_eq!(json, "\"timed_out\"");
        let json = serde_json::to_string(&PipelinePosition::AfterRetrieval).unwrap();
        assert_eq!(json, "\"after_retrieval\"");
    }
}

//! Stage types - lifecycle of a single ask
//!
//! A question moves through a fixed, ordered set of stages:
//! `Understanding → Searching → Planning → Generating → (Correcting) → Finished`
//!
//! `Failed` and `Stopped` are absorbing and can be entered from any
//! non-terminal stage. They have no rank in the progression.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Lifecycle stage of an ask task.
///
/// Serialized with the upper-case names the AI service uses for its
/// ask result status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Stage {
    /// Classifying the question's intent
    #[default]
    Understanding,
    /// Retrieving the relevant models
    Searching,
    /// Reasoning about how to answer
    Planning,
    /// Producing the SQL statement
    Generating,
    /// Repairing a statement that failed validation
    Correcting,
    /// Answer is ready
    Finished,
    /// The service reported an error
    Failed,
    /// The user cancelled the ask
    Stopped,
}

impl Stage {
    /// Get the wire representation of the stage
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Understanding => "UNDERSTANDING",
            Stage::Searching => "SEARCHING",
            Stage::Planning => "PLANNING",
            Stage::Generating => "GENERATING",
            Stage::Correcting => "CORRECTING",
            Stage::Finished => "FINISHED",
            Stage::Failed => "FAILED",
            Stage::Stopped => "STOPPED",
        }
    }

    /// Get all stages in canonical order
    pub fn all() -> &'static [Stage] {
        &[
            Stage::Understanding,
            Stage::Searching,
            Stage::Planning,
            Stage::Generating,
            Stage::Correcting,
            Stage::Finished,
            Stage::Failed,
            Stage::Stopped,
        ]
    }

    /// Position in the progression. `None` for `Failed` and `Stopped`.
    pub fn rank(&self) -> Option<u8> {
        match self {
            Stage::Understanding => Some(0),
            Stage::Searching => Some(1),
            Stage::Planning => Some(2),
            Stage::Generating => Some(3),
            Stage::Correcting => Some(4),
            Stage::Finished => Some(5),
            Stage::Failed | Stage::Stopped => None,
        }
    }

    /// True once the progression has arrived at `other` or gone past it.
    ///
    /// Always false when either side is a failure state.
    pub fn has_reached(&self, other: Stage) -> bool {
        match (self.rank(), other.rank()) {
            (Some(current), Some(target)) => current >= target,
            _ => false,
        }
    }

    /// Stage can no longer change
    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::Finished | Stage::Failed | Stage::Stopped)
    }

    /// Ended without an answer
    pub fn is_failure(&self) -> bool {
        matches!(self, Stage::Failed | Stage::Stopped)
    }

    /// Parse a wire status, falling back to `Understanding` for anything
    /// missing or unrecognized.
    pub fn from_status_lossy(status: Option<&str>) -> Stage {
        status
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }
}

impl FromStr for Stage {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "UNDERSTANDING" => Ok(Stage::Understanding),
            "SEARCHING" => Ok(Stage::Searching),
            "PLANNING" => Ok(Stage::Planning),
            "GENERATING" => Ok(Stage::Generating),
            "CORRECTING" => Ok(Stage::Correcting),
            "FINISHED" => Ok(Stage::Finished),
            "FAILED" => Ok(Stage::Failed),
            "STOPPED" => Ok(Stage::Stopped),
            _ => Err(Error::UnknownStage(s.to_string())),
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_roundtrip() {
        for stage in Stage::all() {
            let parsed: Stage = stage.as_str().parse().unwrap();
            assert_eq!(*stage, parsed);
        }
        assert_eq!("planning".parse::<Stage>().unwrap(), Stage::Planning);
    }

    #[test]
    fn test_unknown_stage() {
        assert!("THINKING".parse::<Stage>().is_err());
        assert_eq!(Stage::from_status_lossy(Some("THINKING")), Stage::Understanding);
        assert_eq!(Stage::from_status_lossy(None), Stage::Understanding);
        assert_eq!(Stage::from_status_lossy(Some("searching")), Stage::Searching);
    }

    #[test]
    fn test_ranks_follow_canonical_order() {
        let ranked: Vec<u8> = Stage::all().iter().filter_map(|s| s.rank()).collect();
        assert_eq!(ranked, vec![0, 1, 2, 3, 4, 5]);
        assert!(Stage::Failed.rank().is_none());
        assert!(Stage::Stopped.rank().is_none());
    }

    #[test]
    fn test_has_reached() {
        assert!(Stage::Planning.has_reached(Stage::Searching));
        assert!(Stage::Planning.has_reached(Stage::Planning));
        assert!(!Stage::Planning.has_reached(Stage::Generating));
        assert!(Stage::Correcting.has_reached(Stage::Generating));
        assert!(!Stage::Failed.has_reached(Stage::Understanding));
    }

    #[test]
    fn test_serde_uses_wire_names() {
        let json = serde_json::to_string(&Stage::Correcting).unwrap();
        assert_eq!(json, "\"CORRECTING\"");
        let stage: Stage = serde_json::from_str("\"STOPPED\"").unwrap();
        assert_eq!(stage, Stage::Stopped);
    }
}

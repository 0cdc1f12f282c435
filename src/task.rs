//! Task snapshots handed to the resolver
//!
//! An [`AskingTask`] is what the client knows about one in-flight ask.
//! [`AnswerData`] bundles it with the independently sourced view and the
//! finalized SQL of the response being displayed.

use crate::contracts::{AskCandidate, AskCandidateType, AskResult, AskResultType, WrenAIError};
use crate::stage::Stage;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Client-side snapshot of one ask.
///
/// Every field is optional on the wire; anything missing reads as
/// "not reached yet".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AskingTask {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_id: Option<String>,
    /// Raw status as reported; see [`AskingTask::stage`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub result_type: Option<AskResultType>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub candidates: Vec<AskCandidate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<WrenAIError>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retrieved_tables: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sql_generation_reasoning: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent_reasoning: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invalid_sql: Option<String>,
    /// Furthest non-terminal stage seen so far, kept by the tracker
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_progress: Option<Stage>,
}

impl AskingTask {
    /// Fresh task for a new question
    pub fn new(query_id: impl Into<String>) -> Self {
        Self {
            query_id: Some(query_id.into()),
            status: Some(Stage::Understanding.as_str().to_string()),
            last_progress: Some(Stage::Understanding),
            ..Default::default()
        }
    }

    /// Build a snapshot from a polled ask result
    pub fn from_ask_result(query_id: impl Into<String>, result: &AskResult) -> Self {
        Self {
            query_id: Some(query_id.into()),
            status: Some(result.status.as_str().to_string()),
            result_type: result.result_type,
            candidates: result.response.clone().unwrap_or_default(),
            error: result.error.clone(),
            intent_reasoning: result.intent_reasoning.clone(),
            invalid_sql: result.invalid_sql.clone(),
            ..Default::default()
        }
    }

    /// Current stage. Absent or unrecognized statuses read as `Understanding`.
    pub fn stage(&self) -> Stage {
        Stage::from_status_lossy(self.status.as_deref())
    }

    pub fn set_stage(&mut self, stage: Stage) {
        self.status = Some(stage.as_str().to_string());
    }

    /// Sql of the first candidate, if the service produced one
    pub fn candidate_sql(&self) -> Option<&str> {
        self.candidates.first().map(|c| c.sql.as_str())
    }

    /// View id of the first candidate when it came from a saved view
    pub fn candidate_view_id(&self) -> Option<i64> {
        self.candidates
            .first()
            .filter(|c| c.candidate_type == AskCandidateType::View)
            .and_then(|c| c.view_id)
    }

    pub fn retrieved_tables(&self) -> &[String] {
        self.retrieved_tables.as_deref().unwrap_or(&[])
    }

    pub fn has_invalid_sql(&self) -> bool {
        self.invalid_sql.as_deref().is_some_and(|s| !s.is_empty())
    }

    /// Furthest stage in the progression this task has evidently passed
    /// through, from what it has recorded and which fields are populated.
    pub fn furthest_progress(&self) -> Stage {
        let stage = self.stage();
        let mut furthest = if stage.is_failure() {
            Stage::Understanding
        } else {
            stage
        };

        let inferred = if self.has_invalid_sql() || self.candidate_sql().is_some() {
            Stage::Generating
        } else if self
            .sql_generation_reasoning
            .as_deref()
            .is_some_and(|s| !s.is_empty())
        {
            Stage::Planning
        } else if !self.retrieved_tables().is_empty() {
            Stage::Searching
        } else {
            Stage::Understanding
        };

        for candidate in self.last_progress.into_iter().chain(Some(inferred)) {
            if candidate.has_reached(furthest) {
                furthest = candidate;
            }
        }
        furthest
    }
}

/// A saved view that answers the question without generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewInfo {
    pub id: i64,
    pub name: String,
    pub statement: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

/// Everything the resolver looks at for one response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerData {
    #[serde(default)]
    pub asking_task: Option<AskingTask>,
    #[serde(default)]
    pub view: Option<ViewInfo>,
    /// Finalized sql of the response
    #[serde(default)]
    pub sql: Option<String>,
}

impl AnswerData {
    pub fn new(task: AskingTask) -> Self {
        Self {
            asking_task: Some(task),
            view: None,
            sql: None,
        }
    }

    pub fn with_view(mut self, view: ViewInfo) -> Self {
        self.view = Some(view);
        self
    }

    pub fn with_sql(mut self, sql: impl Into<String>) -> Self {
        self.sql = Some(sql.into());
        self
    }

    /// Finalized sql when present and non-empty
    pub fn final_sql(&self) -> Option<&str> {
        self.sql.as_deref().filter(|s| !s.is_empty())
    }
}

/// Read a single snapshot from a JSON file
pub fn read_answer(path: &Path) -> Result<AnswerData> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Read a JSON-lines file of snapshots, skipping blank lines
pub fn read_snapshots(path: &Path) -> Result<Vec<AnswerData>> {
    let contents = std::fs::read_to_string(path)?;
    contents
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str::<AnswerData>(line).map_err(crate::Error::from))
        .collect()
}

//! Timeline items derived from a resolved preparation state
//!
//! At most one item per visible phase, or exactly one item for a
//! shortcut. A failed or stopped ask gets a trailing indicator.

use crate::contracts::WrenAIError;
use crate::resolver::{Phase, PreparationState, Shortcut};
use crate::stage::Stage;
use serde::Serialize;

/// Longest reasoning excerpt shown in an organizing item
const REASONING_EXCERPT_CHARS: usize = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    Retrieving,
    Organizing,
    Generating,
    ViewFinished,
    FixedSqlFinished,
    Failed,
    Stopped,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineItem {
    pub kind: StepKind,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Show a working indicator
    pub working: bool,
}

impl TimelineItem {
    fn new(kind: StepKind, label: impl Into<String>) -> Self {
        Self {
            kind,
            label: label.into(),
            detail: None,
            working: false,
        }
    }

    fn detail(mut self, detail: Option<String>) -> Self {
        self.detail = detail;
        self
    }

    fn working(mut self, working: bool) -> Self {
        self.working = working;
        self
    }
}

/// Build the timeline for `state`. `error` is the task's error payload,
/// shown on the failure indicator.
pub fn build(state: &PreparationState, error: Option<&WrenAIError>) -> Vec<TimelineItem> {
    match state.shortcut {
        Some(Shortcut::View) => {
            return vec![TimelineItem::new(StepKind::ViewFinished, "Answered from an existing view")];
        }
        Some(Shortcut::FixedSql) => {
            return vec![TimelineItem::new(StepKind::FixedSqlFinished, "Answered with the corrected SQL")];
        }
        None => {}
    }

    let mut items: Vec<TimelineItem> = state
        .visible_phases()
        .into_iter()
        .map(|phase| phase_item(state, phase))
        .collect();

    match state.current_stage {
        Stage::Failed => {
            let detail = error.map(|e| format!("{} ({})", e.message, e.code));
            items.push(TimelineItem::new(StepKind::Failed, "Failed to prepare an answer").detail(detail));
        }
        Stage::Stopped => items.push(TimelineItem::new(StepKind::Stopped, "Stopped")),
        _ => {}
    }

    items
}

fn phase_item(state: &PreparationState, phase: Phase) -> TimelineItem {
    match phase {
        Phase::Retrieving => {
            let label = if state.retrieving.active {
                "Retrieving related models".to_string()
            } else {
                format!("{} models found", state.retrieved_tables.len())
            };
            let detail = (!state.retrieved_tables.is_empty()).then(|| state.retrieved_tables.join(", "));
            TimelineItem::new(StepKind::Retrieving, label)
                .detail(detail)
                .working(state.retrieving.active)
        }
        Phase::Organizing => {
            let label = if state.organizing.active {
                "Organizing thoughts"
            } else {
                "Thoughts organized"
            };
            TimelineItem::new(StepKind::Organizing, label)
                .detail(excerpt(&state.reasoning))
                .working(state.organizing.active)
        }
        Phase::Generating => {
            let generating = &state.generating;
            let label = if generating.correcting {
                "Correcting SQL statement"
            } else if generating.active {
                "Generating SQL statement"
            } else if generating.wrapping && !state.is_failed() {
                "Wrapping up"
            } else {
                "SQL statement generated"
            };
            let working = !state.is_failed() && (generating.active || generating.wrapping);
            TimelineItem::new(StepKind::Generating, label).working(working)
        }
    }
}

fn excerpt(text: &str) -> Option<String> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if text.chars().count() <= REASONING_EXCERPT_CHARS {
        return Some(text.to_string());
    }
    let cut: String = text.chars().take(REASONING_EXCERPT_CHARS).collect();
    Some(format!("{}…", cut.trim_end()))
}

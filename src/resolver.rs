//! Process state resolver
//!
//! Maps an [`AnswerData`] snapshot to the stage being shown and the
//! status of the three preparation phases:
//! - `retrieving` while searching for relevant models
//! - `organizing` while planning the answer
//! - `generating` while producing (or correcting) the SQL
//!
//! A saved view or a corrected SQL replaces the phases with a single
//! [`Shortcut`]. The view is checked first.
//!
//! Resolution is a pure function of its inputs and may be recomputed on
//! every redraw.

use crate::stage::Stage;
use crate::task::{AnswerData, AskingTask};
use serde::{Deserialize, Serialize};

/// Named phase of the preparation timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Retrieving,
    Organizing,
    Generating,
}

impl Phase {
    /// Stage at which the phase starts
    pub fn stage(&self) -> Stage {
        match self {
            Phase::Retrieving => Stage::Searching,
            Phase::Organizing => Stage::Planning,
            Phase::Generating => Stage::Generating,
        }
    }

    pub fn all() -> &'static [Phase] {
        &[Phase::Retrieving, Phase::Organizing, Phase::Generating]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Retrieving => "retrieving",
            Phase::Organizing => "organizing",
            Phase::Generating => "generating",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Replaces the staged phases with a single finished indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shortcut {
    /// Answered by an existing view
    View,
    /// Answered by a corrected SQL statement
    FixedSql,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseStatus {
    pub visible: bool,
    pub active: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratingStatus {
    pub visible: bool,
    /// Generating or correcting right now
    pub active: bool,
    pub correcting: bool,
    /// Answer composition still running
    pub wrapping: bool,
}

/// Resolver output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreparationState {
    pub current_stage: Stage,
    pub shortcut: Option<Shortcut>,
    pub retrieving: PhaseStatus,
    pub organizing: PhaseStatus,
    pub generating: GeneratingStatus,
    pub retrieved_tables: Vec<String>,
    pub reasoning: String,
}

impl PreparationState {
    /// Whether `phase` is shown
    pub fn is_visible(&self, phase: Phase) -> bool {
        match phase {
            Phase::Retrieving => self.retrieving.visible,
            Phase::Organizing => self.organizing.visible,
            Phase::Generating => self.generating.visible,
        }
    }

    /// Whether `phase` is working right now
    pub fn is_active(&self, phase: Phase) -> bool {
        match phase {
            Phase::Retrieving => self.retrieving.active,
            Phase::Organizing => self.organizing.active,
            Phase::Generating => self.generating.active,
        }
    }

    /// Visible phases in timeline order
    pub fn visible_phases(&self) -> Vec<Phase> {
        Phase::all()
            .iter()
            .copied()
            .filter(|p| self.is_visible(*p))
            .collect()
    }

    pub fn is_failed(&self) -> bool {
        self.current_stage.is_failure()
    }
}

/// Resolve the preparation state of `data`.
///
/// `stream` is the reasoning streamed so far, used until the task stores
/// its own. `is_answer_finished` reports whether answer composition has
/// completed.
pub fn resolve(data: &AnswerData, stream: Option<&str>, is_answer_finished: bool) -> PreparationState {
    let default_task = AskingTask::default();
    let task = data.asking_task.as_ref().unwrap_or(&default_task);
    let current_stage = task.stage();

    let retrieved_tables = task.retrieved_tables().to_vec();
    let reasoning = task
        .sql_generation_reasoning
        .as_deref()
        .filter(|s| !s.is_empty())
        .or(stream)
        .unwrap_or_default()
        .to_string();

    let shortcut = if data.view.is_some() {
        Some(Shortcut::View)
    } else if data.final_sql().is_some() && task.has_invalid_sql() {
        Some(Shortcut::FixedSql)
    } else {
        None
    };

    // Failure states keep showing how far the ask got.
    let reached = if current_stage.is_failure() {
        task.furthest_progress()
    } else {
        current_stage
    };
    // A shortcut means no phase is shown or being worked on.
    let staged = shortcut.is_none();
    let visible = |phase: Phase| staged && reached.has_reached(phase.stage());
    let active = |stage: Stage| staged && current_stage == stage;
    let correcting = active(Stage::Correcting);

    PreparationState {
        current_stage,
        shortcut,
        retrieving: PhaseStatus {
            visible: visible(Phase::Retrieving),
            active: active(Stage::Searching),
        },
        organizing: PhaseStatus {
            visible: visible(Phase::Organizing),
            active: active(Stage::Planning),
        },
        generating: GeneratingStatus {
            visible: visible(Phase::Generating),
            active: active(Stage::Generating) || correcting,
            correcting,
            wrapping: !is_answer_finished,
        },
        retrieved_tables,
        reasoning,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::ViewInfo;

    fn data_at(stage: Stage) -> AnswerData {
        let mut task = AskingTask::new("q");
        task.set_stage(stage);
        AnswerData::new(task)
    }

    fn sample_view() -> ViewInfo {
        ViewInfo {
            id: 1,
            name: "monthly_revenue".into(),
            statement: "SELECT * FROM revenue".into(),
            display_name: None,
        }
    }

    #[test]
    fn test_searching() {
        let state = resolve(&data_at(Stage::Searching), None, false);
        assert!(state.retrieving.visible && state.retrieving.active);
        assert!(!state.organizing.visible);
        assert!(!state.generating.visible);
    }

    #[test]
    fn test_planning() {
        let state = resolve(&data_at(Stage::Planning), None, false);
        assert!(state.retrieving.visible);
        assert!(!state.retrieving.active);
        assert!(state.organizing.visible && state.organizing.active);
        assert!(!state.generating.visible);
    }

    #[test]
    fn test_generating_wraps_until_answer_finished() {
        let state = resolve(&data_at(Stage::Generating), None, false);
        assert!(state.generating.visible);
        assert!(state.generating.active);
        assert!(state.generating.wrapping);
        assert!(!state.generating.correcting);

        let state = resolve(&data_at(Stage::Finished), None, false);
        assert!(!state.generating.active);
        assert!(state.generating.wrapping);

        let state = resolve(&data_at(Stage::Finished), None, true);
        assert!(!state.generating.wrapping);
    }

    #[test]
    fn test_correcting() {
        let state = resolve(&data_at(Stage::Correcting), None, false);
        assert!(state.generating.visible);
        assert!(state.generating.correcting);
        assert!(state.generating.active);
        assert!(state.retrieving.visible && state.organizing.visible);
    }

    #[test]
    fn test_understanding_shows_nothing() {
        let state = resolve(&data_at(Stage::Understanding), None, false);
        assert!(state.visible_phases().is_empty());
        assert!(state.shortcut.is_none());
    }

    #[test]
    fn test_finished_shows_all_inactive() {
        let state = resolve(&data_at(Stage::Finished), None, true);
        assert_eq!(state.visible_phases(), Phase::all().to_vec());
        assert!(Phase::all().iter().all(|p| !state.is_active(*p)));
    }

    #[test]
    fn test_failure_keeps_reached_phases() {
        let mut task = AskingTask::new("q");
        task.set_stage(Stage::Failed);
        task.last_progress = Some(Stage::Planning);
        let state = resolve(&AnswerData::new(task), None, true);

        assert_eq!(state.visible_phases(), vec![Phase::Retrieving, Phase::Organizing]);
        assert!(Phase::all().iter().all(|p| !state.is_active(*p)));
        assert!(state.is_failed());
    }

    #[test]
    fn test_stopped_without_progress() {
        let state = resolve(&data_at(Stage::Stopped), None, true);
        assert!(state.visible_phases().is_empty());
        assert!(!state.generating.active);
    }

    #[test]
    fn test_view_short_circuits_every_stage() {
        for stage in Stage::all() {
            let data = data_at(*stage).with_view(sample_view());
            let state = resolve(&data, None, false);
            assert_eq!(state.shortcut, Some(Shortcut::View), "stage {stage}");
            assert!(state.visible_phases().is_empty());
            assert!(Phase::all().iter().all(|p| !state.is_active(*p)), "stage {stage}");
            assert!(!state.generating.correcting);
        }
    }

    #[test]
    fn test_fixed_sql_short_circuit() {
        let mut task = AskingTask::new("q");
        task.set_stage(Stage::Generating);
        task.invalid_sql = Some("SELEC * FROM orders".into());
        let data = AnswerData::new(task).with_sql("SELECT * FROM orders");

        let state = resolve(&data, None, false);
        assert_eq!(state.shortcut, Some(Shortcut::FixedSql));
        assert!(state.visible_phases().is_empty());
        assert!(Phase::all().iter().all(|p| !state.is_active(*p)));

        let mut correcting = data.clone();
        if let Some(task) = correcting.asking_task.as_mut() {
            task.set_stage(Stage::Correcting);
        }
        let state = resolve(&correcting, None, false);
        assert_eq!(state.shortcut, Some(Shortcut::FixedSql));
        assert!(!state.generating.active);
        assert!(!state.generating.correcting);

        let state = resolve(&data.clone().with_view(sample_view()), None, false);
        assert_eq!(state.shortcut, Some(Shortcut::View));
    }

    #[test]
    fn test_empty_sql_is_not_fixed() {
        let mut task = AskingTask::new("q");
        task.set_stage(Stage::Correcting);
        task.invalid_sql = Some("SELEC 1".into());
        let state = resolve(&AnswerData::new(task).with_sql(""), None, false);
        assert!(state.shortcut.is_none());
        assert!(state.generating.correcting);
    }

    #[test]
    fn test_reasoning_falls_back_to_stream() {
        let data = data_at(Stage::Planning);
        let state = resolve(&data, Some("thinking about joins"), false);
        assert_eq!(state.reasoning, "thinking about joins");

        let mut task = AskingTask::new("q");
        task.sql_generation_reasoning = Some("stored".into());
        let state = resolve(&AnswerData::new(task), Some("streamed"), false);
        assert_eq!(state.reasoning, "stored");

        assert_eq!(resolve(&data, None, false).reasoning, "");
    }

    #[test]
    fn test_missing_task_is_initial_stage() {
        let state = resolve(&AnswerData::default(), None, false);
        assert_eq!(state.current_stage, Stage::Understanding);
        assert!(state.visible_phases().is_empty());
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let mut task = AskingTask::new("q");
        task.set_stage(Stage::Planning);
        task.retrieved_tables = Some(vec!["orders".into(), "customers".into()]);
        let data = AnswerData::new(task);

        assert_eq!(resolve(&data, Some("s"), false), resolve(&data, Some("s"), false));
    }

    #[test]
    fn test_visible_set_is_monotonic() {
        let sequence = [
            Stage::Understanding,
            Stage::Searching,
            Stage::Planning,
            Stage::Generating,
            Stage::Finished,
        ];
        let mut previous = 0;
        for stage in sequence {
            let count = resolve(&data_at(stage), None, false).visible_phases().len();
            assert!(count >= previous, "{stage} hid a phase");
            previous = count;
        }
        assert_eq!(previous, 3);
    }
}

//! Task tracker - applies successive snapshots of one ask
//!
//! The external client polls the service and hands every new snapshot to
//! [`TaskTracker::apply`]. Snapshots that would move the stage backwards,
//! leave a terminal stage, or enter `Correcting` from anywhere but
//! `Generating` are rejected and the previous snapshot is kept.

use crate::machine::ProcessStateMachine;
use crate::resolver::{self, PreparationState};
use crate::stage::Stage;
use crate::task::{AnswerData, AskingTask};
use crate::{Error, Result};

/// What an accepted snapshot did to the tracked task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerEvent {
    /// Same stage, fields may have been filled in
    Updated(Stage),
    Advanced { from: Stage, to: Stage },
    /// A different query replaced the tracked one
    Restarted(Stage),
}

#[derive(Debug, Default)]
pub struct TaskTracker {
    data: AnswerData,
    stream: Option<String>,
}

impl TaskTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking a new question at `Understanding`
    pub fn restart(&mut self, query_id: impl Into<String>) {
        let task = AskingTask::new(query_id);
        tracing::debug!("Restarting tracker for {:?}", task.query_id);
        self.data = AnswerData::new(task);
        self.stream = None;
    }

    pub fn data(&self) -> &AnswerData {
        &self.data
    }

    pub fn stage(&self) -> Stage {
        self.data
            .asking_task
            .as_ref()
            .map(AskingTask::stage)
            .unwrap_or_default()
    }

    /// Append streamed reasoning text
    pub fn push_stream(&mut self, chunk: &str) {
        self.stream.get_or_insert_with(String::new).push_str(chunk);
    }

    /// Resolve the current snapshot
    pub fn state(&self, is_answer_finished: bool) -> PreparationState {
        resolver::resolve(&self.data, self.stream.as_deref(), is_answer_finished)
    }

    /// Apply a new snapshot after validating its stage transition
    pub fn apply(&mut self, mut snapshot: AnswerData) -> Result<TrackerEvent> {
        let Some(current) = self.data.asking_task.as_ref() else {
            return Ok(self.replace(snapshot));
        };

        let incoming = snapshot.asking_task.get_or_insert_with(AskingTask::default);
        if incoming.query_id.is_some() && incoming.query_id != current.query_id {
            return Ok(self.replace(snapshot));
        }

        let from = current.stage();
        let to = incoming.stage();
        incoming.last_progress = furthest(current.last_progress, to);

        if from == to {
            self.data = snapshot;
            return Ok(TrackerEvent::Updated(to));
        }

        if let Err(e) = check_transition(from, to) {
            tracing::warn!("Rejected snapshot for {:?}: {}", current.query_id, e);
            return Err(e);
        }

        tracing::debug!("Stage {} -> {}", from, to);
        self.data = snapshot;
        Ok(TrackerEvent::Advanced { from, to })
    }

    fn replace(&mut self, mut snapshot: AnswerData) -> TrackerEvent {
        let task = snapshot.asking_task.get_or_insert_with(AskingTask::default);
        let stage = task.stage();
        task.last_progress = furthest(task.last_progress, stage);
        tracing::debug!("Tracking {:?} at {}", task.query_id, stage);

        self.data = snapshot;
        self.stream = None;
        TrackerEvent::Restarted(stage)
    }
}

/// Validate a stage change, allowing skipped intermediate stages
pub fn check_transition(from: Stage, to: Stage) -> Result<()> {
    if from.is_terminal() {
        return Err(Error::TerminalStage(from));
    }
    if to == Stage::Correcting && from != Stage::Generating {
        return Err(Error::InvalidTransition { from, to });
    }
    if !ProcessStateMachine::global().can_reach(from, to) {
        return Err(Error::InvalidTransition { from, to });
    }
    Ok(())
}

fn furthest(recorded: Option<Stage>, stage: Stage) -> Option<Stage> {
    match recorded {
        Some(prev) if !stage.has_reached(prev) => Some(prev),
        _ if stage.is_failure() => recorded,
        _ => Some(stage),
    }
}

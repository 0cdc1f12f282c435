//! # Askflow - preparation progress for a text-to-SQL assistant
//!
//! While an AI service prepares an answer, the client shows how far it got.
//!
//! Askflow provides:
//! - The ask lifecycle as an ordered [`Stage`] enumeration
//! - A transition graph with precomputed reachability
//! - A pure resolver from task snapshots to phase visibility and activity
//! - A tracker enforcing monotonic stage progress across snapshots
//! - Timeline items and terminal rendering for the resolved state
//! - Serde contracts for the AI service's ask, chart and answer APIs

pub mod stage;
pub mod machine;
pub mod contracts;
pub mod task;
pub mod resolver;
pub mod tracker;
pub mod timeline;
pub mod config;
pub mod output;
pub mod ui;

// Re-exports for convenient access
pub use stage::Stage;
pub use machine::ProcessStateMachine;
pub use task::{AnswerData, AskingTask, ViewInfo};
pub use resolver::{resolve, Phase, PreparationState, Shortcut};
pub use tracker::{TaskTracker, TrackerEvent};
pub use timeline::{StepKind, TimelineItem};

/// Result type alias for Askflow operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Askflow operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unknown stage: {0}")]
    UnknownStage(String),

    #[error("Invalid transition: {from} -> {to}")]
    InvalidTransition { from: Stage, to: Stage },

    #[error("Stage {0} is terminal")]
    TerminalStage(Stage),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(String),
}

use crate::machine::ProcessStateMachine;
use crate::resolver::{Phase, PreparationState};
use crate::stage::Stage;
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
pub struct TableRow {
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

#[derive(Tabled)]
pub struct StageRow {
    #[tabled(rename = "Stage")]
    pub stage: String,
    #[tabled(rename = "Rank")]
    pub rank: String,
    #[tabled(rename = "Next")]
    pub next: String,
    #[tabled(rename = "Reachable")]
    pub reachable: String,
}

pub struct TableBuilder {
    rows: Vec<TableRow>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn add_row(&mut self, label: &str, value: &str) {
        self.rows.push(TableRow {
            metric: label.to_string(),
            value: value.to_string(),
        });
    }

    pub fn build(&self) -> String {
        if self.rows.is_empty() {
            return String::new();
        }

        Table::new(&self.rows).with(Style::rounded()).to_string()
    }
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn join(stages: &[Stage]) -> String {
    if stages.is_empty() {
        return "-".to_string();
    }
    stages
        .iter()
        .map(Stage::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Every stage with its rank, direct successors and reachable set
pub fn stage_table(machine: &ProcessStateMachine) -> String {
    let rows: Vec<StageRow> = Stage::all()
        .iter()
        .map(|&stage| StageRow {
            stage: stage.to_string(),
            rank: stage.rank().map(|r| r.to_string()).unwrap_or_else(|| "-".to_string()),
            next: join(machine.successors(stage)),
            reachable: join(machine.next_states(stage, false)),
        })
        .collect();

    Table::new(&rows).with(Style::rounded()).to_string()
}

/// Phase flags of a resolved state
pub fn state_table(state: &PreparationState) -> String {
    let mut builder = TableBuilder::new();
    builder.add_row("stage", state.current_stage.as_str());
    builder.add_row(
        "shortcut",
        &state
            .shortcut
            .map(|s| format!("{:?}", s))
            .unwrap_or_else(|| "-".to_string()),
    );
    for phase in Phase::all() {
        builder.add_row(
            phase.as_str(),
            &format!(
                "visible={} active={}",
                state.is_visible(*phase),
                state.is_active(*phase)
            ),
        );
    }
    builder.add_row(
        "generating",
        &format!(
            "correcting={} wrapping={}",
            state.generating.correcting, state.generating.wrapping
        ),
    );
    builder.build()
}

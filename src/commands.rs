use crate::{emit_success, OutputMode};
use askflow::config::{write_config, AskflowConfig};
use askflow::machine::ProcessStateMachine;
use askflow::task::{read_answer, read_snapshots};
use askflow::timeline;
use askflow::ui::{banner, info, print_timeline, section, stage_table, state_table, success, warn, TimelineMessage, TimelineProgress};
use askflow::{resolve, TaskTracker};
use owo_colors::OwoColorize;
use std::path::Path;
use std::time::Duration;

pub fn run_version(output_mode: OutputMode) -> anyhow::Result<()> {
    if output_mode.is_human() {
        banner(
            &format!("{}", "Askflow".bold().style(askflow::ui::theme().info.clone())),
            &format!("Version {}", env!("CARGO_PKG_VERSION").bold()),
        );
    } else {
        let data = serde_json::json!({
            "version": env!("CARGO_PKG_VERSION"),
        });
        emit_success(output_mode, "version", data)?;
    }
    Ok(())
}

pub fn run_resolve(
    output_mode: OutputMode,
    input: &Path,
    stream: Option<&str>,
    answer_finished: bool,
) -> anyhow::Result<()> {
    let data = read_answer(input)?;
    let state = resolve(&data, stream, answer_finished);
    let error = data.asking_task.as_ref().and_then(|t| t.error.as_ref());
    let items = timeline::build(&state, error);

    if output_mode.is_human() {
        section(&format!(" {} ", state.current_stage));
        print_timeline(&items);
        println!();
        println!("{}", state_table(&state));
    } else {
        let data = serde_json::json!({
            "state": state,
            "timeline": items,
        });
        emit_success(output_mode, "resolve", data)?;
    }
    Ok(())
}

pub fn run_replay(output_mode: OutputMode, input: &Path, delay_ms: u64) -> anyhow::Result<()> {
    let snapshots = read_snapshots(input)?;
    if snapshots.is_empty() {
        anyhow::bail!("No snapshots in {}", input.display());
    }
    tracing::info!("Replaying {} snapshots from {}", snapshots.len(), input.display());

    let mut tracker = TaskTracker::new();
    let total = snapshots.len();

    if !output_mode.is_human() {
        let mut states = Vec::with_capacity(total);
        for (line, snapshot) in snapshots.into_iter().enumerate() {
            tracker
                .apply(snapshot)
                .map_err(|e| anyhow::anyhow!("snapshot {}: {}", line + 1, e))?;
            states.push(tracker.state(tracker.stage().is_terminal()));
        }
        return emit_success(output_mode, "replay", serde_json::json!({ "states": states }));
    }

    let (progress, tx) = TimelineProgress::new();
    for (line, snapshot) in snapshots.into_iter().enumerate() {
        match tracker.apply(snapshot) {
            Ok(event) => {
                let state = tracker.state(tracker.stage().is_terminal());
                let error = tracker.data().asking_task.as_ref().and_then(|t| t.error.as_ref());
                let items = timeline::build(&state, error);
                tx.send(TimelineMessage::Snapshot { event, items }).ok();
            }
            Err(e) => {
                let reason = format!("snapshot {}: {}", line + 1, e);
                progress.abort(&reason);
                anyhow::bail!(reason);
            }
        }

        if delay_ms > 0 {
            std::thread::sleep(Duration::from_millis(delay_ms));
        }
    }

    let stage = tracker.stage();
    progress.finish_with_summary(stage.as_str(), total);
    if stage.is_failure() {
        warn(&format!("Ask ended as {}", stage));
    }
    Ok(())
}

pub fn run_graph(output_mode: OutputMode) -> anyhow::Result<()> {
    let machine = ProcessStateMachine::global();

    if output_mode.is_human() {
        section(" Stages ");
        println!("{}", stage_table(machine));
    } else {
        let edges: Vec<_> = machine
            .edges()
            .into_iter()
            .map(|(from, to)| serde_json::json!({ "from": from, "to": to }))
            .collect();
        emit_success(output_mode, "graph", serde_json::json!({ "edges": edges }))?;
    }
    Ok(())
}

pub fn run_init(output_mode: OutputMode, path: &Path, force: bool) -> anyhow::Result<()> {
    let config = AskflowConfig {
        language: Some("English".to_string()),
        timezone: None,
        plain: Some(false),
        replay_delay_ms: Some(300),
    };
    let ask = config.ask_configurations()?;
    write_config(path, &config, force)?;

    if output_mode.is_human() {
        success(&format!("Wrote {}", path.display()));
        info("language", ask.language.as_deref().unwrap_or("-"));
    } else {
        emit_success(
            output_mode,
            "init",
            serde_json::json!({ "path": path.display().to_string(), "configurations": ask }),
        )?;
    }
    Ok(())
}

use crate::timeline::{StepKind, TimelineItem};
use crate::ui::progress_message::TimelineMessage;
use crate::ui::timeline::{item_icon, render_item};
use crate::ui::{theme, Icons};
use indicatif::{HumanDuration, MultiProgress, ProgressBar};
use owo_colors::OwoColorize;
use std::thread;
use std::time::{Duration, Instant};

/// Live view of a tracked ask: one spinner per timeline item.
///
/// Snapshots arrive over a channel and are drawn on a dedicated thread.
/// Off a terminal each changed timeline is printed instead.
pub struct TimelineProgress {
    started: Instant,
    handle: Option<thread::JoinHandle<()>>,
    tx: crossbeam::channel::Sender<TimelineMessage>,
}

impl TimelineProgress {
    pub fn new() -> (Self, crossbeam::channel::Sender<TimelineMessage>) {
        let (tx, rx) = crossbeam::channel::unbounded::<TimelineMessage>();

        let mp = MultiProgress::new();
        let is_term = console::Term::stdout().is_term();

        let handle = thread::spawn(move || {
            let mut bars: Vec<ProgressBar> = Vec::new();
            let mut kinds: Vec<StepKind> = Vec::new();
            let mut last_items: Vec<TimelineItem> = Vec::new();

            for msg in rx {
                match msg {
                    TimelineMessage::Snapshot { event, items } => {
                        tracing::debug!("Timeline update after {:?}", event);
                        if !is_term {
                            if items != last_items {
                                for (i, item) in items.iter().enumerate() {
                                    println!("{}", render_item(item, i + 1 == items.len()));
                                }
                                println!();
                            }
                            last_items = items;
                            continue;
                        }

                        let new_kinds: Vec<StepKind> = items.iter().map(|i| i.kind).collect();
                        // A shortcut replaces the phases, so the bars no longer line up.
                        if !new_kinds.starts_with(&kinds) {
                            for bar in bars.drain(..) {
                                bar.finish_and_clear();
                            }
                            kinds.clear();
                        }

                        for (i, item) in items.iter().enumerate() {
                            if i >= bars.len() {
                                bars.push(mp.add(ProgressBar::new_spinner()));
                            }
                            draw(&bars[i], item);
                        }
                        kinds = new_kinds;
                    }
                    TimelineMessage::Rejected(reason) => {
                        let line = format!("{} {}", Icons::WARN, reason.style(theme().warn.clone()));
                        if is_term {
                            mp.println(line).ok();
                        } else {
                            eprintln!("{}", line);
                        }
                    }
                    TimelineMessage::Exit => break,
                }
            }

            for bar in bars {
                bar.disable_steady_tick();
                bar.finish();
            }
        });

        (
            Self {
                started: Instant::now(),
                handle: Some(handle),
                tx: tx.clone(),
            },
            tx,
        )
    }

    fn shutdown(&mut self) {
        self.tx.send(TimelineMessage::Exit).ok();
        if let Some(handle) = self.handle.take() {
            handle.join().ok();
        }
    }

    /// Report a rejected snapshot and stop the render thread
    pub fn abort(mut self, reason: &str) {
        self.tx.send(TimelineMessage::Rejected(reason.to_string())).ok();
        self.shutdown();
    }

    /// Stop the render thread and print how the ask ended
    pub fn finish_with_summary(mut self, stage: &str, snapshots: usize) {
        self.shutdown();

        println!();
        println!(
            "{} {}",
            Icons::CHECK.style(theme().success.clone()),
            format!("Replayed in {}", HumanDuration(self.started.elapsed())).style(theme().success.clone())
        );
        println!(
            "  {} {}  {} {}",
            Icons::STATS.style(theme().info.clone()),
            snapshots,
            Icons::GEAR.style(theme().info.clone()),
            stage
        );
    }
}

fn draw(bar: &ProgressBar, item: &TimelineItem) {
    let mut message = format!("{} {}", item_icon(item.kind), item.label);
    if let Some(detail) = &item.detail {
        message.push_str(&format!("  {}", detail.style(theme().dim.clone())));
    }
    bar.set_message(message);

    if item.working {
        bar.enable_steady_tick(Duration::from_millis(100));
    } else {
        bar.disable_steady_tick();
        bar.tick();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::Stage;
    use crate::tracker::TrackerEvent;

    #[test]
    fn test_abort_joins_render_thread() {
        let (progress, tx) = TimelineProgress::new();
        let item = TimelineItem {
            kind: StepKind::Retrieving,
            label: "Retrieving related models".to_string(),
            detail: None,
            working: true,
        };
        tx.send(TimelineMessage::Snapshot {
            event: TrackerEvent::Restarted(Stage::Searching),
            items: vec![item],
        })
        .unwrap();

        progress.abort("snapshot 2: Invalid transition: PLANNING -> SEARCHING");

        // The receiver is gone once the render thread has been joined.
        assert!(tx.send(TimelineMessage::Exit).is_err());
    }
}

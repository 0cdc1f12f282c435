use crate::timeline::{StepKind, TimelineItem};
use crate::ui::{theme, Icons};
use owo_colors::OwoColorize;

pub fn item_icon(kind: StepKind) -> &'static str {
    match kind {
        StepKind::Retrieving => Icons::SEARCH,
        StepKind::Organizing => Icons::BRAIN,
        StepKind::Generating => Icons::GEAR,
        StepKind::ViewFinished | StepKind::FixedSqlFinished => Icons::FILE_DONE,
        StepKind::Failed => Icons::CROSS,
        StepKind::Stopped => Icons::STOP,
    }
}

/// One timeline entry as terminal lines, without a trailing newline
pub fn render_item(item: &TimelineItem, last: bool) -> String {
    let dot = if item.working {
        Icons::DOT.style(theme().working.clone()).to_string()
    } else {
        Icons::RING.style(theme().muted.clone()).to_string()
    };

    let label = match item.kind {
        StepKind::Failed => item.label.style(theme().error.clone()).to_string(),
        StepKind::Stopped => item.label.style(theme().warn.clone()).to_string(),
        _ if item.working => item.label.style(theme().working.clone()).to_string(),
        _ => item.label.clone(),
    };

    let mut out = format!("{} {} {}", dot, item_icon(item.kind), label);
    if let Some(detail) = &item.detail {
        let rail = if last { " " } else { "│" };
        out.push('\n');
        out.push_str(&format!("{}    {}", rail.style(theme().muted.clone()), detail.style(theme().dim.clone())));
    }
    out
}

pub fn print_timeline(items: &[TimelineItem]) {
    if items.is_empty() {
        println!("{} {}", Icons::HOURGLASS, "Understanding question".style(theme().dim.clone()));
        return;
    }

    for (i, item) in items.iter().enumerate() {
        println!("{}", render_item(item, i + 1 == items.len()));
    }
}

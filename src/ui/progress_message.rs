use crate::timeline::TimelineItem;
use crate::tracker::TrackerEvent;

#[derive(Clone, Debug)]
pub enum TimelineMessage {
    /// Latest timeline for the tracked ask
    Snapshot {
        event: TrackerEvent,
        items: Vec<TimelineItem>,
    },
    Rejected(String),
    Exit,
}

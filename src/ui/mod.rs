pub mod icons;
pub mod output;
pub mod progress;
pub mod progress_message;
pub mod table;
pub mod theme;
pub mod timeline;

pub use icons::Icons;
pub use output::{banner, info, section, success, warn};
pub use progress::TimelineProgress;
pub use progress_message::TimelineMessage;
pub use table::{stage_table, state_table, TableBuilder};
pub use theme::{init_theme, theme, Theme};
pub use timeline::{item_icon, print_timeline, render_item};

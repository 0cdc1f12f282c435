pub struct Icons;

impl Icons {
    pub const SEARCH: &str = "🔍";
    pub const CHECK: &str = "✅";
    pub const CROSS: &str = "❌";
    pub const WARN: &str = "⚠️";
    pub const INFO: &str = "ℹ️";
    pub const STATS: &str = "📊";
    pub const BRAIN: &str = "🧠";
    pub const FILE_DONE: &str = "📄";
    pub const HOURGLASS: &str = "⏳";
    pub const GEAR: &str = "⚙️";
    pub const STOP: &str = "⏹️";
    pub const DOT: &str = "●";
    pub const RING: &str = "○";
}

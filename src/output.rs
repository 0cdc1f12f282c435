use std::sync::OnceLock;

static QUIET: OnceLock<bool> = OnceLock::new();

/// `ASKFLOW_QUIET=1` drops banners and decorations from human output
pub fn is_quiet() -> bool {
    *QUIET.get_or_init(|| {
        std::env::var("ASKFLOW_QUIET")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    })
}

//! Terminal UI rendering using ratatui.
//!
//! ## Submodules
//!
//! - [`matrix`]: Source × destination grid plus the selection panel
//! - [`detail`]: Popover with the full measurement behind one cell
//! - [`common`]: Shared components (header, status bar, help overlay)
//! - [`theme`]: Light/dark theme support with terminal auto-detection
//!
//! ## Rendering Architecture
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │ Header (common::render_header)       │
//! ├──────────────────────────────────────┤
//! │                                      │
//! │ Matrix (matrix::render)              │
//! │                                      │
//! ├──────────────────────────────────────┤
//! │ Selection + legend                   │
//! ├──────────────────────────────────────┤
//! │ Status Bar (common::render_status)   │
//! └──────────────────────────────────────┘
//!         ↑
//!    Overlays rendered on top:
//!    - detail::render_overlay
//!    - common::render_help
//! ```

pub mod common;
pub mod detail;
pub mod matrix;
pub mod theme;

pub use theme::Theme;

/// Shorten `s` to at most `max_len` characters, marking the cut with `…`.
pub(crate) fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{}…", truncated)
    }
}

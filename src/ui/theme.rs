/// Glyphs used to draw trees and entry markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub branch: &'static str,
    pub last_branch: &'static str,
    pub pipe: &'static str,
    pub blank: &'static str,
    pub folder_icon: &'static str,
    pub file_icon: &'static str,
    pub current_marker: &'static str,
    pub ok: &'static str,
    pub error: &'static str,
}

impl Theme {
    pub const UNICODE: Theme = Theme {
        branch: "├── ",
        last_branch: "└── ",
        pipe: "│   ",
        blank: "    ",
        folder_icon: "📁",
        file_icon: "📄",
        current_marker: " [Current]",
        ok: "✅",
        error: "❌",
    };

    /// For terminals and logs that mangle box drawing or emoji.
    pub const PLAIN: Theme = Theme {
        branch: "|-- ",
        last_branch: "`-- ",
        pipe: "|   ",
        blank: "    ",
        folder_icon: "[D]",
        file_icon: "[F]",
        current_marker: " [Current]",
        ok: "ok:",
        error: "error:",
    };
}

impl Default for Theme {
    fn default() -> Self {
        Theme::UNICODE
    }
}

//! Keyboard shortcut registry and dispatch.

use crate::ui::UiAction;

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub ctrl: bool,
    pub shift: bool,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(
        key: &'static str,
        ctrl: bool,
        shift: bool,
        description: &'static str,
    ) -> Self {
        Self {
            key,
            ctrl,
            shift,
            description,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+S").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl");
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(self.key);
        parts.join("+")
    }

    /// Whether a key press with these modifiers triggers this shortcut.
    pub fn matches(&self, key: &str, ctrl: bool, shift: bool) -> bool {
        self.ctrl == ctrl && self.shift == shift && self.key.eq_ignore_ascii_case(key)
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new("C", false, false, "Draw circles"),
            Shortcut::new("R", false, false, "Draw rectangles"),
            Shortcut::new("V", false, false, "Select and move shapes"),
            Shortcut::new("T", false, false, "Add a text label"),
            Shortcut::new("Delete", false, false, "Delete selected shape"),
            Shortcut::new("Backspace", false, false, "Delete selected shape"),
            Shortcut::new("S", true, false, "Export diagram..."),
            Shortcut::new("O", true, false, "Import diagram..."),
            Shortcut::new("N", true, true, "Clear canvas"),
            Shortcut::new("Escape", false, false, "Cancel current action"),
        ]
    }

    /// Resolve a key press to the action it triggers.
    pub fn action_for(key: &str, ctrl: bool, shift: bool) -> Option<UiAction> {
        let shortcut = Self::all()
            .into_iter()
            .find(|shortcut| shortcut.matches(key, ctrl, shift))?;

        let action = match (shortcut.key, shortcut.ctrl) {
            ("C", false) => UiAction::DrawCircle,
            ("R", false) => UiAction::DrawRect,
            ("V", false) => UiAction::SelectMode,
            ("T", false) => UiAction::AddText,
            ("Delete" | "Backspace", false) => UiAction::DeleteSelected,
            ("S", true) => UiAction::ExportDiagram,
            ("O", true) => UiAction::ImportDiagram,
            ("N", true) => UiAction::ClearCanvas,
            ("Escape", false) => UiAction::Cancel,
            _ => return None,
        };
        Some(action)
    }

    /// Log all shortcuts at startup.
    pub fn log_all() {
        for shortcut in Self::all() {
            log::info!("  {:12} {}", shortcut.format(), shortcut.description);
        }
    }
}

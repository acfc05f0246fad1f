//! Diagrammer Application
//!
//! The desktop shell: windowing, toolbar, text prompt, file dialogs and
//! the glue that feeds window input into the editor core.

mod app;
mod editor;
mod shortcuts;
mod ui;

pub use app::{App, AppConfig};
pub use editor::{Editor, PromptTextInput};
pub use shortcuts::{Shortcut, ShortcutRegistry};
pub use ui::{TextPrompt, UiAction, UiState, render_ui};

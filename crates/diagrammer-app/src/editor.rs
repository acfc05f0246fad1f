//! Editor session: the scene plus everything that mutates it.
//!
//! Window input and UI actions are translated here into controller calls,
//! and the resulting state is mirrored back into [`UiState`].

use crate::ui::{UiAction, UiState, from_editor_color, to_editor_color};
use diagrammer_core::controller::{
    Controller, RedrawRequests, RedrawSink, TextInput, TextReply, TextTicket,
};
use diagrammer_core::input::PointerEvent;
use diagrammer_core::scene::Scene;
use diagrammer_core::shapes::TextMeasure;
use diagrammer_core::storage::{read_diagram_file, write_artifact};
use diagrammer_core::tools::EditorState;
use diagrammer_core::{EditorError, EditorResult, Selection};
use std::path::{Path, PathBuf};

/// Answers text requests by opening the UI prompt.
///
/// The reply always arrives later, as a [`UiAction::SubmitText`].
pub struct PromptTextInput<'a> {
    ui_state: &'a mut UiState,
}

impl<'a> PromptTextInput<'a> {
    pub fn new(ui_state: &'a mut UiState) -> Self {
        Self { ui_state }
    }
}

impl TextInput for PromptTextInput<'_> {
    fn request_text(&mut self, prompt: &str, ticket: TextTicket) -> TextReply {
        self.ui_state.open_text_prompt(prompt, ticket);
        TextReply::Pending
    }
}

/// One open diagram and its interaction state.
#[derive(Debug, Default)]
pub struct Editor {
    pub scene: Scene,
    pub state: EditorState,
    controller: Controller,
    redraw: RedrawRequests,
}

impl Editor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current selection, for rendering.
    pub fn selection(&self) -> Selection {
        *self.controller.selection()
    }

    /// Whether a pointer drag is in progress.
    pub fn is_dragging(&self) -> bool {
        self.controller.is_dragging()
    }

    /// Whether a redraw was requested since the last call.
    pub fn take_redraw(&mut self) -> bool {
        self.redraw.take()
    }

    /// Feed a surface-local pointer event to the state machine.
    pub fn handle_pointer(
        &mut self,
        event: PointerEvent,
        measure: &dyn TextMeasure,
        ui_state: &mut UiState,
    ) {
        let mut text_input = PromptTextInput::new(ui_state);
        self.controller.handle_pointer(
            &mut self.scene,
            &mut self.state,
            event,
            measure,
            &mut text_input,
            &mut self.redraw,
        );
        self.sync_ui(ui_state);
    }

    /// Apply a toolbar, shortcut or prompt action.
    ///
    /// Export and import carry no path here; the shell resolves those
    /// through [`Editor::export_to`] and [`Editor::import_from`].
    pub fn apply(&mut self, action: UiAction, ui_state: &mut UiState) {
        // Mode switches abandon pending text entry.
        if matches!(
            action,
            UiAction::DrawCircle | UiAction::DrawRect | UiAction::SelectMode | UiAction::AddText
        ) {
            ui_state.text_prompt = None;
        }
        match action {
            UiAction::DrawCircle => {
                self.controller.select_draw_circle(&mut self.state, &mut self.redraw)
            }
            UiAction::DrawRect => self.controller.select_draw_rect(&mut self.state, &mut self.redraw),
            UiAction::SelectMode => {
                self.controller.select_select_mode(&mut self.state, &mut self.redraw)
            }
            UiAction::AddText => self.controller.select_add_text(&mut self.state, &mut self.redraw),
            UiAction::SetStrokeColor(color) => {
                self.controller
                    .set_stroke_color(&mut self.state, to_editor_color(color));
            }
            UiAction::SetFillColor(color) => {
                self.controller
                    .set_fill_color(&mut self.state, to_editor_color(color));
            }
            UiAction::DeleteSelected => {
                if !self.controller.delete_selected(&mut self.scene, &mut self.redraw) {
                    log::debug!("Nothing selected to delete");
                }
            }
            UiAction::ClearCanvas => {
                self.controller.clear_canvas(&mut self.scene, &mut self.redraw);
                ui_state.set_status("Canvas cleared");
            }
            UiAction::SubmitText { ticket, text } => {
                self.controller.complete_text_entry(
                    &mut self.scene,
                    &mut self.state,
                    ticket,
                    text,
                    &mut self.redraw,
                );
            }
            UiAction::Cancel => {
                self.controller.cancel_text_entry(&mut self.state);
                ui_state.text_prompt = None;
                self.redraw.request_redraw();
            }
            UiAction::ExportDiagram | UiAction::ImportDiagram => {
                log::debug!("{:?} needs a file path", action);
            }
        }
        self.sync_ui(ui_state);
    }

    /// Export the scene to `path` and report the outcome in the status bar.
    pub fn export_to(&self, path: &Path, ui_state: &mut UiState) -> EditorResult<PathBuf> {
        let result = self
            .controller
            .export_diagram(&self.scene)
            .and_then(|artifact| write_artifact(&artifact, path));
        match &result {
            Ok(written) => ui_state.set_status(format!(
                "Exported {} shapes to {}",
                self.scene.len(),
                written.display()
            )),
            Err(err) => report_error(err, ui_state),
        }
        result
    }

    /// Replace the scene with the diagram stored at `path`.
    ///
    /// Failures leave the scene untouched and show the error instead.
    pub fn import_from(&mut self, path: &Path, ui_state: &mut UiState) -> EditorResult<usize> {
        let result = read_diagram_file(path).and_then(|bytes| {
            self.controller
                .import_diagram(&mut self.scene, &bytes, &mut self.redraw)
        });
        match &result {
            Ok(count) => ui_state.set_status(format!("Imported {} shapes", count)),
            Err(err) => report_error(err, ui_state),
        }
        self.sync_ui(ui_state);
        result
    }

    /// Mirror editor state into the UI.
    pub fn sync_ui(&self, ui_state: &mut UiState) {
        ui_state.mode = self.state.mode;
        ui_state.pending_kind = self.state.pending_kind;
        ui_state.stroke_color = from_editor_color(self.state.stroke_color);
        ui_state.fill_color = from_editor_color(self.state.fill_color);
        ui_state.has_selection = self.controller.selected_id(&self.scene).is_some();
        ui_state.shape_count = self.scene.len();
    }
}

fn report_error(err: &EditorError, ui_state: &mut UiState) {
    if err.is_user_visible() {
        ui_state.set_error(err.to_string());
    } else {
        log::debug!("Not reporting: {}", err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diagrammer_core::input::MouseButton;
    use diagrammer_core::shapes::{ApproximateTextMeasure, Shape};
    use diagrammer_core::tools::Mode;
    use egui::Color32;
    use kurbo::Point;
    use tempfile::tempdir;

    fn down(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Down {
            position: Point::new(x, y),
            button: MouseButton::Left,
        }
    }

    fn up(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Up {
            position: Point::new(x, y),
            button: MouseButton::Left,
        }
    }

    fn moved(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Move {
            position: Point::new(x, y),
        }
    }

    fn drag(editor: &mut Editor, ui: &mut UiState, from: (f64, f64), to: (f64, f64)) {
        let measure = ApproximateTextMeasure::default();
        editor.handle_pointer(down(from.0, from.1), &measure, ui);
        editor.handle_pointer(moved(to.0, to.1), &measure, ui);
        editor.handle_pointer(up(to.0, to.1), &measure, ui);
    }

    #[test]
    fn test_draw_rect_with_colors_from_ui() {
        let mut editor = Editor::new();
        let mut ui = UiState::default();
        editor.apply(UiAction::DrawRect, &mut ui);
        editor.apply(UiAction::SetFillColor(Color32::from_rgb(0, 255, 0)), &mut ui);
        drag(&mut editor, &mut ui, (10.0, 20.0), (60.0, 80.0));

        assert_eq!(ui.shape_count, 1);
        let shape = editor.scene.shapes_ordered().next().unwrap();
        match shape {
            Shape::Rectangle(rect) => {
                assert_eq!((rect.width, rect.height), (50.0, 60.0));
                assert_eq!(rect.fill_color.to_css(), "#00ff00");
            }
            other => panic!("expected a rectangle, got {:?}", other),
        }
        assert!(editor.take_redraw());
        assert!(!editor.take_redraw());
    }

    #[test]
    fn test_text_prompt_round_trip() {
        let mut editor = Editor::new();
        let mut ui = UiState::default();
        let measure = ApproximateTextMeasure::default();
        editor.apply(UiAction::AddText, &mut ui);
        editor.handle_pointer(down(30.0, 40.0), &measure, &mut ui);

        let prompt = ui.text_prompt.clone().unwrap();
        assert_eq!(prompt.prompt, "Enter text for the shape:");
        assert_eq!(ui.mode, Mode::TextEntry);

        editor.apply(
            UiAction::SubmitText {
                ticket: prompt.ticket,
                text: Some("Hello".to_string()),
            },
            &mut ui,
        );
        assert_eq!(ui.mode, Mode::Select);
        assert_eq!(ui.shape_count, 1);
        match editor.scene.shapes_ordered().next().unwrap() {
            Shape::Text(label) => {
                assert_eq!(label.text, "Hello");
                assert_eq!((label.x, label.y), (30.0, 40.0));
            }
            other => panic!("expected text, got {:?}", other),
        }
    }

    #[test]
    fn test_cancel_closes_prompt() {
        let mut editor = Editor::new();
        let mut ui = UiState::default();
        let measure = ApproximateTextMeasure::default();
        editor.apply(UiAction::AddText, &mut ui);
        editor.handle_pointer(down(30.0, 40.0), &measure, &mut ui);
        assert!(ui.text_prompt.is_some());

        editor.apply(UiAction::Cancel, &mut ui);
        assert!(ui.text_prompt.is_none());
        assert_eq!(ui.mode, Mode::Select);
        assert!(editor.scene.is_empty());
    }

    #[test]
    fn test_mode_switch_closes_open_prompt() {
        let measure = ApproximateTextMeasure::default();
        for action in [
            UiAction::DrawRect,
            UiAction::DrawCircle,
            UiAction::SelectMode,
            UiAction::AddText,
        ] {
            let mut editor = Editor::new();
            let mut ui = UiState::default();
            editor.apply(UiAction::AddText, &mut ui);
            editor.handle_pointer(down(30.0, 40.0), &measure, &mut ui);
            let stale = ui.text_prompt.clone().unwrap();

            editor.apply(action.clone(), &mut ui);
            assert!(ui.text_prompt.is_none(), "{:?} left the prompt open", action);

            editor.apply(
                UiAction::SubmitText {
                    ticket: stale.ticket,
                    text: Some("late".to_string()),
                },
                &mut ui,
            );
            assert!(editor.scene.is_empty());
        }
    }

    #[test]
    fn test_silent_errors_leave_status_alone() {
        let mut ui = UiState::default();
        report_error(&EditorError::EmptyInput, &mut ui);
        assert!(ui.status.is_none());
        assert!(!ui.status_is_error);

        report_error(&EditorError::Io("disk full".into()), &mut ui);
        assert!(ui.status_is_error);
        assert_eq!(ui.status.as_deref(), Some("IO error: disk full"));
    }

    #[test]
    fn test_delete_selected_updates_ui() {
        let mut editor = Editor::new();
        let mut ui = UiState::default();
        drag(&mut editor, &mut ui, (100.0, 100.0), (130.0, 100.0));
        editor.apply(UiAction::SelectMode, &mut ui);
        let measure = ApproximateTextMeasure::default();
        editor.handle_pointer(down(100.0, 100.0), &measure, &mut ui);
        editor.handle_pointer(up(100.0, 100.0), &measure, &mut ui);
        assert!(ui.has_selection);

        editor.apply(UiAction::DeleteSelected, &mut ui);
        assert!(!ui.has_selection);
        assert_eq!(ui.shape_count, 0);
    }

    #[test]
    fn test_export_then_import_from_file() {
        let dir = tempdir().unwrap();
        let mut editor = Editor::new();
        let mut ui = UiState::default();
        drag(&mut editor, &mut ui, (100.0, 100.0), (130.0, 100.0));
        editor.apply(UiAction::DrawRect, &mut ui);
        drag(&mut editor, &mut ui, (10.0, 10.0), (40.0, 30.0));

        let written = editor.export_to(dir.path(), &mut ui).unwrap();
        assert_eq!(written.file_name().unwrap(), "diagram.json");
        assert!(!ui.status_is_error);

        let mut other = Editor::new();
        let mut other_ui = UiState::default();
        assert_eq!(other.import_from(&written, &mut other_ui).unwrap(), 2);
        assert_eq!(other_ui.shape_count, 2);
        assert_eq!(other_ui.status.as_deref(), Some("Imported 2 shapes"));
    }

    #[test]
    fn test_bad_import_keeps_scene_and_reports() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, br#"[{"type":"hexagon","x":1}]"#).unwrap();

        let mut editor = Editor::new();
        let mut ui = UiState::default();
        drag(&mut editor, &mut ui, (100.0, 100.0), (130.0, 100.0));
        let _ = editor.take_redraw();

        assert!(editor.import_from(&path, &mut ui).is_err());
        assert_eq!(editor.scene.len(), 1);
        assert!(ui.status_is_error);
        assert!(!editor.take_redraw());
    }

    #[test]
    fn test_missing_import_file_is_reported() {
        let dir = tempdir().unwrap();
        let mut editor = Editor::new();
        let mut ui = UiState::default();
        assert!(editor.import_from(&dir.path().join("nope.json"), &mut ui).is_err());
        assert!(ui.status_is_error);
    }
}

//! Interaction controller: turns pointer events and toolbar commands into
//! scene mutations according to the current mode.

use crate::error::{EditorError, EditorResult};
use crate::input::PointerEvent;
use crate::scene::Scene;
use crate::selection::{Selection, is_over_resize_handle};
use crate::shapes::{SerializableColor, Shape, ShapeId, TextLabel, TextMeasure};
use crate::storage::ExportArtifact;
use crate::tools::{EditorState, Mode, PendingShapeKind};
use kurbo::Point;

/// Prompt shown when asking for a label's text.
pub const TEXT_PROMPT: &str = "Enter text for the shape:";

/// Receives redraw requests after the scene or selection changed.
pub trait RedrawSink {
    fn request_redraw(&mut self);
}

/// Counts redraw requests until the host consumes them.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RedrawRequests {
    pub count: usize,
}

impl RedrawRequests {
    /// Whether any request arrived since the last call. Resets the count.
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.count) > 0
    }
}

impl RedrawSink for RedrawRequests {
    fn request_redraw(&mut self) {
        self.count += 1;
    }
}

/// Identifies one outstanding text prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextTicket(u64);

impl TextTicket {
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Answer from a text-input collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextReply {
    /// The user answered (or cancelled with `None`) immediately.
    Ready(Option<String>),
    /// The answer will arrive later through [`Controller::complete_text_entry`].
    Pending,
}

/// Asks the user for a label's text.
pub trait TextInput {
    fn request_text(&mut self, prompt: &str, ticket: TextTicket) -> TextReply;
}

/// What the pointer is currently dragging.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
enum DragState {
    #[default]
    Idle,
    /// Growing a freshly drawn shape from its anchor.
    Creating { id: ShapeId },
    /// Moving the selected shape.
    Moving { id: ShapeId },
    /// Dragging the selected shape's resize handle.
    Resizing { id: ShapeId },
}

#[derive(Debug, Clone, Copy)]
struct PendingText {
    ticket: TextTicket,
    position: Point,
}

/// Drives the Draw / Select / Resize / TextEntry state machine.
///
/// The scene and editor state are owned by the caller and passed in on
/// every call; the controller only keeps the selection and the transient
/// drag and prompt bookkeeping.
#[derive(Debug, Default)]
pub struct Controller {
    selection: Selection,
    drag: DragState,
    pending_text: Option<PendingText>,
    next_ticket: u64,
}

impl Controller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// The selected shape if it still exists.
    pub fn selected_id(&self, scene: &Scene) -> Option<ShapeId> {
        self.selection.resolve(scene)
    }

    pub fn is_dragging(&self) -> bool {
        self.drag != DragState::Idle
    }

    /// Ticket of the prompt awaiting an answer, if any.
    pub fn pending_text_ticket(&self) -> Option<TextTicket> {
        self.pending_text.map(|pending| pending.ticket)
    }

    /// Dispatch a pointer event to the matching handler.
    pub fn handle_pointer(
        &mut self,
        scene: &mut Scene,
        state: &mut EditorState,
        event: PointerEvent,
        measure: &dyn TextMeasure,
        text_input: &mut dyn TextInput,
        redraw: &mut dyn RedrawSink,
    ) {
        if !event.is_primary() {
            return;
        }
        match event {
            PointerEvent::Down { position, .. } => {
                self.pointer_down(scene, state, position, measure, text_input, redraw)
            }
            PointerEvent::Move { position } => self.pointer_move(scene, state, position, redraw),
            PointerEvent::Up { .. } => self.pointer_up(scene, state, redraw),
        }
    }

    pub fn pointer_down(
        &mut self,
        scene: &mut Scene,
        state: &mut EditorState,
        point: Point,
        measure: &dyn TextMeasure,
        text_input: &mut dyn TextInput,
        redraw: &mut dyn RedrawSink,
    ) {
        match state.mode {
            Mode::Draw => {
                let shape = state
                    .pending_kind
                    .placeholder(point, state.stroke_color, state.fill_color);
                let id = scene.add_shape(shape);
                self.drag = DragState::Creating { id };
                redraw.request_redraw();
            }
            Mode::Select | Mode::Resize => {
                if self.select_at(scene, state, point, measure) {
                    redraw.request_redraw();
                }
            }
            Mode::TextEntry => {
                let ticket = self.issue_ticket();
                match text_input.request_text(TEXT_PROMPT, ticket) {
                    TextReply::Ready(reply) => {
                        if let Err(err) = self.place_text(scene, state, point, reply, redraw) {
                            log::debug!("Text placement skipped: {}", err);
                        }
                    }
                    TextReply::Pending => {
                        self.pending_text = Some(PendingText { ticket, position: point });
                    }
                }
            }
        }
    }

    /// Resize handle of the current selection first, then the topmost shape.
    ///
    /// Returns whether the visible selection or the mode changed.
    fn select_at(
        &mut self,
        scene: &Scene,
        state: &mut EditorState,
        point: Point,
        measure: &dyn TextMeasure,
    ) -> bool {
        let before = (self.selection.resolve(scene), state.mode);
        self.pick_at(scene, state, point, measure);
        before != (self.selection.resolve(scene), state.mode)
    }

    fn pick_at(
        &mut self,
        scene: &Scene,
        state: &mut EditorState,
        point: Point,
        measure: &dyn TextMeasure,
    ) {
        if let Some(id) = self.selection.resolve(scene) {
            if scene
                .get(id)
                .is_some_and(|shape| is_over_resize_handle(shape, point))
            {
                self.drag = DragState::Resizing { id };
                state.set_mode(Mode::Resize);
                return;
            }
        }

        match scene.shape_at(point, measure) {
            Some(id) => {
                self.selection.select(id);
                if scene
                    .get(id)
                    .is_some_and(|shape| is_over_resize_handle(shape, point))
                {
                    self.drag = DragState::Resizing { id };
                    state.set_mode(Mode::Resize);
                } else {
                    self.drag = DragState::Moving { id };
                    state.set_mode(Mode::Select);
                }
            }
            None => {
                self.selection.clear();
                self.drag = DragState::Idle;
                state.set_mode(Mode::Select);
            }
        }
    }

    pub fn pointer_move(
        &mut self,
        scene: &mut Scene,
        state: &EditorState,
        point: Point,
        redraw: &mut dyn RedrawSink,
    ) {
        let changed = match self.drag {
            DragState::Idle => false,
            DragState::Creating { id } => resize_shape(scene, id, point),
            DragState::Resizing { id } if state.resize_active() => resize_shape(scene, id, point),
            DragState::Resizing { .. } => false,
            DragState::Moving { id } if state.mode == Mode::Select => match scene.get_mut(id) {
                Some(shape) => {
                    shape.move_to(point);
                    true
                }
                None => false,
            },
            DragState::Moving { .. } => false,
        };
        if changed {
            redraw.request_redraw();
        }
    }

    pub fn pointer_up(
        &mut self,
        scene: &mut Scene,
        state: &mut EditorState,
        redraw: &mut dyn RedrawSink,
    ) {
        if state.resize_active() {
            state.set_mode(Mode::Select);
        }

        match std::mem::take(&mut self.drag) {
            DragState::Creating { id } | DragState::Resizing { id } => {
                if let Some(shape) = scene.get_mut(id) {
                    shape.normalize();
                }
                redraw.request_redraw();
            }
            DragState::Moving { .. } | DragState::Idle => {}
        }
    }

    /// Deliver the answer to an asynchronous text prompt.
    ///
    /// Answers for a superseded prompt, or arriving after the user left
    /// text mode, are dropped. Returns the created label, if any.
    pub fn complete_text_entry(
        &mut self,
        scene: &mut Scene,
        state: &mut EditorState,
        ticket: TextTicket,
        reply: Option<String>,
        redraw: &mut dyn RedrawSink,
    ) -> Option<ShapeId> {
        let pending = match self.pending_text {
            Some(pending) if pending.ticket == ticket && state.mode == Mode::TextEntry => pending,
            _ => {
                log::debug!("Discarding stale text reply for ticket {}", ticket.value());
                return None;
            }
        };
        self.pending_text = None;

        match self.place_text(scene, state, pending.position, reply, redraw) {
            Ok(id) => Some(id),
            Err(err) => {
                log::debug!("Text placement skipped: {}", err);
                None
            }
        }
    }

    /// Leave text mode without placing anything.
    pub fn cancel_text_entry(&mut self, state: &mut EditorState) {
        if state.mode == Mode::TextEntry {
            self.pending_text = None;
            state.set_mode(Mode::Select);
        }
    }

    /// One-shot: the mode reverts to Select whatever the outcome.
    fn place_text(
        &mut self,
        scene: &mut Scene,
        state: &mut EditorState,
        position: Point,
        reply: Option<String>,
        redraw: &mut dyn RedrawSink,
    ) -> EditorResult<ShapeId> {
        state.set_mode(Mode::Select);
        let text = reply
            .filter(|text| !text.trim().is_empty())
            .ok_or(EditorError::EmptyInput)?;

        let label = TextLabel::new(position, text).with_color(state.stroke_color);
        let id = scene.add_shape(Shape::Text(label));
        redraw.request_redraw();
        Ok(id)
    }

    fn issue_ticket(&mut self) -> TextTicket {
        self.next_ticket += 1;
        TextTicket(self.next_ticket)
    }

    /// Reset transient state when the toolbar switches modes.
    fn reset_interaction(&mut self) {
        self.selection.clear();
        self.drag = DragState::Idle;
        self.pending_text = None;
    }

    pub fn select_draw_circle(&mut self, state: &mut EditorState, redraw: &mut dyn RedrawSink) {
        self.select_draw(state, PendingShapeKind::Circle, redraw);
    }

    pub fn select_draw_rect(&mut self, state: &mut EditorState, redraw: &mut dyn RedrawSink) {
        self.select_draw(state, PendingShapeKind::Rectangle, redraw);
    }

    fn select_draw(
        &mut self,
        state: &mut EditorState,
        kind: PendingShapeKind,
        redraw: &mut dyn RedrawSink,
    ) {
        self.reset_interaction();
        state.pending_kind = kind;
        state.set_mode(Mode::Draw);
        redraw.request_redraw();
    }

    pub fn select_select_mode(&mut self, state: &mut EditorState, redraw: &mut dyn RedrawSink) {
        self.reset_interaction();
        state.set_mode(Mode::Select);
        redraw.request_redraw();
    }

    pub fn select_add_text(&mut self, state: &mut EditorState, redraw: &mut dyn RedrawSink) {
        self.reset_interaction();
        state.set_mode(Mode::TextEntry);
        redraw.request_redraw();
    }

    /// Outline color for shapes created from now on.
    pub fn set_stroke_color(&mut self, state: &mut EditorState, color: SerializableColor) {
        state.stroke_color = color;
    }

    /// Fill color for shapes created from now on.
    pub fn set_fill_color(&mut self, state: &mut EditorState, color: SerializableColor) {
        state.fill_color = color;
    }

    pub fn clear_canvas(&mut self, scene: &mut Scene, redraw: &mut dyn RedrawSink) {
        scene.clear();
        self.selection.clear();
        self.drag = DragState::Idle;
        redraw.request_redraw();
    }

    /// Remove the selected shape. Returns false when nothing was selected.
    pub fn delete_selected(&mut self, scene: &mut Scene, redraw: &mut dyn RedrawSink) -> bool {
        let Some(id) = self.selection.resolve(scene) else {
            self.selection.clear();
            return false;
        };
        scene.remove_shape(id);
        self.selection.clear();
        self.drag = DragState::Idle;
        redraw.request_redraw();
        true
    }

    pub fn export_diagram(&self, scene: &Scene) -> EditorResult<ExportArtifact> {
        let artifact = ExportArtifact::from_scene(scene)?;
        log::info!("Exported {} shapes", scene.len());
        Ok(artifact)
    }

    /// Replace the scene with an imported diagram.
    ///
    /// On error the scene and selection are left as they were.
    pub fn import_diagram(
        &mut self,
        scene: &mut Scene,
        bytes: &[u8],
        redraw: &mut dyn RedrawSink,
    ) -> EditorResult<usize> {
        scene.replace_from(bytes).inspect_err(|err| {
            log::warn!("Import rejected: {}", err);
        })?;
        self.selection.clear();
        self.drag = DragState::Idle;
        redraw.request_redraw();
        log::info!("Imported {} shapes", scene.len());
        Ok(scene.len())
    }
}

/// Apply the size drag to `id`. Returns whether a shape was found.
fn resize_shape(scene: &mut Scene, id: ShapeId, point: Point) -> bool {
    match scene.get_mut(id) {
        Some(shape) => {
            shape.resize_to(point);
            true
        }
        None => false,
    }
}

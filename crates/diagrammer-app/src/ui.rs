//! UI components using egui.

use diagrammer_core::controller::TextTicket;
use diagrammer_core::shapes::SerializableColor;
use diagrammer_core::tools::{Mode, PendingShapeKind};
use egui::{
    Align2, Color32, Context, CornerRadius, CursorIcon, Frame, Margin, Pos2, Stroke, Vec2,
};

/// Standard colors used across panels.
mod theme {
    use egui::Color32;

    pub const TEXT: Color32 = Color32::from_rgb(60, 60, 60);
    pub const TEXT_MUTED: Color32 = Color32::from_rgb(120, 120, 120);
    pub const BORDER: Color32 = Color32::from_rgb(220, 220, 220);
    /// Selection/active color (blue)
    pub const ACCENT: Color32 = Color32::from_rgb(59, 130, 246);
    pub const SELECTED_BG: Color32 = Color32::from_rgb(235, 245, 255);
    pub const PANEL_BG: Color32 = Color32::from_rgba_premultiplied(250, 250, 252, 250);
    pub const ERROR: Color32 = Color32::from_rgb(220, 38, 38);
}

/// An open text prompt waiting for the user's answer.
#[derive(Debug, Clone)]
pub struct TextPrompt {
    /// Ticket the answer must be delivered with.
    pub ticket: TextTicket,
    /// Question shown above the input.
    pub prompt: String,
    /// Text typed so far.
    pub input: String,
    focus_requested: bool,
}

impl TextPrompt {
    pub fn new(prompt: &str, ticket: TextTicket) -> Self {
        Self {
            ticket,
            prompt: prompt.to_string(),
            input: String::new(),
            focus_requested: false,
        }
    }
}

/// UI state that persists across frames.
#[derive(Debug, Clone)]
pub struct UiState {
    /// Current interaction mode (mirrored from the editor).
    pub mode: Mode,
    /// Kind drawn in Draw mode (mirrored from the editor).
    pub pending_kind: PendingShapeKind,
    /// Outline color for new shapes.
    pub stroke_color: Color32,
    /// Fill color for new shapes.
    pub fill_color: Color32,
    /// Whether a live shape is selected.
    pub has_selection: bool,
    /// Number of shapes in the scene.
    pub shape_count: usize,
    /// Text prompt modal, when open.
    pub text_prompt: Option<TextPrompt>,
    /// Last message for the status bar.
    pub status: Option<String>,
    /// Whether `status` reports a failure.
    pub status_is_error: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            pending_kind: PendingShapeKind::default(),
            stroke_color: Color32::BLACK,
            fill_color: Color32::TRANSPARENT,
            has_selection: false,
            shape_count: 0,
            text_prompt: None,
            status: None,
            status_is_error: false,
        }
    }
}

impl UiState {
    /// Show an informational message in the status bar.
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
        self.status_is_error = false;
    }

    /// Show a failure in the status bar.
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
        self.status_is_error = true;
    }

    /// Open the text prompt for `ticket`, replacing any earlier one.
    pub fn open_text_prompt(&mut self, prompt: &str, ticket: TextTicket) {
        self.text_prompt = Some(TextPrompt::new(prompt, ticket));
    }

    fn is_tool_active(&self, tool: Tool) -> bool {
        match tool {
            Tool::Circle => {
                self.mode == Mode::Draw && self.pending_kind == PendingShapeKind::Circle
            }
            Tool::Rectangle => {
                self.mode == Mode::Draw && self.pending_kind == PendingShapeKind::Rectangle
            }
            Tool::Select => matches!(self.mode, Mode::Select | Mode::Resize),
            Tool::Text => self.mode == Mode::TextEntry,
        }
    }
}

/// Actions that can be triggered by UI.
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    /// Draw circles on the next drag.
    DrawCircle,
    /// Draw rectangles on the next drag.
    DrawRect,
    /// Switch to selection.
    SelectMode,
    /// Place a text label on the next click.
    AddText,
    /// Change stroke color.
    SetStrokeColor(Color32),
    /// Change fill color.
    SetFillColor(Color32),
    /// Delete the selected shape.
    DeleteSelected,
    /// Remove every shape.
    ClearCanvas,
    /// Save the diagram as JSON.
    ExportDiagram,
    /// Load a diagram from JSON.
    ImportDiagram,
    /// Answer to a text prompt (`None` when cancelled).
    SubmitText {
        ticket: TextTicket,
        text: Option<String>,
    },
    /// Abandon the current action.
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tool {
    Circle,
    Rectangle,
    Select,
    Text,
}

impl Tool {
    const ALL: [Tool; 4] = [Tool::Circle, Tool::Rectangle, Tool::Select, Tool::Text];

    fn label(self) -> &'static str {
        match self {
            Tool::Circle => "Circle",
            Tool::Rectangle => "Rectangle",
            Tool::Select => "Select",
            Tool::Text => "Text",
        }
    }

    fn shortcut(self) -> &'static str {
        match self {
            Tool::Circle => "C",
            Tool::Rectangle => "R",
            Tool::Select => "V",
            Tool::Text => "T",
        }
    }

    fn action(self) -> UiAction {
        match self {
            Tool::Circle => UiAction::DrawCircle,
            Tool::Rectangle => UiAction::DrawRect,
            Tool::Select => UiAction::SelectMode,
            Tool::Text => UiAction::AddText,
        }
    }
}

/// Convert an egui color into the editor's color type.
pub fn to_editor_color(color: Color32) -> SerializableColor {
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    SerializableColor::new(r, g, b, a)
}

/// Convert an editor color for display in egui.
pub fn from_editor_color(color: SerializableColor) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.a)
}

/// Render all UI panels and return any triggered action.
pub fn render_ui(ctx: &Context, ui_state: &mut UiState) -> Option<UiAction> {
    let toolbar_action = render_toolbar(ctx, ui_state);
    let style_action = render_style_panel(ctx, ui_state);
    let file_action = render_file_panel(ctx, ui_state);
    render_status_bar(ctx, ui_state);
    let prompt_action = render_text_prompt(ctx, ui_state);

    // The modal wins over anything clicked behind it.
    prompt_action
        .or(toolbar_action)
        .or(style_action)
        .or(file_action)
}

/// Common panel frame style.
fn panel_frame() -> Frame {
    Frame::new()
        .fill(theme::PANEL_BG)
        .corner_radius(CornerRadius::same(8))
        .stroke(Stroke::new(1.0, theme::BORDER))
        .shadow(egui::epaint::Shadow {
            spread: 0,
            blur: 8,
            offset: [0, 2],
            color: Color32::from_black_alpha(15),
        })
        .inner_margin(Margin::same(8))
}

/// Toolbar button with a selected state and a shortcut hint.
fn tool_button(ui: &mut egui::Ui, label: &str, shortcut: &str, selected: bool) -> bool {
    let text = egui::RichText::new(label).size(13.0).color(if selected {
        theme::ACCENT
    } else {
        theme::TEXT
    });
    let button = egui::Button::new(text)
        .min_size(Vec2::new(96.0, 28.0))
        .fill(if selected {
            theme::SELECTED_BG
        } else {
            Color32::TRANSPARENT
        })
        .corner_radius(CornerRadius::same(4));

    let response = ui
        .add(button)
        .on_hover_text(format!("{} ({})", label, shortcut))
        .on_hover_cursor(CursorIcon::PointingHand);
    response.clicked()
}

fn text_button(ui: &mut egui::Ui, label: &str, enabled: bool) -> bool {
    let button = egui::Button::new(egui::RichText::new(label).size(12.0).color(theme::TEXT))
        .corner_radius(CornerRadius::same(4));
    ui.add_enabled(enabled, button).clicked()
}

fn primary_btn(ui: &mut egui::Ui, label: &str) -> bool {
    let button = egui::Button::new(egui::RichText::new(label).color(Color32::WHITE))
        .fill(theme::ACCENT)
        .corner_radius(CornerRadius::same(6));
    ui.add(button).clicked()
}

fn secondary_btn(ui: &mut egui::Ui, label: &str) -> bool {
    let button = egui::Button::new(egui::RichText::new(label).color(theme::TEXT))
        .fill(Color32::WHITE)
        .stroke(Stroke::new(1.0, theme::BORDER))
        .corner_radius(CornerRadius::same(6));
    ui.add(button).clicked()
}

/// Render the tool selector and return any triggered action.
fn render_toolbar(ctx: &Context, ui_state: &UiState) -> Option<UiAction> {
    let mut action = None;

    egui::Area::new(egui::Id::new("toolbar"))
        .anchor(Align2::LEFT_CENTER, Vec2::new(12.0, 0.0))
        .show(ctx, |ui| {
            panel_frame().show(ui, |ui| {
                ui.vertical(|ui| {
                    ui.spacing_mut().item_spacing = Vec2::new(0.0, 2.0);

                    for tool in Tool::ALL {
                        if tool_button(
                            ui,
                            tool.label(),
                            tool.shortcut(),
                            ui_state.is_tool_active(tool),
                        ) {
                            action = Some(tool.action());
                        }
                    }
                });
            });
        });

    action
}

/// Stroke and fill pickers along the top edge.
fn render_style_panel(ctx: &Context, ui_state: &mut UiState) -> Option<UiAction> {
    let mut action = None;

    egui::Area::new(egui::Id::new("style_panel"))
        .anchor(Align2::CENTER_TOP, Vec2::new(0.0, 12.0))
        .show(ctx, |ui| {
            panel_frame().show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new("Stroke").size(12.0).color(theme::TEXT_MUTED));
                    if egui::color_picker::color_edit_button_srgba(
                        ui,
                        &mut ui_state.stroke_color,
                        egui::color_picker::Alpha::OnlyBlend,
                    )
                    .changed()
                    {
                        action = Some(UiAction::SetStrokeColor(ui_state.stroke_color));
                    }

                    ui.add_space(12.0);

                    ui.label(egui::RichText::new("Fill").size(12.0).color(theme::TEXT_MUTED));
                    if egui::color_picker::color_edit_button_srgba(
                        ui,
                        &mut ui_state.fill_color,
                        egui::color_picker::Alpha::OnlyBlend,
                    )
                    .changed()
                    {
                        action = Some(UiAction::SetFillColor(ui_state.fill_color));
                    }
                    if ui
                        .small_button("None")
                        .on_hover_text("No fill")
                        .clicked()
                    {
                        ui_state.fill_color = Color32::TRANSPARENT;
                        action = Some(UiAction::SetFillColor(Color32::TRANSPARENT));
                    }
                });
            });
        });

    action
}

/// File and canvas commands in the top-right corner.
fn render_file_panel(ctx: &Context, ui_state: &UiState) -> Option<UiAction> {
    let mut action = None;

    egui::Area::new(egui::Id::new("file_panel"))
        .anchor(Align2::RIGHT_TOP, Vec2::new(-12.0, 12.0))
        .show(ctx, |ui| {
            panel_frame().show(ui, |ui| {
                ui.horizontal(|ui| {
                    if text_button(ui, "Export", true) {
                        action = Some(UiAction::ExportDiagram);
                    }
                    if text_button(ui, "Import", true) {
                        action = Some(UiAction::ImportDiagram);
                    }
                    if text_button(ui, "Delete", ui_state.has_selection) {
                        action = Some(UiAction::DeleteSelected);
                    }
                    if text_button(ui, "Clear", ui_state.shape_count > 0) {
                        action = Some(UiAction::ClearCanvas);
                    }
                });
            });
        });

    action
}

/// Mode, shape count and the last status message.
fn render_status_bar(ctx: &Context, ui_state: &UiState) {
    egui::Area::new(egui::Id::new("status_bar"))
        .anchor(Align2::LEFT_BOTTOM, Vec2::new(12.0, -12.0))
        .interactable(false)
        .show(ctx, |ui| {
            panel_frame().show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        egui::RichText::new(ui_state.mode.label())
                            .size(12.0)
                            .strong()
                            .color(theme::TEXT),
                    );
                    ui.label(
                        egui::RichText::new(format!("{} shapes", ui_state.shape_count))
                            .size(12.0)
                            .color(theme::TEXT_MUTED),
                    );
                    if let Some(status) = &ui_state.status {
                        let color = if ui_state.status_is_error {
                            theme::ERROR
                        } else {
                            theme::TEXT_MUTED
                        };
                        ui.label(egui::RichText::new(status).size(12.0).color(color));
                    }
                });
            });
        });
}

/// Modal asking for a label's text.
fn render_text_prompt(ctx: &Context, ui_state: &mut UiState) -> Option<UiAction> {
    let prompt = ui_state.text_prompt.as_mut()?;
    let ticket = prompt.ticket;
    let mut answer: Option<Option<String>> = None;

    // Backdrop
    egui::Area::new(egui::Id::new("text_prompt_backdrop"))
        .fixed_pos(Pos2::ZERO)
        .order(egui::Order::Background)
        .show(ctx, |ui| {
            let screen_rect = ctx.input(|i| i.content_rect());
            let response = ui.allocate_rect(screen_rect, egui::Sense::click());
            ui.painter()
                .rect_filled(screen_rect, 0.0, Color32::from_black_alpha(80));
            if response.clicked() {
                answer = Some(None);
            }
        });

    egui::Area::new(egui::Id::new("text_prompt"))
        .anchor(Align2::CENTER_CENTER, Vec2::ZERO)
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            Frame::new()
                .fill(Color32::WHITE)
                .corner_radius(CornerRadius::same(12))
                .stroke(Stroke::new(1.0, Color32::from_gray(200)))
                .inner_margin(Margin::same(20))
                .show(ui, |ui| {
                    ui.set_width(300.0);
                    ui.vertical(|ui| {
                        ui.label(
                            egui::RichText::new(&prompt.prompt)
                                .size(16.0)
                                .strong()
                                .color(Color32::from_gray(30)),
                        );
                        ui.add_space(12.0);

                        let response = ui.add(
                            egui::TextEdit::singleline(&mut prompt.input).desired_width(300.0),
                        );
                        if !prompt.focus_requested {
                            response.request_focus();
                            prompt.focus_requested = true;
                        }

                        if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                            answer = Some(Some(prompt.input.clone()));
                        }
                        if ui.input(|i| i.key_pressed(egui::Key::Escape)) {
                            answer = Some(None);
                        }

                        ui.add_space(12.0);

                        ui.horizontal(|ui| {
                            if secondary_btn(ui, "Cancel") {
                                answer = Some(None);
                            }
                            if primary_btn(ui, "OK") {
                                answer = Some(Some(prompt.input.clone()));
                            }
                        });
                    });
                });
        });

    let text = answer?;
    ui_state.text_prompt = None;
    Some(UiAction::SubmitText { ticket, text })
}

//! Diagrammer Core Library
//!
//! Platform-agnostic scene model, hit-testing and interaction state machine
//! for the Diagrammer editor.

pub mod controller;
pub mod error;
pub mod input;
pub mod scene;
pub mod selection;
pub mod shapes;
pub mod storage;
pub mod tools;

pub use controller::{
    Controller, RedrawRequests, RedrawSink, TEXT_PROMPT, TextInput, TextReply, TextTicket,
};
pub use error::{EditorError, EditorResult};
pub use input::{MouseButton, PointerEvent};
pub use scene::Scene;
pub use selection::{RESIZE_HANDLE_SIZE, Selection, is_over_resize_handle, resize_handle_rect};
pub use shapes::{
    ApproximateTextMeasure, Circle, Rectangle, SerializableColor, Shape, ShapeId, ShapeTrait,
    TextLabel, TextMeasure,
};
pub use storage::ExportArtifact;
pub use tools::{EditorState, Mode, PendingShapeKind};

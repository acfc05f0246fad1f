//! Diagrammer Render Library
//!
//! Renderer abstraction for Diagrammer scenes.
//! The default implementation uses Vello for GPU-accelerated rendering and
//! Parley for text layout and measurement.

mod renderer;

#[cfg(feature = "vello-renderer")]
mod text;
#[cfg(feature = "vello-renderer")]
mod vello_impl;

pub use renderer::{RenderContext, RenderResult, Renderer, RendererError};

#[cfg(feature = "vello-renderer")]
pub use text::TextLayouter;
#[cfg(feature = "vello-renderer")]
pub use vello_impl::VelloRenderer;

//! Core application state and lifecycle.

use crate::editor::Editor;
use crate::shortcuts::ShortcutRegistry;
use crate::ui::{UiAction, UiState, render_ui};
use diagrammer_core::input::{MouseButton as PointerButton, PointerEvent, to_surface};
use diagrammer_render::{RenderContext, RenderResult, Renderer, RendererError, VelloRenderer};
use kurbo::{Point, Size};
use peniko::Color;
use std::sync::Arc;
use vello::util::RenderSurface;
use vello::wgpu::PresentMode;
use vello::{AaConfig, RenderParams, RendererOptions};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{Key, ModifiersState, NamedKey};
use winit::window::{Window, WindowId};

#[cfg(feature = "native")]
mod file_ops {
    use diagrammer_core::storage::EXPORT_FILE_NAME;
    use std::path::PathBuf;

    /// Ask where to save the exported diagram.
    pub fn export_path() -> Option<PathBuf> {
        let path = rfd::FileDialog::new()
            .set_title("Export Diagram")
            .set_file_name(EXPORT_FILE_NAME)
            .add_filter("Diagram", &["json"])
            .save_file();
        if path.is_none() {
            log::info!("Export cancelled");
        }
        path
    }

    /// Ask which diagram to import.
    pub fn import_path() -> Option<PathBuf> {
        let path = rfd::FileDialog::new()
            .set_title("Import Diagram")
            .add_filter("Diagram", &["json"])
            .pick_file();
        if path.is_none() {
            log::info!("Import cancelled");
        }
        path
    }
}

#[cfg(not(feature = "native"))]
mod file_ops {
    use std::path::PathBuf;

    pub fn export_path() -> Option<PathBuf> {
        log::warn!("File dialogs need the native feature");
        None
    }

    pub fn import_path() -> Option<PathBuf> {
        log::warn!("File dialogs need the native feature");
        None
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub background_color: Color,
    pub selection_color: Color,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Diagrammer".to_string(),
            width: 1280,
            height: 800,
            background_color: Color::WHITE,
            selection_color: Color::from_rgba8(59, 130, 246, 255),
        }
    }
}

/// Runtime state for the application.
struct AppState {
    // Windowing
    window: Arc<Window>,
    surface: RenderSurface<'static>,

    // Rendering
    vello_renderer: vello::Renderer,
    shape_renderer: VelloRenderer,
    /// Converts Vello's Rgba8Unorm output to the surface format.
    texture_blitter: vello::wgpu::util::TextureBlitter,

    // egui
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
    ui_state: UiState,

    // State
    editor: Editor,
    config: AppConfig,
    /// Last pointer position in logical window coordinates.
    cursor: Point,
    modifiers: ModifiersState,
}

impl AppState {
    fn scale_factor(&self) -> f64 {
        self.window.scale_factor()
    }

    fn pointer_event(&mut self, event: PointerEvent) {
        let measure = self.shape_renderer.text_measure();
        self.editor.handle_pointer(event, measure, &mut self.ui_state);
        self.flush_redraw();
    }

    fn handle_action(&mut self, action: UiAction) {
        match action {
            UiAction::ExportDiagram => {
                if let Some(path) = file_ops::export_path() {
                    if let Err(err) = self.editor.export_to(&path, &mut self.ui_state) {
                        log::error!("Failed to export diagram: {}", err);
                    }
                }
                self.window.request_redraw();
            }
            UiAction::ImportDiagram => {
                if let Some(path) = file_ops::import_path() {
                    if let Err(err) = self.editor.import_from(&path, &mut self.ui_state) {
                        log::error!("Failed to import {}: {}", path.display(), err);
                    }
                }
                self.window.request_redraw();
            }
            action => self.editor.apply(action, &mut self.ui_state),
        }
        self.flush_redraw();
    }

    /// Render `scene` with the egui overlay on top and present the frame.
    fn present(
        &mut self,
        render_cx: &vello::util::RenderContext,
        scene: &vello::Scene,
        textures_delta: &egui::TexturesDelta,
        egui_primitives: &[egui::ClippedPrimitive],
        pixels_per_point: f32,
    ) -> RenderResult<()> {
        let device_handle = &render_cx.devices[self.surface.dev_id];
        let device = &device_handle.device;
        let queue = &device_handle.queue;

        let surface_texture = self
            .surface
            .surface
            .get_current_texture()
            .map_err(|e| RendererError::Surface(format!("{:?}", e)))?;

        let width = self.surface.config.width;
        let height = self.surface.config.height;

        let params = RenderParams {
            base_color: self.config.background_color,
            width,
            height,
            antialiasing_method: AaConfig::Area,
        };

        // Vello needs a StorageBinding target; it is blitted to the surface afterward.
        let render_texture = device.create_texture(&vello::wgpu::TextureDescriptor {
            label: Some("vello render texture"),
            size: vello::wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: vello::wgpu::TextureDimension::D2,
            format: vello::wgpu::TextureFormat::Rgba8Unorm,
            usage: vello::wgpu::TextureUsages::STORAGE_BINDING
                | vello::wgpu::TextureUsages::COPY_SRC
                | vello::wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });

        let render_texture_view =
            render_texture.create_view(&vello::wgpu::TextureViewDescriptor::default());

        self.vello_renderer
            .render_to_texture(device, queue, scene, &render_texture_view, &params)
            .map_err(|e| RendererError::RenderFailed(format!("{:?}", e)))?;

        let surface_view = surface_texture
            .texture
            .create_view(&vello::wgpu::TextureViewDescriptor::default());

        {
            let mut blit_encoder =
                device.create_command_encoder(&vello::wgpu::CommandEncoderDescriptor {
                    label: Some("blit encoder"),
                });

            self.texture_blitter.copy(
                device,
                &mut blit_encoder,
                &render_texture_view,
                &surface_view,
            );

            queue.submit(std::iter::once(blit_encoder.finish()));
        }

        for (id, image_delta) in &textures_delta.set {
            self.egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }

        // Render egui on top
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [width, height],
            pixels_per_point,
        };

        {
            let mut egui_encoder =
                device.create_command_encoder(&vello::wgpu::CommandEncoderDescriptor {
                    label: Some("egui encoder"),
                });

            self.egui_renderer.update_buffers(
                device,
                queue,
                &mut egui_encoder,
                egui_primitives,
                &screen_descriptor,
            );

            let render_pass = egui_encoder.begin_render_pass(&vello::wgpu::RenderPassDescriptor {
                label: Some("egui render pass"),
                color_attachments: &[Some(vello::wgpu::RenderPassColorAttachment {
                    view: &surface_view,
                    resolve_target: None,
                    ops: vello::wgpu::Operations {
                        load: vello::wgpu::LoadOp::Load, // Keep Vello content
                        store: vello::wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            // egui-wgpu wants a 'static render pass
            let mut render_pass = render_pass.forget_lifetime();
            self.egui_renderer
                .render(&mut render_pass, egui_primitives, &screen_descriptor);
            drop(render_pass);

            queue.submit(std::iter::once(egui_encoder.finish()));
        }

        for id in &textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
        surface_texture.present();
        Ok(())
    }

    /// Forward editor redraw requests to the window.
    fn flush_redraw(&mut self) {
        if self.editor.take_redraw() {
            self.window.request_redraw();
        }
    }
}

/// Main application struct.
pub struct App {
    config: AppConfig,
    state: Option<AppState>,
    render_cx: Option<vello::util::RenderContext>,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    /// Create a new application with default configuration.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Create a new application with custom configuration.
    pub fn with_config(config: AppConfig) -> Self {
        Self {
            config,
            state: None,
            render_cx: None,
        }
    }

    /// Run the application.
    pub async fn run() {
        let event_loop = EventLoop::new().expect("Failed to create event loop");
        let mut app = App::new();
        event_loop.run_app(&mut app).expect("Event loop error");
    }

    /// Finish initialization after surface is created.
    fn finish_init(&mut self, window: Arc<Window>, surface: RenderSurface<'static>) {
        let render_cx = self.render_cx.as_ref().expect("RenderContext not initialized");
        let device = &render_cx.devices[surface.dev_id].device;

        let vello_renderer = vello::Renderer::new(device, RendererOptions::default())
            .expect("Failed to create Vello renderer");

        let texture_blitter =
            vello::wgpu::util::TextureBlitter::new(device, surface.config.format);

        // Initialize egui
        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(
            device,
            surface.config.format,
            egui_wgpu::RendererOptions::default(),
        );

        log::info!(
            "Diagrammer initialized - {}x{}",
            surface.config.width,
            surface.config.height
        );

        let editor = Editor::new();
        let mut ui_state = UiState::default();
        editor.sync_ui(&mut ui_state);

        self.state = Some(AppState {
            window: window.clone(),
            surface,
            vello_renderer,
            shape_renderer: VelloRenderer::new(),
            texture_blitter,
            egui_ctx,
            egui_state,
            egui_renderer,
            ui_state,
            editor,
            config: self.config.clone(),
            cursor: Point::ZERO,
            modifiers: ModifiersState::empty(),
        });

        // Request initial redraw
        window.request_redraw();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        log::info!("Creating window...");

        let window_attrs = Window::default_attributes()
            .with_title(&self.config.title)
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));

        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .expect("Failed to create window"),
        );

        let size = window.inner_size();
        let (width, height) = if size.width == 0 || size.height == 0 {
            (self.config.width, self.config.height)
        } else {
            (size.width, size.height)
        };

        log::info!("Surface size: {}x{}", width, height);

        let render_cx = self
            .render_cx
            .get_or_insert_with(vello::util::RenderContext::new);

        let surface = pollster::block_on(render_cx.create_surface(
            window.clone(),
            width,
            height,
            PresentMode::AutoVsync,
        ))
        .expect("Failed to create surface");

        // Transmute lifetime to 'static - safe because App owns everything
        let surface: RenderSurface<'static> = unsafe { std::mem::transmute(surface) };
        self.finish_init(window, surface);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(state) = &mut self.state else {
            return;
        };

        // Let egui process the event first
        let egui_response = state.egui_state.on_window_event(&state.window, &event);
        if egui_response.repaint {
            state.window.request_redraw();
        }

        let egui_wants_input = egui_response.consumed
            || state.egui_ctx.is_pointer_over_area()
            || state.egui_ctx.wants_pointer_input()
            || state.egui_ctx.wants_keyboard_input();

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if size.width == 0 || size.height == 0 {
                    return;
                }

                if let Some(render_cx) = self.render_cx.as_mut() {
                    render_cx.resize_surface(&mut state.surface, size.width, size.height);
                }

                state.window.request_redraw();
            }

            WindowEvent::ModifiersChanged(modifiers) => {
                state.modifiers = modifiers.state();
            }

            WindowEvent::RedrawRequested => {
                let egui_input = state.egui_state.take_egui_input(&state.window);
                let mut action: Option<UiAction> = None;
                let egui_output = state.egui_ctx.run(egui_input, |ctx| {
                    action = render_ui(ctx, &mut state.ui_state);
                });
                if let Some(action) = action {
                    state.handle_action(action);
                }

                state
                    .egui_state
                    .handle_platform_output(&state.window, egui_output.platform_output);
                let egui_primitives = state
                    .egui_ctx
                    .tessellate(egui_output.shapes, egui_output.pixels_per_point);

                let scale = state.scale_factor();
                let width = state.surface.config.width;
                let height = state.surface.config.height;

                let render_ctx = RenderContext::new(
                    &state.editor.scene,
                    Size::new(width as f64 / scale, height as f64 / scale),
                )
                .with_selection(state.editor.selection())
                .with_scale_factor(scale)
                .with_background(state.config.background_color)
                .with_selection_color(state.config.selection_color);
                state.shape_renderer.build_scene(&render_ctx);
                let scene = state.shape_renderer.take_scene();

                let Some(render_cx) = self.render_cx.as_ref() else {
                    return;
                };
                if let Err(err) = state.present(
                    render_cx,
                    &scene,
                    &egui_output.textures_delta,
                    &egui_primitives,
                    egui_output.pixels_per_point,
                ) {
                    log::warn!("{}", err);
                    return;
                }

                let egui_needs_repaint = egui_output
                    .viewport_output
                    .get(&egui::ViewportId::ROOT)
                    .is_some_and(|viewport| viewport.repaint_delay.is_zero());
                if egui_needs_repaint {
                    state.window.request_redraw();
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                let logical = position.to_logical::<f64>(state.scale_factor());
                state.cursor = to_surface(Point::new(logical.x, logical.y), Point::ZERO);

                // A drag that wandered over a panel still belongs to the canvas.
                if egui_wants_input && !state.editor.is_dragging() {
                    return;
                }

                let position = state.cursor;
                state.pointer_event(PointerEvent::Move { position });
            }

            WindowEvent::MouseInput {
                state: btn_state,
                button,
                ..
            } => {
                let button = match button {
                    MouseButton::Left => PointerButton::Left,
                    MouseButton::Right => PointerButton::Right,
                    MouseButton::Middle => PointerButton::Middle,
                    _ => return,
                };
                let position = state.cursor;

                match btn_state {
                    ElementState::Pressed => {
                        if egui_wants_input {
                            return;
                        }
                        state.pointer_event(PointerEvent::Down { position, button });
                    }
                    ElementState::Released => {
                        if egui_wants_input && !state.editor.is_dragging() {
                            return;
                        }
                        state.pointer_event(PointerEvent::Up { position, button });
                    }
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if egui_wants_input || event.state != ElementState::Pressed {
                    return;
                }

                let key_str = match &event.logical_key {
                    Key::Named(named) => match named {
                        NamedKey::Escape => "Escape",
                        NamedKey::Delete => "Delete",
                        NamedKey::Backspace => "Backspace",
                        _ => return,
                    },
                    Key::Character(c) => c.as_str(),
                    _ => return,
                };

                let ctrl = state.modifiers.control_key() || state.modifiers.super_key();
                let shift = state.modifiers.shift_key();
                if let Some(action) = ShortcutRegistry::action_for(key_str, ctrl, shift) {
                    log::debug!("Shortcut {} -> {:?}", key_str, action);
                    state.handle_action(action);
                }
            }

            _ => {}
        }
    }
}

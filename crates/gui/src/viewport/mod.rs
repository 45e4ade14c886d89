//! Cube viewport panel with OpenGL rendering

mod gl_renderer;

use std::sync::{Arc, Mutex};
use std::time::Instant;

use egui::Ui;
use ledcube_core::FrameMesh;

use crate::state::AppState;
use gl_renderer::GlRenderer;

/// egui reports about 50 points per wheel notch; the zoom control expects 120
const WHEEL_UNITS_PER_POINT: f32 = 2.4;

/// Cube viewport panel
pub struct ViewportPanel {
    gl_renderer: Option<Arc<Mutex<GlRenderer>>>,
    /// Latest frame, shared with the paint callback
    mesh: Option<Arc<FrameMesh>>,
    mesh_version: u64,
    /// Sub-pixel drag and sub-unit wheel motion not yet applied
    drag_remainder: egui::Vec2,
    wheel_remainder: f32,
}

impl ViewportPanel {
    pub fn new() -> Self {
        Self {
            gl_renderer: None,
            mesh: None,
            mesh_version: 0,
            drag_remainder: egui::Vec2::ZERO,
            wheel_remainder: 0.0,
        }
    }

    /// Initialize GL renderer (must be called with a GL context)
    pub fn init_gl(&mut self, gl: &glow::Context) {
        let renderer = GlRenderer::new(gl);
        self.gl_renderer = Some(Arc::new(Mutex::new(renderer)));
    }

    /// Free the GL program and buffers (must be called with the same GL context)
    pub fn destroy_gl(&mut self, gl: &glow::Context) {
        if let Some(renderer) = self.gl_renderer.take() {
            if let Ok(r) = renderer.lock() {
                r.destroy(gl);
            }
        }
    }

    pub fn show(&mut self, ui: &mut Ui, state: &mut AppState) {
        let (rect, response) =
            ui.allocate_exact_size(ui.available_size(), egui::Sense::click_and_drag());

        // ── Viewport size ────────────────────────────────
        let ppp = ui.ctx().pixels_per_point();
        let size = rect.size() * ppp;
        state
            .core
            .resize(size.x.max(0.0) as u32, size.y.max(0.0) as u32);

        // ── Mouse rotation and zoom ──────────────────────
        self.handle_drag(&response, state);
        if response.hovered() {
            self.handle_wheel(ui, state);
        }

        // ── Frame tick ───────────────────────────────────
        let now = Instant::now();
        if let Some(frame) = state.core.tick(now) {
            self.mesh = Some(Arc::new(FrameMesh::from_frame(&frame)));
            self.mesh_version += 1;
        }
        ui.ctx()
            .request_repaint_after(state.core.until_next_frame(now));

        if !ui.is_rect_visible(rect) {
            return;
        }

        self.render_gl(ui, rect, state);
    }

    fn handle_drag(&mut self, response: &egui::Response, state: &mut AppState) {
        if response.drag_started() {
            self.drag_remainder = egui::Vec2::ZERO;
        }
        if !response.dragged_by(egui::PointerButton::Primary) {
            return;
        }

        self.drag_remainder += response.drag_delta();
        let dx = self.drag_remainder.x.trunc();
        let dy = self.drag_remainder.y.trunc();
        if dx != 0.0 || dy != 0.0 {
            self.drag_remainder -= egui::vec2(dx, dy);
            state.core.rotate_by_drag(dx as i32, dy as i32);
        }
    }

    fn handle_wheel(&mut self, ui: &Ui, state: &mut AppState) {
        let scroll = ui.input(|i| i.raw_scroll_delta.y);
        if scroll.abs() < f32::EPSILON {
            return;
        }

        self.wheel_remainder += scroll * WHEEL_UNITS_PER_POINT;
        let delta = self.wheel_remainder.trunc();
        self.wheel_remainder -= delta;
        if delta != 0.0 {
            state.core.zoom_by_wheel(delta as i32);
        }
    }

    fn render_gl(&self, ui: &mut Ui, rect: egui::Rect, state: &AppState) {
        let Some(gl_renderer) = &self.gl_renderer else {
            ui.painter().text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                "OpenGL unavailable",
                egui::FontId::proportional(16.0),
                egui::Color32::GRAY,
            );
            return;
        };

        let renderer_clone = gl_renderer.clone();
        let mesh = self.mesh.clone();
        let version = self.mesh_version;
        let mvp = state.core.view_projection();

        let callback = egui::PaintCallback {
            rect,
            callback: Arc::new(egui_glow::CallbackFn::new(move |info, painter| {
                let gl = painter.gl();

                let clip = info.clip_rect_in_pixels();
                let viewport = [
                    clip.left_px as i32,
                    clip.from_bottom_px as i32,
                    clip.width_px as i32,
                    clip.height_px as i32,
                ];

                if let Ok(mut r) = renderer_clone.lock() {
                    if let Some(mesh) = &mesh {
                        r.sync_mesh(gl, mesh, version);
                    }
                    r.paint(gl, &gl_renderer::RenderParams { viewport, mvp });
                }
            })),
        };

        ui.painter().add(callback);
    }
}

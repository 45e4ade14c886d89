//! Main application module

mod keyboard;
mod menus;
mod panel;
mod styles;

use std::path::PathBuf;

use eframe::egui;

use crate::state::settings::JsonSettingsStore;
use crate::state::AppState;
use crate::viewport::ViewportPanel;

/// Main application
pub struct LedCubeApp {
    state: AppState,
    viewport: ViewportPanel,
}

impl LedCubeApp {
    pub fn new(cc: &eframe::CreationContext<'_>, initial_face: Option<PathBuf>) -> Self {
        let mut state = AppState::new(Box::new(JsonSettingsStore::open_default()));

        // CLI argument selects the face animation at startup
        if let Some(path) = initial_face {
            state.load_face(&path);
        }

        styles::configure_styles(&cc.egui_ctx);

        let mut viewport = ViewportPanel::new();

        // Initialize GL renderer if glow context is available
        if let Some(gl) = cc.gl.as_ref() {
            viewport.init_gl(gl);
        } else {
            tracing::error!("No glow context; the cube will not be drawn");
        }

        Self { state, viewport }
    }
}

impl eframe::App for LedCubeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        keyboard::handle_keyboard(ctx);

        // ── Menu bar ──────────────────────────────────────────
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                menus::file_menu(ui, &mut self.state);
                menus::animation_menu(ui, &mut self.state);
            });
        });

        // ── Status bar ───────────────────────────────────────
        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(22.0)
            .frame(
                egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::symmetric(8, 2)),
            )
            .show(ctx, |ui| {
                panel::status_line(ui, &self.state);
            });

        // ── Right panel: controls ────────────────────────────
        egui::SidePanel::right("controls")
            .default_width(260.0)
            .width_range(220.0..=400.0)
            .resizable(true)
            .frame(egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::same(6)))
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    panel::show(ui, &mut self.state);
                });
            });

        // ── Central panel: cube viewport ─────────────────────
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                self.viewport.show(ui, &mut self.state);
            });

        // Mouse input above may have moved rotation or zoom
        self.state.sync_controls();
    }

    fn on_exit(&mut self, gl: Option<&glow::Context>) {
        if let Some(gl) = gl {
            self.viewport.destroy_gl(gl);
        }
    }
}

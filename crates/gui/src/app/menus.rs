//! Application menu bar

use eframe::egui;
use ledcube_core::AnimationKind;

use crate::state::AppState;

/// Show the file menu
pub fn file_menu(ui: &mut egui::Ui, state: &mut AppState) {
    ui.menu_button("File", |ui| {
        if ui.button("Open Point Cloud…").clicked() {
            ui.close_menu();
            pick_face_file(state);
        }
        ui.separator();
        if ui.button("Quit").clicked() {
            ui.close_menu();
            ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
        }
    });
}

/// Show the animation menu, mirroring the radio buttons in the panel
pub fn animation_menu(ui: &mut egui::Ui, state: &mut AppState) {
    ui.menu_button("Animation", |ui| {
        let current = state.core.animation().kind();
        for kind in AnimationKind::all() {
            if ui
                .radio(current == *kind, kind.display_name())
                .clicked()
            {
                ui.close_menu();
                choose_animation(state, *kind);
            }
        }
    });
}

/// Animation selection from the UI. Face asks for a file first; a
/// cancelled dialog still selects Face with nothing lit.
pub fn choose_animation(state: &mut AppState, kind: AnimationKind) {
    match kind {
        AnimationKind::Face => pick_face_file(state),
        other => state.select_animation(other),
    }
}

fn pick_face_file(state: &mut AppState) {
    match rfd::FileDialog::new()
        .set_title("Open Point Cloud")
        .add_filter("Point cloud", &["xyz", "txt"])
        .add_filter("All files", &["*"])
        .pick_file()
    {
        Some(path) => state.load_face(&path),
        None => {
            tracing::info!("Point cloud selection cancelled");
            state.select_animation(AnimationKind::Face);
        }
    }
}

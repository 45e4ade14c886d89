//! Keyboard shortcut handling

use eframe::egui;

/// Handle keyboard shortcuts for the application
pub fn handle_keyboard(ctx: &egui::Context) {
    // Don't handle shortcuts when a text field is focused
    if ctx.memory(|m| m.focused().is_some()) {
        return;
    }

    // Escape quits
    if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        tracing::info!("Escape pressed, closing");
        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
    }
}

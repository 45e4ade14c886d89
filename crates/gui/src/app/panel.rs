//! Control panel: every widget forwards to a `RenderCore` setter

use egui::Ui;
use ledcube_core::driver::{MAX_SPACING_TENTHS, MIN_SPACING_TENTHS};
use ledcube_core::grid::MAX_AXIS_CELLS;
use ledcube_core::projection::ZOOM_RANGE;
use ledcube_core::{AnimationKind, Axis, DrawMode};

use super::menus;
use crate::state::AppState;

pub fn show(ui: &mut Ui, state: &mut AppState) {
    ui.heading("View");
    ui.separator();
    view_controls(ui, state);

    ui.add_space(8.0);
    ui.heading("Grid");
    ui.separator();
    grid_controls(ui, state);

    ui.add_space(8.0);
    ui.heading("Animation");
    ui.separator();
    animation_controls(ui, state);
}

pub fn status_line(ui: &mut Ui, state: &AppState) {
    ui.horizontal(|ui| {
        let grid = state.core.grid();
        ui.label(format!(
            "{} x {} x {} {}",
            grid.x_cubes,
            grid.y_cubes,
            grid.z_cubes,
            grid.mode.display_name()
        ));
        ui.separator();
        ui.label(state.core.animation().kind().display_name());
        if let Some(status) = &state.status {
            ui.separator();
            ui.weak(status);
        }
    });
}

fn view_controls(ui: &mut Ui, state: &mut AppState) {
    egui::Grid::new("view_controls")
        .num_columns(2)
        .spacing([8.0, 4.0])
        .show(ui, |ui| {
            for axis in Axis::all() {
                ui.label(format!("Rotate {}", axis.label()));
                let mut degrees = state.controls.rotation[axis.index()];
                if ui
                    .add(egui::Slider::new(&mut degrees, 0..=359).suffix("°"))
                    .changed()
                {
                    state.core.set_rotation(axis, degrees);
                }
                ui.end_row();
            }

            ui.label("Zoom");
            let mut zoom = state.controls.zoom;
            if ui
                .add(egui::Slider::new(&mut zoom, -ZOOM_RANGE..=ZOOM_RANGE))
                .changed()
            {
                state.core.set_zoom(zoom);
            }
            ui.end_row();

            ui.label("Transparency");
            let mut percent = state.core.transparency_percent();
            if ui
                .add(egui::Slider::new(&mut percent, 0..=100).suffix("%"))
                .changed()
            {
                state.core.set_transparency(percent);
            }
            ui.end_row();
        });

    let mut draw_off = state.core.draw_off_translucent();
    if ui.checkbox(&mut draw_off, "Draw off LEDs translucent").changed() {
        state.core.set_draw_off_translucent(draw_off);
    }
}

fn grid_controls(ui: &mut Ui, state: &mut AppState) {
    egui::Grid::new("grid_controls")
        .num_columns(2)
        .spacing([8.0, 4.0])
        .show(ui, |ui| {
            ui.label("Draw mode");
            let current = state.core.grid().mode;
            let mut selected = current;
            egui::ComboBox::from_id_salt("draw_mode")
                .selected_text(current.display_name())
                .show_ui(ui, |ui| {
                    for mode in DrawMode::all() {
                        ui.selectable_value(&mut selected, *mode, mode.display_name());
                    }
                });
            if selected != current {
                state.core.set_mode(selected.index());
            }
            ui.end_row();

            ui.label("Spacing");
            let mut tenths = state.core.spacing_tenths();
            if ui
                .add(
                    egui::Slider::new(&mut tenths, MIN_SPACING_TENTHS..=MAX_SPACING_TENTHS)
                        .custom_formatter(|v, _| format!("{:.1}", v / 10.0)),
                )
                .changed()
            {
                state.core.set_spacing(tenths);
            }
            ui.end_row();

            for axis in Axis::all() {
                ui.label(format!("{} size", axis.label()));
                let mut count = state.core.grid().count(axis) as i32;
                let locked = state.keep_cubic && axis != Axis::X;
                let response = ui.add_enabled(
                    !locked,
                    egui::DragValue::new(&mut count)
                        .speed(0.2)
                        .range(0..=MAX_AXIS_CELLS as i32),
                );
                if response.changed() {
                    state.set_axis_size(axis, count);
                }
                ui.end_row();
            }
        });

    let mut keep = state.keep_cubic;
    if ui.checkbox(&mut keep, "Keep dimensions cubic").changed() {
        state.set_keep_cubic(keep);
    }
}

fn animation_controls(ui: &mut Ui, state: &mut AppState) {
    let current = state.core.animation().kind();
    for kind in AnimationKind::all() {
        if ui.radio(current == *kind, kind.display_name()).clicked() && current != *kind {
            menus::choose_animation(state, *kind);
        }
    }

    if let Some(face) = state.core.animation().face_points() {
        ui.weak(format!("{} points", face.len()));
    }
}

//! Application state shared by the control panel and the viewport

pub mod settings;

use std::path::Path;
use std::sync::mpsc::{self, Receiver};

use ledcube_core::{AnimationKind, Axis, ChangeEvent, RenderCore, SettingsStore};

/// Values shown by the rotation and zoom controls. Kept in sync with the
/// core through its change notifications, so mouse input moves the sliders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewControls {
    pub rotation: [i32; 3],
    pub zoom: i32,
}

/// Top-level application state
pub struct AppState {
    pub core: RenderCore,
    pub controls: ViewControls,
    /// Lock all three axis sizes to the X size
    pub keep_cubic: bool,
    /// Last message shown in the status line
    pub status: Option<String>,
    events: Receiver<ChangeEvent>,
}

impl AppState {
    pub fn new(settings: Box<dyn SettingsStore>) -> Self {
        let mut core = RenderCore::new(settings);
        let (tx, events) = mpsc::channel();
        core.subscribe(move |event| {
            let _ = tx.send(*event);
        });

        let controls = ViewControls {
            rotation: core.view().rotation,
            zoom: core.view().raw_zoom,
        };

        Self {
            core,
            controls,
            keep_cubic: false,
            status: None,
            events,
        }
    }

    /// Apply pending core notifications to the control values
    pub fn sync_controls(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            match event {
                ChangeEvent::RotationChanged { axis, degrees } => {
                    self.controls.rotation[axis.index()] = degrees;
                }
                ChangeEvent::ZoomChanged { raw } => self.controls.zoom = raw,
            }
        }
    }

    /// Size change from one of the axis spin boxes
    pub fn set_axis_size(&mut self, axis: Axis, count: i32) {
        if self.keep_cubic {
            self.core.set_uniform_size(count);
        } else {
            self.core.set_axis_size(axis, count);
        }
    }

    /// Toggle "keep dimensions cubic"; turning it on snaps Y and Z to X
    pub fn set_keep_cubic(&mut self, keep: bool) {
        self.keep_cubic = keep;
        if keep {
            self.core.set_uniform_size(self.core.grid().x_cubes as i32);
        }
    }

    /// Animation radio buttons. Face without a file starts empty.
    pub fn select_animation(&mut self, kind: AnimationKind) {
        self.core.select_animation(kind);
        self.status = None;
    }

    /// Import a point cloud and switch to the face animation
    pub fn load_face(&mut self, path: &Path) {
        match self.core.load_face_file(path) {
            Ok(count) => {
                self.status = Some(format!("Loaded {count} points from {}", path.display()));
            }
            Err(e) => {
                tracing::error!("{e:#}");
                self.status = Some(format!("{e:#}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledcube_core::MemoryStore;

    fn state() -> AppState {
        AppState::new(Box::new(MemoryStore::new()))
    }

    #[test]
    fn test_controls_follow_core() {
        let mut s = state();
        assert_eq!(s.controls.rotation, [45, 45, 0]);

        s.core.rotate_by_drag(-50, 10);
        s.core.set_zoom(30);
        s.sync_controls();
        assert_eq!(s.controls.rotation, [55, 355, 0]);
        assert_eq!(s.controls.zoom, 30);
    }

    #[test]
    fn test_keep_cubic_snaps_to_x() {
        let mut s = state();
        s.core.set_axis_size(Axis::X, 6);
        s.set_keep_cubic(true);
        let g = s.core.grid();
        assert_eq!((g.x_cubes, g.y_cubes, g.z_cubes), (6, 6, 6));

        s.set_axis_size(Axis::X, 9);
        let g = s.core.grid();
        assert_eq!((g.x_cubes, g.y_cubes, g.z_cubes), (9, 9, 9));

        s.set_keep_cubic(false);
        s.set_axis_size(Axis::Z, 2);
        assert_eq!(s.core.grid().z_cubes, 2);
        assert_eq!(s.core.grid().x_cubes, 9);
    }

    #[test]
    fn test_failed_face_load_reports_status() {
        let mut s = state();
        let dir = tempfile::tempdir().unwrap();
        s.load_face(&dir.path().join("nope.xyz"));
        assert!(s.status.is_some());
        assert_eq!(s.core.animation().kind(), AnimationKind::Face);
    }
}

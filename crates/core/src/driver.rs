//! Frame driver: owns configuration, view state and animation, exposes the
//! setter surface used by the UI and produces one `Frame` per tick.

use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Result;
use glam::Mat4;

use crate::animation::{AnimationKind, AnimationMode, FacePoints};
use crate::geometry::{self, DrawOptions, Frame};
use crate::grid::{Axis, BoundingExtent, DrawMode, GridConfig, MAX_AXIS_CELLS};
use crate::point_cloud;
use crate::projection::{self, Projection, ZOOM_RANGE};
use crate::settings::{self, PersistedSettings, SettingValue, SettingsStore};

/// Frame rate ceiling
pub const TARGET_FPS: f64 = 30.0;

pub const DEFAULT_VIEWPORT: (u32, u32) = (400, 400);
pub const DEFAULT_ROTATION: [i32; 3] = [45, 45, 0];
pub const DEFAULT_TRANSPARENCY: f32 = 0.05;

/// Spacing control range, in tenths of a unit
pub const MIN_SPACING_TENTHS: i32 = 1;
pub const MAX_SPACING_TENTHS: i32 = 40;

/// Camera-side state the user manipulates
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    /// Degrees about X, Y and Z, each in `[0, 360)`
    pub rotation: [i32; 3],
    /// Raw control value in `[-100, 100]`
    pub raw_zoom: i32,
    /// Alpha of unlit cells, `[0, 1]`
    pub transparency: f32,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            rotation: DEFAULT_ROTATION,
            raw_zoom: 0,
            transparency: DEFAULT_TRANSPARENCY,
        }
    }
}

impl ViewState {
    pub fn zoom_factor(&self) -> f32 {
        projection::clamped_zoom_factor(self.raw_zoom)
    }
}

/// Notification for the UI layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeEvent {
    RotationChanged { axis: Axis, degrees: i32 },
    ZoomChanged { raw: i32 },
}

type Observer = Box<dyn FnMut(&ChangeEvent)>;

/// Fixed-period scheduler. Ticks that are missed while a frame is late are
/// dropped rather than queued. Frames are built inside `RenderCore::tick`,
/// which holds `&mut self`, so a second frame cannot start while one is in
/// progress.
#[derive(Debug, Clone)]
pub struct FrameClock {
    period: Duration,
    next_due: Option<Instant>,
}

impl FrameClock {
    pub fn new(fps: f64) -> Self {
        Self {
            period: Duration::from_secs_f64(1.0 / fps),
            next_due: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Claim the frame slot at `now`. Returns false if the next slot is not
    /// due yet.
    pub fn begin(&mut self, now: Instant) -> bool {
        if let Some(due) = self.next_due {
            if now < due {
                return false;
            }
        }
        self.next_due = Some(now + self.period);
        true
    }

    /// Time left until the next slot opens
    pub fn until_due(&self, now: Instant) -> Duration {
        self.next_due
            .map(|due| due.saturating_duration_since(now))
            .unwrap_or(Duration::ZERO)
    }
}

/// The rendering core. All configuration is mutated through its methods;
/// derived geometry is recomputed before any setter returns.
pub struct RenderCore {
    grid: GridConfig,
    extent: BoundingExtent,
    view: ViewState,
    animation: AnimationMode,
    draw_off_translucent: bool,
    projection: Projection,
    settings: Box<dyn SettingsStore>,
    observers: Vec<Observer>,
    clock: FrameClock,
    epoch: Instant,
}

impl RenderCore {
    /// Build a core from persisted settings
    pub fn new(settings: Box<dyn SettingsStore>) -> Self {
        let persisted = PersistedSettings::load(settings.as_ref());
        let grid = persisted.grid_config();
        let extent = BoundingExtent::calculate(&grid);
        let view = ViewState::default();
        let (width, height) = DEFAULT_VIEWPORT;
        let projection = Projection::new(width, height, extent.max, view.zoom_factor());

        tracing::info!(
            "Render core ready: {}x{}x{} {:?}, spacing {}",
            grid.x_cubes,
            grid.y_cubes,
            grid.z_cubes,
            grid.mode,
            grid.spacing
        );

        Self {
            grid,
            extent,
            view,
            animation: AnimationMode::None,
            draw_off_translucent: false,
            projection,
            settings,
            observers: Vec::new(),
            clock: FrameClock::new(TARGET_FPS),
            epoch: Instant::now(),
        }
    }

    /// Register a change listener
    pub fn subscribe(&mut self, observer: impl FnMut(&ChangeEvent) + 'static) {
        self.observers.push(Box::new(observer));
    }

    fn emit(&mut self, event: ChangeEvent) {
        for observer in &mut self.observers {
            observer(&event);
        }
    }

    // ── Accessors ─────────────────────────────────────────────

    pub fn grid(&self) -> &GridConfig {
        &self.grid
    }

    pub fn extent(&self) -> &BoundingExtent {
        &self.extent
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn animation(&self) -> &AnimationMode {
        &self.animation
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn draw_off_translucent(&self) -> bool {
        self.draw_off_translucent
    }

    pub fn settings(&self) -> &dyn SettingsStore {
        self.settings.as_ref()
    }

    pub fn frame_period(&self) -> Duration {
        self.clock.period()
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection.view_projection(self.view.rotation)
    }

    // ── Rotation / zoom ───────────────────────────────────────

    pub fn rotation(&self, axis: Axis) -> i32 {
        self.view.rotation[axis.index()]
    }

    /// Set the angle about `axis`. Notifies only if the wrapped angle changed.
    pub fn set_rotation(&mut self, axis: Axis, degrees: i32) -> bool {
        let degrees = projection::normalize_angle(degrees);
        let slot = &mut self.view.rotation[axis.index()];
        if *slot == degrees {
            return false;
        }
        *slot = degrees;
        self.emit(ChangeEvent::RotationChanged { axis, degrees });
        true
    }

    /// Drag by `(dx, dy)` pixels: vertical motion turns about X, horizontal about Y
    pub fn rotate_by_drag(&mut self, dx: i32, dy: i32) {
        self.set_rotation(Axis::X, self.rotation(Axis::X) + dy);
        self.set_rotation(Axis::Y, self.rotation(Axis::Y) + dx);
    }

    /// Set the raw zoom (-100..=100). Always recomputes the frustum and notifies.
    pub fn set_zoom(&mut self, raw: i32) {
        let raw = raw.clamp(-ZOOM_RANGE, ZOOM_RANGE);
        self.view.raw_zoom = raw;
        self.projection.set_zoom(self.view.zoom_factor());
        self.emit(ChangeEvent::ZoomChanged { raw });
    }

    /// Mouse wheel: half the wheel delta is added to the raw zoom
    pub fn zoom_by_wheel(&mut self, delta: i32) {
        self.set_zoom(self.view.raw_zoom.saturating_add(delta / 2));
    }

    // ── Grid configuration ────────────────────────────────────

    /// Spacing in tenths of a unit (1..=40)
    pub fn set_spacing(&mut self, tenths: i32) {
        let tenths = tenths.clamp(MIN_SPACING_TENTHS, MAX_SPACING_TENTHS);
        let spacing = tenths as f64 / 10.0;
        self.grid.spacing = spacing as f32;
        self.settings
            .set_value(settings::KEY_SPACING, SettingValue::Float(spacing));
        self.recompute_geometry();
    }

    /// Current spacing expressed in control tenths
    pub fn spacing_tenths(&self) -> i32 {
        (self.grid.spacing * 10.0).round() as i32
    }

    /// Combo-box index: 0 = cubes, 1 = points. Other values are ignored.
    pub fn set_mode(&mut self, index: i64) {
        match DrawMode::from_index(index) {
            Some(mode) => self.set_draw_mode(mode),
            None => tracing::warn!("Ignoring unknown draw mode index {index}"),
        }
    }

    pub fn set_draw_mode(&mut self, mode: DrawMode) {
        self.grid.mode = mode;
        self.settings
            .set_value(settings::KEY_DRAW_MODE, SettingValue::Int(mode.index()));
        self.recompute_geometry();
    }

    /// Cell count along `axis`, clamped to 0..=100
    pub fn set_axis_size(&mut self, axis: Axis, count: i32) {
        let count = count.clamp(0, MAX_AXIS_CELLS as i32) as u32;
        self.grid.set_count(axis, count);
        self.settings
            .set_value(axis.size_key(), SettingValue::Int(count as i64));
        self.recompute_geometry();
    }

    /// Same count on every axis, recomputed once
    pub fn set_uniform_size(&mut self, count: i32) {
        let count = count.clamp(0, MAX_AXIS_CELLS as i32) as u32;
        for axis in Axis::all() {
            self.grid.set_count(axis, count);
            self.settings
                .set_value(axis.size_key(), SettingValue::Int(count as i64));
        }
        self.recompute_geometry();
    }

    /// Alpha of unlit cells as a percentage
    pub fn set_transparency(&mut self, percent: i32) {
        self.view.transparency = percent.clamp(0, 100) as f32 / 100.0;
    }

    pub fn transparency_percent(&self) -> i32 {
        (self.view.transparency * 100.0).round() as i32
    }

    pub fn set_draw_off_translucent(&mut self, draw: bool) {
        self.draw_off_translucent = draw;
    }

    /// Viewport size in pixels
    pub fn resize(&mut self, width: u32, height: u32) {
        self.projection.resize(width, height);
    }

    fn recompute_geometry(&mut self) {
        self.extent = BoundingExtent::calculate(&self.grid);
        self.projection.set_max_extent(self.extent.max);
        tracing::debug!(
            "Bounding extent {:.3} x {:.3} x {:.3} (max {:.3})",
            self.extent.x,
            self.extent.y,
            self.extent.z,
            self.extent.max
        );
    }

    // ── Animation ─────────────────────────────────────────────

    /// Switch animation. Leaving the face animation drops its points; selecting
    /// it here (no file chosen) starts with nothing lit.
    pub fn select_animation(&mut self, kind: AnimationKind) {
        self.animation = match kind {
            AnimationKind::None => AnimationMode::None,
            AnimationKind::Wave => AnimationMode::Wave,
            AnimationKind::Face => AnimationMode::Face(FacePoints::default()),
        };
        tracing::debug!("Animation set to {kind:?}");
    }

    /// Import point-cloud text and switch to the face animation.
    /// Returns the number of imported points.
    pub fn select_face_from_str(&mut self, content: &str) -> usize {
        let points = point_cloud::import_str(content, &self.grid);
        let count = points.len();
        self.animation = AnimationMode::Face(FacePoints::new(points));
        tracing::info!("Face animation loaded with {count} points");
        count
    }

    /// Import a point-cloud file and switch to the face animation. On a read
    /// failure the face animation is still selected, with nothing lit.
    pub fn load_face_file(&mut self, path: &Path) -> Result<usize> {
        match point_cloud::read_file(path) {
            Ok(content) => Ok(self.select_face_from_str(&content)),
            Err(e) => {
                self.select_animation(AnimationKind::Face);
                Err(e)
            }
        }
    }

    // ── Frames ────────────────────────────────────────────────

    /// Milliseconds since the core was created
    pub fn elapsed_ms(&self, now: Instant) -> i64 {
        now.saturating_duration_since(self.epoch).as_millis() as i64
    }

    /// Evaluate every cell at `t_ms`
    pub fn build_frame(&self, t_ms: i64) -> Frame {
        let options = DrawOptions {
            draw_off_translucent: self.draw_off_translucent,
            transparency: self.view.transparency,
        };
        geometry::build_frame(&self.grid, &self.extent, &self.animation, options, t_ms)
    }

    /// Produce a frame if one is due at `now`
    pub fn tick(&mut self, now: Instant) -> Option<Frame> {
        if !self.clock.begin(now) {
            return None;
        }
        Some(self.build_frame(self.elapsed_ms(now)))
    }

    /// Time until the next frame is due
    pub fn until_next_frame(&self, now: Instant) -> Duration {
        self.clock.until_due(now)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::settings::MemoryStore;

    fn core() -> RenderCore {
        RenderCore::new(Box::new(MemoryStore::new()))
    }

    fn recorder(core: &mut RenderCore) -> Rc<RefCell<Vec<ChangeEvent>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        core.subscribe(move |e| sink.borrow_mut().push(*e));
        events
    }

    #[test]
    fn test_initial_state() {
        let c = core();
        assert_eq!(c.view().rotation, [45, 45, 0]);
        assert_eq!(c.view().raw_zoom, 0);
        assert_eq!(c.transparency_percent(), 5);
        assert!(!c.draw_off_translucent());
        assert_eq!(c.animation().kind(), AnimationKind::None);
        assert_eq!(c.projection().viewport(), DEFAULT_VIEWPORT);
        assert_eq!(c.spacing_tenths(), 5);
    }

    #[test]
    fn test_rotation_notifies_only_on_change() {
        let mut c = core();
        let events = recorder(&mut c);

        assert!(!c.set_rotation(Axis::X, 45));
        assert!(!c.set_rotation(Axis::X, 405));
        assert!(c.set_rotation(Axis::Z, -30));
        assert_eq!(c.rotation(Axis::Z), 330);

        assert_eq!(
            *events.borrow(),
            vec![ChangeEvent::RotationChanged {
                axis: Axis::Z,
                degrees: 330
            }]
        );
    }

    #[test]
    fn test_drag_rotates_x_and_y() {
        let mut c = core();
        c.rotate_by_drag(10, -50);
        assert_eq!(c.rotation(Axis::X), 355);
        assert_eq!(c.rotation(Axis::Y), 55);
        assert_eq!(c.rotation(Axis::Z), 0);
    }

    #[test]
    fn test_zoom_always_notifies() {
        let mut c = core();
        let events = recorder(&mut c);
        c.set_zoom(0);
        c.set_zoom(0);
        c.set_zoom(250);
        assert_eq!(
            *events.borrow(),
            vec![
                ChangeEvent::ZoomChanged { raw: 0 },
                ChangeEvent::ZoomChanged { raw: 0 },
                ChangeEvent::ZoomChanged { raw: 100 },
            ]
        );
        assert_eq!(c.projection().zoom(), projection::MIN_ZOOM_FACTOR);
    }

    #[test]
    fn test_wheel_zoom_halves_delta_and_clamps() {
        let mut c = core();
        c.zoom_by_wheel(120);
        assert_eq!(c.view().raw_zoom, 60);
        c.zoom_by_wheel(120);
        assert_eq!(c.view().raw_zoom, 100);
        c.zoom_by_wheel(-1000);
        assert_eq!(c.view().raw_zoom, -100);
        assert_eq!(c.view().zoom_factor(), 2.0);
    }

    #[test]
    fn test_transparency_percent() {
        let mut c = core();
        c.set_transparency(40);
        assert!((c.view().transparency - 0.4).abs() < 1e-6);
        c.set_transparency(140);
        assert_eq!(c.view().transparency, 1.0);
    }

    #[test]
    fn test_frame_clock_skips_missed_ticks() {
        let mut clock = FrameClock::new(30.0);
        let t0 = Instant::now();
        assert!(clock.begin(t0));
        assert!(!clock.begin(t0 + Duration::from_millis(10)));
        // a long stall yields one frame, not a backlog
        assert!(clock.begin(t0 + Duration::from_millis(500)));
        assert!(!clock.begin(t0 + Duration::from_millis(501)));
        assert!(!clock.begin(t0 + Duration::from_millis(520)));
        assert!(clock.until_due(t0 + Duration::from_millis(501)) > Duration::ZERO);
    }

    #[test]
    fn test_tick_respects_period() {
        let mut c = core();
        let now = Instant::now();
        assert!(c.tick(now).is_some());
        assert!(c.tick(now).is_none());
        assert!(c.tick(now + c.frame_period()).is_some());
    }
}

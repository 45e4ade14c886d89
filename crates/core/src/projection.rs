//! Projection manager: camera distance and view frustum sized from the grid's
//! bounding extent so the grid stays in frame at any rotation

use glam::{Mat4, Vec3, Vec4};

/// Half-range of the raw zoom control
pub const ZOOM_RANGE: i32 = 100;

/// Smallest zoom factor handed to the frustum; factor 0 has zero area
pub const MIN_ZOOM_FACTOR: f32 = 0.01;

/// Lower bound for the extent the frustum is sized from. A single point has
/// zero extent, which would collapse near and far onto the camera.
pub const MIN_FRUSTUM_EXTENT: f32 = 1.0;

/// Camera distance, near and far planes in units of the bounding diagonal
pub const CAMERA_DISTANCE: f32 = 4.0;
pub const NEAR_PLANE: f32 = 3.0;
pub const FAR_PLANE: f32 = 6.0;

/// Wrap an angle in degrees into `[0, 360)`
pub fn normalize_angle(degrees: i32) -> i32 {
    degrees.rem_euclid(360)
}

/// Map the raw control value (-100..=100) to a scale factor (2..=0).
/// Not clamped; see `clamped_zoom_factor`.
pub fn zoom_factor(raw: i32) -> f32 {
    1.0 - raw as f32 / ZOOM_RANGE as f32
}

pub fn clamped_zoom_factor(raw: i32) -> f32 {
    zoom_factor(raw).max(MIN_ZOOM_FACTOR)
}

/// Symmetric perspective frustum, in eye space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frustum {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
    pub near: f32,
    pub far: f32,
}

impl Frustum {
    /// Frustum for a grid whose bounding diagonal is `diagonal`
    pub fn for_diagonal(diagonal: f32, aspect: f32, zoom: f32) -> Self {
        let half_h = diagonal / 2.0 * zoom;
        let half_w = half_h * aspect;
        Self {
            left: -half_w,
            right: half_w,
            bottom: -half_h,
            top: half_h,
            near: NEAR_PLANE * diagonal,
            far: FAR_PLANE * diagonal,
        }
    }

    /// OpenGL-style perspective matrix (clip z in -1..1)
    pub fn matrix(&self) -> Mat4 {
        let (l, r, b, t, n, f) = (self.left, self.right, self.bottom, self.top, self.near, self.far);
        Mat4::from_cols(
            Vec4::new(2.0 * n / (r - l), 0.0, 0.0, 0.0),
            Vec4::new(0.0, 2.0 * n / (t - b), 0.0, 0.0),
            Vec4::new((r + l) / (r - l), (t + b) / (t - b), -(f + n) / (f - n), -1.0),
            Vec4::new(0.0, 0.0, -2.0 * f * n / (f - n), 0.0),
        )
    }
}

/// Viewport-dependent camera setup. Call the setters whenever the viewport,
/// the bounding extent or the zoom changes; the frustum is recomputed eagerly.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    width: u32,
    height: u32,
    max_extent: f32,
    zoom: f32,
    frustum: Frustum,
}

impl Projection {
    pub fn new(width: u32, height: u32, max_extent: f32, zoom: f32) -> Self {
        let mut projection = Self {
            width,
            height,
            max_extent,
            zoom,
            frustum: Frustum::for_diagonal(1.0, 1.0, 1.0),
        };
        projection.recompute();
        projection
    }

    /// Width over height; a zero height counts as one pixel
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    pub fn viewport(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Returns true if the size changed
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if (width, height) == (self.width, self.height) {
            return false;
        }
        self.width = width;
        self.height = height;
        self.recompute();
        true
    }

    pub fn set_max_extent(&mut self, max_extent: f32) {
        self.max_extent = max_extent;
        self.recompute();
    }

    /// Takes an already clamped zoom factor
    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = zoom.max(MIN_ZOOM_FACTOR);
        self.recompute();
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Diagonal of the bounding cube; every frustum dimension derives from it
    pub fn diagonal(&self) -> f32 {
        self.max_extent.max(MIN_FRUSTUM_EXTENT) * 3.0_f32.sqrt()
    }

    pub fn camera_distance(&self) -> f32 {
        CAMERA_DISTANCE * self.diagonal()
    }

    pub fn frustum(&self) -> &Frustum {
        &self.frustum
    }

    fn recompute(&mut self) {
        self.frustum = Frustum::for_diagonal(self.diagonal(), self.aspect(), self.zoom);
        tracing::debug!(
            "Frustum recomputed: extent={:.3} aspect={:.3} zoom={:.3}",
            self.max_extent,
            self.aspect(),
            self.zoom
        );
    }

    /// World -> eye: push the grid back by the camera distance, then rotate
    /// about X, Y and Z (degrees)
    pub fn view_matrix(&self, rotation: [i32; 3]) -> Mat4 {
        Mat4::from_translation(Vec3::new(0.0, 0.0, -self.camera_distance()))
            * Mat4::from_rotation_x((rotation[0] as f32).to_radians())
            * Mat4::from_rotation_y((rotation[1] as f32).to_radians())
            * Mat4::from_rotation_z((rotation[2] as f32).to_radians())
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.frustum.matrix()
    }

    pub fn view_projection(&self, rotation: [i32; 3]) -> Mat4 {
        self.projection_matrix() * self.view_matrix(rotation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inside_clip(vp: &Mat4, p: Vec3) -> bool {
        let c = *vp * p.extend(1.0);
        c.w > 0.0 && c.x.abs() <= c.w && c.y.abs() <= c.w && c.z.abs() <= c.w
    }

    #[test]
    fn test_normalize_angle() {
        assert_eq!(normalize_angle(-30), 330);
        assert_eq!(normalize_angle(360), 0);
        assert_eq!(normalize_angle(725), 5);
        assert_eq!(normalize_angle(0), 0);
        assert_eq!(normalize_angle(359), 359);
        assert_eq!(normalize_angle(-720), 0);
    }

    #[test]
    fn test_zoom_factor_mapping() {
        assert_eq!(zoom_factor(0), 1.0);
        assert_eq!(zoom_factor(100), 0.0);
        assert_eq!(zoom_factor(-100), 2.0);
        assert_eq!(clamped_zoom_factor(100), MIN_ZOOM_FACTOR);
        assert_eq!(clamped_zoom_factor(-100), 2.0);
    }

    #[test]
    fn test_frustum_planes_scale_with_diagonal() {
        let p = Projection::new(400, 400, 10.0, 1.0);
        let a = 10.0 * 3.0_f32.sqrt();
        let f = p.frustum();
        assert!((p.diagonal() - a).abs() < 1e-4);
        assert!((f.near - 3.0 * a).abs() < 1e-4);
        assert!((f.far - 6.0 * a).abs() < 1e-4);
        assert!((f.top - a / 2.0).abs() < 1e-4);
        assert!((p.camera_distance() - 4.0 * a).abs() < 1e-4);
        // grid center sits strictly between near and far
        assert!(f.near < p.camera_distance() && p.camera_distance() < f.far);
    }

    #[test]
    fn test_frustum_uses_aspect_and_zoom() {
        let p = Projection::new(800, 400, 2.0, 0.5);
        let f = p.frustum();
        assert!((f.right - 2.0 * f.top).abs() < 1e-5);
        assert!((f.top - p.diagonal() / 2.0 * 0.5).abs() < 1e-5);
        assert_eq!(f.left, -f.right);
        assert_eq!(f.bottom, -f.top);
    }

    #[test]
    fn test_zero_height_viewport() {
        let p = Projection::new(300, 0, 5.0, 1.0);
        assert_eq!(p.aspect(), 300.0);
        assert!(p.frustum().right.is_finite());
    }

    #[test]
    fn test_zero_zoom_is_guarded() {
        let mut p = Projection::new(400, 400, 5.0, 1.0);
        p.set_zoom(zoom_factor(100));
        assert_eq!(p.zoom(), MIN_ZOOM_FACTOR);
        let f = p.frustum();
        assert!(f.right > f.left);
        assert!(p.projection_matrix().is_finite());
    }

    #[test]
    fn test_zero_extent_is_guarded() {
        let p = Projection::new(400, 400, 0.0, 1.0);
        let f = p.frustum();
        assert!(f.near > 0.0 && f.far > f.near);
        assert!(inside_clip(&p.view_projection([0, 0, 0]), Vec3::ZERO));
    }

    #[test]
    fn test_resize_reports_change() {
        let mut p = Projection::new(400, 400, 5.0, 1.0);
        assert!(!p.resize(400, 400));
        assert!(p.resize(800, 400));
        assert_eq!(p.viewport(), (800, 400));
        assert!((p.frustum().right / p.frustum().top - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_bounding_cube_never_clipped() {
        let extent = 12.0;
        let p = Projection::new(640, 480, extent, 1.0);
        let h = extent / 2.0;
        let mut corners = Vec::new();
        for x in [-h, h] {
            for y in [-h, h] {
                for z in [-h, h] {
                    corners.push(Vec3::new(x, y, z));
                }
            }
        }
        for rotation in [[0, 0, 0], [45, 45, 0], [30, 60, 90], [359, 180, 270], [10, 200, 33]] {
            let vp = p.view_projection(rotation);
            for c in &corners {
                assert!(inside_clip(&vp, *c), "corner {c:?} clipped at {rotation:?}");
            }
        }
    }
}

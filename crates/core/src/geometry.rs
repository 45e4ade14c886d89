//! Geometry engine: places every grid cell and decides what gets drawn

use glam::{IVec3, Vec3};

use crate::animation::AnimationMode;
use crate::grid::{BoundingExtent, DrawMode, GridConfig};

/// Opaque white, used for lit cells
pub const LIT_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

/// Point diameter in pixels per unit of spacing
pub const POINT_SIZE_PER_SPACING: f32 = 10.0;

/// Primitive drawn for every emitted cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    Point,
    Cube,
}

impl From<DrawMode> for PrimitiveKind {
    fn from(mode: DrawMode) -> Self {
        match mode {
            DrawMode::Points => PrimitiveKind::Point,
            DrawMode::Cubes => PrimitiveKind::Cube,
        }
    }
}

/// One emitted cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellPrimitive {
    /// Grid index `(i, j, k)`
    pub cell: IVec3,
    /// Local-to-world translation of the cell
    pub origin: Vec3,
    pub color: [f32; 4],
    pub lit: bool,
}

/// Everything needed to draw one frame, in world space
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub kind: PrimitiveKind,
    /// Cube edge length
    pub cell_size: f32,
    /// Point diameter in pixels
    pub point_size: f32,
    pub primitives: Vec<CellPrimitive>,
}

impl Frame {
    pub fn lit_count(&self) -> usize {
        self.primitives.iter().filter(|p| p.lit).count()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }
}

/// Per-frame draw options that do not affect placement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawOptions {
    /// Draw unlit cells instead of culling them
    pub draw_off_translucent: bool,
    /// Alpha of unlit cells when they are drawn
    pub transparency: f32,
}

/// Translation of cell `(i, j, k)`, centering the whole grid on the origin
pub fn cell_origin(grid: &GridConfig, extent: &BoundingExtent, i: u32, j: u32, k: u32) -> Vec3 {
    let delta = grid.delta();
    Vec3::new(
        i as f32 * delta - extent.x / 2.0,
        j as f32 * delta - extent.y / 2.0,
        k as f32 * delta - extent.z / 2.0,
    )
}

/// Evaluate the animation for every cell and emit the primitives to draw.
/// Unlit cells are culled unless `draw_off_translucent` is set; the alpha value
/// never decides culling.
pub fn build_frame(
    grid: &GridConfig,
    extent: &BoundingExtent,
    animation: &AnimationMode,
    options: DrawOptions,
    t_ms: i64,
) -> Frame {
    let mut primitives = Vec::new();
    let off_color = [1.0, 1.0, 1.0, options.transparency];

    for i in 0..grid.x_cubes {
        for j in 0..grid.y_cubes {
            for k in 0..grid.z_cubes {
                let lit = animation.is_lit(grid, i as i32, j as i32, k as i32, t_ms);
                if !lit && !options.draw_off_translucent {
                    continue;
                }
                primitives.push(CellPrimitive {
                    cell: IVec3::new(i as i32, j as i32, k as i32),
                    origin: cell_origin(grid, extent, i, j, k),
                    color: if lit { LIT_COLOR } else { off_color },
                    lit,
                });
            }
        }
    }

    Frame {
        kind: grid.mode.into(),
        cell_size: grid.cell_size,
        point_size: grid.spacing * POINT_SIZE_PER_SPACING,
        primitives,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::FacePoints;

    fn grid(n: u32, mode: DrawMode) -> GridConfig {
        GridConfig {
            x_cubes: n,
            y_cubes: n,
            z_cubes: n,
            spacing: 0.5,
            mode,
            ..GridConfig::default()
        }
    }

    fn opts(draw_off: bool, transparency: f32) -> DrawOptions {
        DrawOptions {
            draw_off_translucent: draw_off,
            transparency,
        }
    }

    #[test]
    fn test_points_grid_is_centered() {
        let g = grid(3, DrawMode::Points);
        let e = BoundingExtent::calculate(&g);
        assert_eq!(cell_origin(&g, &e, 0, 0, 0), Vec3::splat(-0.5));
        assert_eq!(cell_origin(&g, &e, 1, 1, 1), Vec3::ZERO);
        assert_eq!(cell_origin(&g, &e, 2, 2, 2), Vec3::splat(0.5));
    }

    #[test]
    fn test_cubes_span_is_centered() {
        // first cube starts at -extent/2, last cube ends at +extent/2
        let g = grid(4, DrawMode::Cubes);
        let e = BoundingExtent::calculate(&g);
        let first = cell_origin(&g, &e, 0, 0, 0);
        let last = cell_origin(&g, &e, 3, 3, 3) + Vec3::splat(g.cell_size);
        assert!((first + last).length() < 1e-5);
        assert!((last.x - e.x / 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_no_animation_emits_every_cell() {
        let g = grid(3, DrawMode::Cubes);
        let e = BoundingExtent::calculate(&g);
        let frame = build_frame(&g, &e, &AnimationMode::None, opts(false, 0.05), 0);
        assert_eq!(frame.primitives.len(), 27);
        assert_eq!(frame.lit_count(), 27);
        assert_eq!(frame.kind, PrimitiveKind::Cube);
        assert!(frame.primitives.iter().all(|p| p.color == LIT_COLOR));
    }

    #[test]
    fn test_unlit_cells_culled_without_translucency() {
        let g = grid(3, DrawMode::Points);
        let e = BoundingExtent::calculate(&g);
        let face = AnimationMode::Face(FacePoints::new(vec![IVec3::new(1, 1, 1)]));
        let frame = build_frame(&g, &e, &face, opts(false, 0.5), 0);
        assert_eq!(frame.primitives.len(), 1);
        assert_eq!(frame.primitives[0].cell, IVec3::new(1, 1, 1));
        assert!(frame.primitives[0].lit);
    }

    #[test]
    fn test_zero_alpha_still_emits_unlit_cells() {
        let g = grid(3, DrawMode::Points);
        let e = BoundingExtent::calculate(&g);
        let face = AnimationMode::Face(FacePoints::default());
        let frame = build_frame(&g, &e, &face, opts(true, 0.0), 0);
        assert_eq!(frame.primitives.len(), 27);
        assert_eq!(frame.lit_count(), 0);
        assert!(frame.primitives.iter().all(|p| p.color == [1.0, 1.0, 1.0, 0.0]));
    }

    #[test]
    fn test_point_size_follows_spacing() {
        let mut g = grid(2, DrawMode::Points);
        g.spacing = 1.5;
        let e = BoundingExtent::calculate(&g);
        let frame = build_frame(&g, &e, &AnimationMode::None, opts(false, 0.0), 0);
        assert_eq!(frame.point_size, 15.0);
        assert_eq!(frame.kind, PrimitiveKind::Point);
    }

    #[test]
    fn test_empty_axis_emits_nothing() {
        let mut g = grid(5, DrawMode::Cubes);
        g.y_cubes = 0;
        let e = BoundingExtent::calculate(&g);
        let frame = build_frame(&g, &e, &AnimationMode::None, opts(true, 1.0), 0);
        assert!(frame.is_empty());
    }
}

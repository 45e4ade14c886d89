//! Animation state machine: decides which cells are lit for a given frame time

use std::collections::HashSet;

use glam::IVec3;

use crate::grid::GridConfig;

/// Animation selectable from the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnimationKind {
    #[default]
    None,
    Wave,
    Face,
}

impl AnimationKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            AnimationKind::None => "No Animation",
            AnimationKind::Wave => "Wave Animation",
            AnimationKind::Face => "Draw Face",
        }
    }

    pub fn all() -> &'static [AnimationKind] {
        &[AnimationKind::None, AnimationKind::Wave, AnimationKind::Face]
    }
}

/// Lit-cell set for the face animation. Built once per import and only ever
/// replaced as a whole.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FacePoints {
    points: Vec<IVec3>,
    lookup: HashSet<(i32, i32, i32)>,
}

impl FacePoints {
    pub fn new(points: Vec<IVec3>) -> Self {
        let lookup = points.iter().map(|p| (p.x, p.y, p.z)).collect();
        Self { points, lookup }
    }

    pub fn points(&self) -> &[IVec3] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn contains(&self, x: i32, y: i32, z: i32) -> bool {
        self.lookup.contains(&(x, y, z))
    }
}

/// Active animation with the state it owns
#[derive(Debug, Clone, Default, PartialEq)]
pub enum AnimationMode {
    /// Every cell lit
    #[default]
    None,
    /// Traveling sine ridge, a pure function of cell and time
    Wave,
    /// Cells listed in an imported point cloud
    Face(FacePoints),
}

impl AnimationMode {
    pub fn kind(&self) -> AnimationKind {
        match self {
            AnimationMode::None => AnimationKind::None,
            AnimationMode::Wave => AnimationKind::Wave,
            AnimationMode::Face(_) => AnimationKind::Face,
        }
    }

    /// Imported face points, if the face animation is active
    pub fn face_points(&self) -> Option<&FacePoints> {
        match self {
            AnimationMode::Face(points) => Some(points),
            _ => None,
        }
    }

    /// Whether cell `(x, y, z)` is lit at `t_ms` milliseconds
    pub fn is_lit(&self, grid: &GridConfig, x: i32, y: i32, z: i32, t_ms: i64) -> bool {
        match self {
            AnimationMode::None => true,
            AnimationMode::Wave => wave_is_lit(grid, x, y, z, t_ms),
            AnimationMode::Face(points) => points.contains(x, y, z),
        }
    }
}

/// Row of the wave ridge at column `(x, z)`.
/// All divisions are integer divisions of the cell index and the millisecond clock.
pub fn wave_height(grid: &GridConfig, x: i32, z: i32, t_ms: i64) -> i64 {
    let phase = (z / 2) as i64 + t_ms / 100;
    let ridge = ((phase as f64).sin() * 2.0).round() as i64;
    let offset = (((x / 2) as f64).sin() * 2.0).round() as i64;
    ridge + offset + (grid.y_cubes / 2) as i64
}

fn wave_is_lit(grid: &GridConfig, x: i32, y: i32, z: i32, t_ms: i64) -> bool {
    if grid.is_single_cell() {
        return true;
    }
    y as i64 == wave_height(grid, x, z, t_ms)
}

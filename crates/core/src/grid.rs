//! Grid configuration and the bounding extent derived from it

/// Edge length of a drawn cube. Fixed; the grid pitch grows with it in cube mode.
pub const CELL_SIZE: f32 = 1.0;

/// Largest per-axis cell count the configuration accepts
pub const MAX_AXIS_CELLS: u32 = 100;

/// How a single LED is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawMode {
    Cubes,
    #[default]
    Points,
}

impl DrawMode {
    /// Map the persisted/combo-box index (0 = cubes, 1 = points)
    pub fn from_index(index: i64) -> Option<Self> {
        match index {
            0 => Some(DrawMode::Cubes),
            1 => Some(DrawMode::Points),
            _ => None,
        }
    }

    pub fn index(&self) -> i64 {
        match self {
            DrawMode::Cubes => 0,
            DrawMode::Points => 1,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            DrawMode::Cubes => "Cubes",
            DrawMode::Points => "Points",
        }
    }

    pub fn all() -> &'static [DrawMode] {
        &[DrawMode::Cubes, DrawMode::Points]
    }
}

/// One of the three grid/rotation axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn all() -> [Axis; 3] {
        [Axis::X, Axis::Y, Axis::Z]
    }

    pub fn index(&self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// Settings key holding the cell count along this axis
    pub fn size_key(&self) -> &'static str {
        match self {
            Axis::X => crate::settings::KEY_X_SIZE,
            Axis::Y => crate::settings::KEY_Y_SIZE,
            Axis::Z => crate::settings::KEY_Z_SIZE,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Axis::X => "X",
            Axis::Y => "Y",
            Axis::Z => "Z",
        }
    }
}

/// User-controlled grid layout
#[derive(Debug, Clone, PartialEq)]
pub struct GridConfig {
    pub x_cubes: u32,
    pub y_cubes: u32,
    pub z_cubes: u32,
    /// Gap between adjacent cells
    pub spacing: f32,
    /// Cube edge length (cube mode only)
    pub cell_size: f32,
    pub mode: DrawMode,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            x_cubes: 20,
            y_cubes: 20,
            z_cubes: 20,
            spacing: 0.5,
            cell_size: CELL_SIZE,
            mode: DrawMode::Points,
        }
    }
}

impl GridConfig {
    /// Center-to-center pitch between neighbouring cells.
    /// Points have no area, so only cube mode adds the cell size.
    pub fn delta(&self) -> f32 {
        match self.mode {
            DrawMode::Points => self.spacing,
            DrawMode::Cubes => self.spacing + self.cell_size,
        }
    }

    pub fn count(&self, axis: Axis) -> u32 {
        match axis {
            Axis::X => self.x_cubes,
            Axis::Y => self.y_cubes,
            Axis::Z => self.z_cubes,
        }
    }

    pub fn set_count(&mut self, axis: Axis, count: u32) {
        let count = count.min(MAX_AXIS_CELLS);
        match axis {
            Axis::X => self.x_cubes = count,
            Axis::Y => self.y_cubes = count,
            Axis::Z => self.z_cubes = count,
        }
    }

    /// Total number of addressable cells
    pub fn cell_count(&self) -> usize {
        self.x_cubes as usize * self.y_cubes as usize * self.z_cubes as usize
    }

    /// Span of `n` cells along one axis: the last cell needs no trailing gap.
    /// An empty axis spans nothing.
    pub fn axis_extent(&self, n: u32) -> f32 {
        if n == 0 {
            return 0.0;
        }
        (n as f32 * self.delta() - self.spacing).max(0.0)
    }

    pub fn is_single_cell(&self) -> bool {
        self.x_cubes == 1 && self.y_cubes == 1 && self.z_cubes == 1
    }
}

/// Size of the grid along each axis, derived from `GridConfig`.
/// Only valid for the configuration it was computed from; `RenderCore`
/// recomputes it on every mutation that changes pitch or counts.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundingExtent {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub max: f32,
}

impl BoundingExtent {
    pub fn calculate(grid: &GridConfig) -> Self {
        let x = grid.axis_extent(grid.x_cubes);
        let y = grid.axis_extent(grid.y_cubes);
        let z = grid.axis_extent(grid.z_cubes);
        Self {
            x,
            y,
            z,
            max: x.max(y).max(z),
        }
    }

    pub fn along(&self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }
}

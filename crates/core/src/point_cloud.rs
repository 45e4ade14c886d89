//! Point-cloud import for the face animation.
//!
//! Input is plain text with one sample per line: three numbers in `x y z`
//! order, any separators, anything after the third number ignored. A component
//! that cannot be read becomes `0.0`.
//! Samples are then remapped onto the grid's `1..=n` integer coordinates.

use std::path::Path;
use std::sync::OnceLock;

use anyhow::{Context, Result};
use glam::{IVec3, Vec3};
use regex::Regex;

use crate::grid::GridConfig;

static NUMBER_RE: OnceLock<Regex> = OnceLock::new();

fn number_regex() -> &'static Regex {
    NUMBER_RE.get_or_init(|| {
        Regex::new(r"[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?").expect("static number pattern")
    })
}

/// Read up to three numbers from one line; missing ones are `0.0`
pub fn parse_line(line: &str) -> Vec3 {
    let mut values = [0.0_f32; 3];
    for (slot, m) in values.iter_mut().zip(number_regex().find_iter(line)) {
        *slot = m.as_str().parse().unwrap_or(0.0);
    }
    Vec3::from_array(values)
}

/// Parse every line into a sample point. A blank line is an origin sample.
pub fn parse_points(content: &str) -> Vec<Vec3> {
    content.lines().map(parse_line).collect()
}

/// Per-axis range of a sample set. Seeded with `0.0` on both ends, so the
/// origin is always inside the range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleBounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl SampleBounds {
    pub fn of(points: &[Vec3]) -> Self {
        points.iter().fold(
            Self {
                min: Vec3::ZERO,
                max: Vec3::ZERO,
            },
            |acc, p| Self {
                min: acc.min.min(*p),
                max: acc.max.max(*p),
            },
        )
    }
}

/// Linearly map `value` from `[min, max]` onto `[1, cells]` and floor it.
/// A flat range maps everything to the middle cell.
fn remap_axis(value: f32, min: f32, max: f32, cells: u32) -> i32 {
    let lo = 1.0_f32;
    let hi = cells as f32;
    let span = max - min;
    if span.abs() <= f32::EPSILON {
        return (lo + (hi - lo) / 2.0).floor() as i32;
    }
    (lo + ((value - min) * (hi - lo)) / span).floor() as i32
}

/// Remap raw samples onto the grid's integer coordinates
pub fn normalize(points: &[Vec3], grid: &GridConfig) -> Vec<IVec3> {
    let bounds = SampleBounds::of(points);
    points
        .iter()
        .map(|p| {
            IVec3::new(
                remap_axis(p.x, bounds.min.x, bounds.max.x, grid.x_cubes),
                remap_axis(p.y, bounds.min.y, bounds.max.y, grid.y_cubes),
                remap_axis(p.z, bounds.min.z, bounds.max.z, grid.z_cubes),
            )
        })
        .collect()
}

/// Parse and normalize point-cloud text in one go
pub fn import_str(content: &str, grid: &GridConfig) -> Vec<IVec3> {
    let samples = parse_points(content);
    let points = normalize(&samples, grid);
    tracing::debug!("Parsed {} point-cloud samples", samples.len());
    points
}

/// Read a point-cloud file from disk
pub fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read point cloud {}", path.display()))
}

use glam::Vec3;

use crate::geometry::{CellPrimitive, Frame, PrimitiveKind};

/// Floats per vertex: position(3) + color(4)
pub const FLOATS_PER_VERTEX: usize = 7;

/// CPU-side buffers: interleaved [pos.x, pos.y, pos.z, r, g, b, a]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshBuffers {
    pub vertices: Vec<f32>,
    /// Triangle list for cubes; empty for points
    pub indices: Vec<u32>,
}

impl MeshBuffers {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / FLOATS_PER_VERTEX
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

/// Frame converted into GPU-ready buffers, split so lit cells can be drawn
/// before the translucent unlit ones
#[derive(Debug, Clone, PartialEq)]
pub struct FrameMesh {
    pub kind: PrimitiveKind,
    pub point_size: f32,
    pub opaque: MeshBuffers,
    pub translucent: MeshBuffers,
}

impl FrameMesh {
    pub fn from_frame(frame: &Frame) -> Self {
        let mut opaque = MeshBuffers::default();
        let mut translucent = MeshBuffers::default();

        for prim in &frame.primitives {
            let target = if prim.lit { &mut opaque } else { &mut translucent };
            match frame.kind {
                PrimitiveKind::Point => push_vert(&mut target.vertices, prim.origin, prim.color),
                PrimitiveKind::Cube => push_cube(target, prim, frame.cell_size),
            }
        }

        Self {
            kind: frame.kind,
            point_size: frame.point_size,
            opaque,
            translucent,
        }
    }
}

/// The six faces of an axis-aligned cube spanning `origin..origin + size`.
/// Each quad is counter-clockwise seen from outside.
pub fn cube_quads(origin: Vec3, size: f32) -> [([Vec3; 4], Vec3); 6] {
    let h = size * 0.5;
    let c = origin + Vec3::splat(h);
    let v = |x: f32, y: f32, z: f32| c + Vec3::new(x, y, z);

    [
        // Front (+Z)
        ([v(-h, -h, h), v(h, -h, h), v(h, h, h), v(-h, h, h)], Vec3::Z),
        // Back (-Z)
        ([v(h, -h, -h), v(-h, -h, -h), v(-h, h, -h), v(h, h, -h)], Vec3::NEG_Z),
        // Right (+X)
        ([v(h, -h, h), v(h, -h, -h), v(h, h, -h), v(h, h, h)], Vec3::X),
        // Left (-X)
        ([v(-h, -h, -h), v(-h, -h, h), v(-h, h, h), v(-h, h, -h)], Vec3::NEG_X),
        // Top (+Y)
        ([v(-h, h, h), v(h, h, h), v(h, h, -h), v(-h, h, -h)], Vec3::Y),
        // Bottom (-Y)
        ([v(-h, -h, -h), v(h, -h, -h), v(h, -h, h), v(-h, -h, h)], Vec3::NEG_Y),
    ]
}

// ── Helpers ──────────────────────────────────────────────────

fn push_cube(target: &mut MeshBuffers, prim: &CellPrimitive, size: f32) {
    for (quad, _normal) in cube_quads(prim.origin, size) {
        let base = target.vertex_count() as u32;
        for corner in quad {
            push_vert(&mut target.vertices, corner, prim.color);
        }
        target
            .indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
}

fn push_vert(v: &mut Vec<f32>, p: Vec3, c: [f32; 4]) {
    v.extend_from_slice(&[p.x, p.y, p.z, c[0], c[1], c[2], c[3]]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec3;

    fn prim(origin: Vec3, lit: bool) -> CellPrimitive {
        CellPrimitive {
            cell: IVec3::ZERO,
            origin,
            color: [1.0, 1.0, 1.0, if lit { 1.0 } else { 0.2 }],
            lit,
        }
    }

    fn frame(kind: PrimitiveKind, primitives: Vec<CellPrimitive>) -> Frame {
        Frame {
            kind,
            cell_size: 1.0,
            point_size: 5.0,
            primitives,
        }
    }

    #[test]
    fn test_cube_quads_wind_outward() {
        let origin = Vec3::new(2.0, -1.0, 0.5);
        let center = origin + Vec3::splat(0.5);
        for (quad, normal) in cube_quads(origin, 1.0) {
            let face_normal = (quad[1] - quad[0]).cross(quad[2] - quad[0]).normalize();
            assert!((face_normal - normal).length() < 1e-5);
            let face_center = (quad[0] + quad[1] + quad[2] + quad[3]) / 4.0;
            assert!((face_center - center).dot(normal) > 0.0);
        }
    }

    #[test]
    fn test_cube_quads_span_cell() {
        let origin = Vec3::new(-3.0, 0.0, 1.0);
        let corners: Vec<Vec3> = cube_quads(origin, 1.0)
            .iter()
            .flat_map(|(quad, _)| quad.iter().copied())
            .collect();
        let min = corners.iter().fold(Vec3::splat(f32::MAX), |a, c| a.min(*c));
        let max = corners.iter().fold(Vec3::splat(f32::MIN), |a, c| a.max(*c));
        assert_eq!(min, origin);
        assert_eq!(max, origin + Vec3::ONE);
    }

    #[test]
    fn test_cube_mesh_counts() {
        let f = frame(
            PrimitiveKind::Cube,
            vec![prim(Vec3::ZERO, true), prim(Vec3::X * 2.0, true), prim(Vec3::Y * 2.0, false)],
        );
        let mesh = FrameMesh::from_frame(&f);
        assert_eq!(mesh.opaque.vertex_count(), 2 * 24);
        assert_eq!(mesh.opaque.indices.len(), 2 * 36);
        assert_eq!(mesh.translucent.vertex_count(), 24);
        assert_eq!(*mesh.opaque.indices.iter().max().unwrap(), 47);
    }

    #[test]
    fn test_point_mesh_one_vertex_per_cell() {
        let f = frame(
            PrimitiveKind::Point,
            vec![prim(Vec3::new(1.0, 2.0, 3.0), true), prim(Vec3::ZERO, false)],
        );
        let mesh = FrameMesh::from_frame(&f);
        assert_eq!(mesh.opaque.vertices, vec![1.0, 2.0, 3.0, 1.0, 1.0, 1.0, 1.0]);
        assert!(mesh.opaque.indices.is_empty());
        assert_eq!(mesh.translucent.vertex_count(), 1);
        assert_eq!(mesh.translucent.vertices[6], 0.2);
        assert_eq!(mesh.point_size, 5.0);
    }
}

//! Built-in mesh library.
//!
//! A fixed set of procedurally constructed models, selectable by index
//! through the renderer. At scale 1 each model fits the 500x500
//! viewport with margin.

use nalgebra::Point3;
use std::collections::HashMap;
use std::f32::consts::TAU;

use crate::framebuffer::Rgba;
use crate::geometry::{Mesh, Vertex};

/// Number of built-in meshes.
pub const MESH_COUNT: usize = 3;

const CUBE_COLOR: Rgba = Rgba::new(230, 126, 72, 255);
const ICOSPHERE_COLOR: Rgba = Rgba::new(120, 178, 235, 255);
const TORUS_COLOR: Rgba = Rgba::new(148, 216, 132, 255);

/// The built-in library, in selection order: cube, icosphere, torus.
pub fn library() -> Vec<Mesh> {
    vec![
        cube(90.0),
        icosphere(115.0, 2),
        torus(85.0, 38.0, 28, 14),
    ]
}

/// Axis-aligned cube centered at the origin, faces wound outward.
pub fn cube(half_extent: f32) -> Mesh {
    let h = half_extent;
    let vertices = vec![
        Point3::new(-h, -h, -h),
        Point3::new(h, -h, -h),
        Point3::new(h, h, -h),
        Point3::new(-h, h, -h),
        Point3::new(-h, -h, h),
        Point3::new(h, -h, h),
        Point3::new(h, h, h),
        Point3::new(-h, h, h),
    ];
    let faces = vec![
        // Front (+z)
        [4, 5, 6],
        [4, 6, 7],
        // Back (-z)
        [1, 0, 3],
        [1, 3, 2],
        // Left (-x)
        [0, 4, 7],
        [0, 7, 3],
        // Right (+x)
        [5, 1, 2],
        [5, 2, 6],
        // Top (+y)
        [3, 7, 6],
        [3, 6, 2],
        // Bottom (-y)
        [4, 0, 1],
        [4, 1, 5],
    ];
    Mesh {
        vertices,
        faces,
        color: CUBE_COLOR,
    }
}

/// Icosphere: a subdivided icosahedron with every vertex pushed out to
/// `radius`.
pub fn icosphere(radius: f32, subdivisions: u32) -> Mesh {
    let phi = (1.0 + 5.0_f32.sqrt()) / 2.0;
    let mut vertices: Vec<Vertex> = vec![
        Point3::new(-1.0, phi, 0.0),
        Point3::new(1.0, phi, 0.0),
        Point3::new(-1.0, -phi, 0.0),
        Point3::new(1.0, -phi, 0.0),
        Point3::new(0.0, -1.0, phi),
        Point3::new(0.0, 1.0, phi),
        Point3::new(0.0, -1.0, -phi),
        Point3::new(0.0, 1.0, -phi),
        Point3::new(phi, 0.0, -1.0),
        Point3::new(phi, 0.0, 1.0),
        Point3::new(-phi, 0.0, -1.0),
        Point3::new(-phi, 0.0, 1.0),
    ];
    let mut faces: Vec<[usize; 3]> = vec![
        [0, 11, 5],
        [0, 5, 1],
        [0, 1, 7],
        [0, 7, 10],
        [0, 10, 11],
        [1, 5, 9],
        [5, 11, 4],
        [11, 10, 2],
        [10, 7, 6],
        [7, 1, 8],
        [3, 9, 4],
        [3, 4, 2],
        [3, 2, 6],
        [3, 6, 8],
        [3, 8, 9],
        [4, 9, 5],
        [2, 4, 11],
        [6, 2, 10],
        [8, 6, 7],
        [9, 8, 1],
    ];

    for _ in 0..subdivisions {
        let mut midpoints = HashMap::new();
        let mut next = Vec::with_capacity(faces.len() * 4);
        for &[a, b, c] in &faces {
            let ab = midpoint(&mut vertices, &mut midpoints, a, b);
            let bc = midpoint(&mut vertices, &mut midpoints, b, c);
            let ca = midpoint(&mut vertices, &mut midpoints, c, a);
            next.push([a, ab, ca]);
            next.push([b, bc, ab]);
            next.push([c, ca, bc]);
            next.push([ab, bc, ca]);
        }
        faces = next;
    }

    for vertex in &mut vertices {
        *vertex = Point3::from(vertex.coords.normalize() * radius);
    }

    Mesh {
        vertices,
        faces,
        color: ICOSPHERE_COLOR,
    }
}

/// Midpoint of an edge, cached so subdivided neighbors share vertices.
fn midpoint(
    vertices: &mut Vec<Vertex>,
    cache: &mut HashMap<(usize, usize), usize>,
    a: usize,
    b: usize,
) -> usize {
    let key = if a < b { (a, b) } else { (b, a) };
    if let Some(&index) = cache.get(&key) {
        return index;
    }
    let mid = Point3::from((vertices[a].coords + vertices[b].coords) * 0.5);
    vertices.push(mid);
    let index = vertices.len() - 1;
    cache.insert(key, index);
    index
}

/// Torus lying in the XZ plane, so it spins nicely around Y.
pub fn torus(ring_radius: f32, tube_radius: f32, segments: usize, sides: usize) -> Mesh {
    let mut vertices = Vec::with_capacity(segments * sides);
    for i in 0..segments {
        let u = i as f32 / segments as f32 * TAU;
        for j in 0..sides {
            let v = j as f32 / sides as f32 * TAU;
            let w = ring_radius + tube_radius * v.cos();
            vertices.push(Point3::new(
                w * u.cos(),
                tube_radius * v.sin(),
                w * u.sin(),
            ));
        }
    }

    let mut faces = Vec::with_capacity(segments * sides * 2);
    for i in 0..segments {
        let i_next = (i + 1) % segments;
        for j in 0..sides {
            let j_next = (j + 1) % sides;
            let a = i * sides + j;
            let b = i_next * sides + j;
            let c = i_next * sides + j_next;
            let d = i * sides + j_next;
            faces.push([a, c, b]);
            faces.push([a, d, c]);
        }
    }

    Mesh {
        vertices,
        faces,
        color: TORUS_COLOR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_size_matches_mesh_count() {
        assert_eq!(library().len(), MESH_COUNT);
    }

    #[test]
    fn test_every_builtin_is_valid_and_nonempty() {
        for mesh in library() {
            assert!(mesh.validate().is_ok());
            assert!(!mesh.faces.is_empty());
        }
    }

    #[test]
    fn test_cube_has_expected_topology() {
        let mesh = cube(50.0);
        assert_eq!(mesh.vertices.len(), 8);
        assert_eq!(mesh.faces.len(), 12);
        assert_eq!(mesh.edges().len(), 18);
    }

    #[test]
    fn test_icosphere_vertices_lie_on_the_sphere() {
        let mesh = icosphere(100.0, 1);
        for vertex in &mesh.vertices {
            assert!((vertex.coords.norm() - 100.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_icosphere_subdivision_multiplies_faces() {
        assert_eq!(icosphere(1.0, 0).faces.len(), 20);
        assert_eq!(icosphere(1.0, 1).faces.len(), 80);
        assert_eq!(icosphere(1.0, 2).faces.len(), 320);
    }

    #[test]
    fn test_torus_dimensions() {
        let mesh = torus(80.0, 30.0, 12, 8);
        assert_eq!(mesh.vertices.len(), 12 * 8);
        assert_eq!(mesh.faces.len(), 12 * 8 * 2);
        assert!(mesh.validate().is_ok());
    }
}

//! Indexed mesh geometry.

use nalgebra::{Point3, Vector3};
use std::collections::HashSet;
use thiserror::Error;

use crate::framebuffer::Rgba;

/// A vertex in model space.
pub type Vertex = Point3<f32>;

/// Errors produced when assembling a mesh from untrusted parts.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MeshError {
    #[error("face {face} references vertex {index}, but the mesh has {vertex_count} vertices")]
    IndexOutOfRange {
        face: usize,
        index: usize,
        vertex_count: usize,
    },
}

/// A triangulated 3D mesh: vertices, faces indexing into them, and a
/// flat base color.
///
/// Faces hold vertex indices; the invariant that every index is in
/// range is checked by [`Mesh::from_parts`] when a mesh is built from
/// external data. Meshes are read-only after construction.
#[derive(Debug, Clone)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub faces: Vec<[usize; 3]>,
    pub color: Rgba,
}

impl Mesh {
    /// Assemble a mesh, validating that every face index is in range.
    pub fn from_parts(
        vertices: Vec<Vertex>,
        faces: Vec<[usize; 3]>,
        color: Rgba,
    ) -> Result<Self, MeshError> {
        let mesh = Self {
            vertices,
            faces,
            color,
        };
        mesh.validate()?;
        Ok(mesh)
    }

    /// Check the face-index invariant.
    pub fn validate(&self) -> Result<(), MeshError> {
        for (face, indices) in self.faces.iter().enumerate() {
            for &index in indices {
                if index >= self.vertices.len() {
                    return Err(MeshError::IndexOutOfRange {
                        face,
                        index,
                        vertex_count: self.vertices.len(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Translate the mesh to the origin and uniformly rescale it so
    /// the farthest vertex sits `radius` from the center. Meshes from
    /// arbitrary files arrive in arbitrary coordinates; the built-ins
    /// are already sized for the viewport and never need this.
    /// Empty and degenerate (single-point) meshes are left untouched.
    pub fn center_and_fit(&mut self, radius: f32) {
        let Some(first) = self.vertices.first() else {
            return;
        };
        let mut min = first.coords;
        let mut max = first.coords;
        for vertex in &self.vertices {
            min = min.inf(&vertex.coords);
            max = max.sup(&vertex.coords);
        }
        let center = (min + max) * 0.5;

        let extent = self
            .vertices
            .iter()
            .map(|vertex| (vertex.coords - center).norm())
            .fold(0.0, f32::max);
        if extent <= 0.0 || !extent.is_finite() {
            return;
        }

        let factor = radius / extent;
        for vertex in &mut self.vertices {
            *vertex = Point3::from((vertex.coords - center) * factor);
        }
    }

    /// The deduplicated set of undirected edges appearing in faces.
    /// Used by wireframe rendering so shared edges are drawn once.
    pub fn edges(&self) -> Vec<[usize; 2]> {
        let mut seen = HashSet::new();
        let mut edges = Vec::new();
        for face in &self.faces {
            for (a, b) in [
                (face[0], face[1]),
                (face[1], face[2]),
                (face[2], face[0]),
            ] {
                let edge = if a < b { [a, b] } else { [b, a] };
                if seen.insert(edge) {
                    edges.push(edge);
                }
            }
        }
        edges
    }
}

/// Unit normal of a triangle, or `None` for a degenerate one.
pub fn face_normal(
    v0: &Point3<f32>,
    v1: &Point3<f32>,
    v2: &Point3<f32>,
) -> Option<Vector3<f32>> {
    (v1 - v0).cross(&(v2 - v0)).try_normalize(1e-12)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Mesh {
        Mesh::from_parts(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2]],
            Rgba::WHITE,
        )
        .unwrap()
    }

    #[test]
    fn test_from_parts_rejects_bad_index() {
        let result = Mesh::from_parts(
            vec![Point3::new(0.0, 0.0, 0.0)],
            vec![[0, 0, 3]],
            Rgba::WHITE,
        );
        assert_eq!(
            result.unwrap_err(),
            MeshError::IndexOutOfRange {
                face: 0,
                index: 3,
                vertex_count: 1,
            }
        );
    }

    #[test]
    fn test_single_triangle_has_three_edges() {
        assert_eq!(triangle().edges().len(), 3);
    }

    #[test]
    fn test_shared_edges_are_deduplicated() {
        let mesh = Mesh::from_parts(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
                Point3::new(1.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2], [1, 3, 2]],
            Rgba::WHITE,
        )
        .unwrap();
        // Two triangles sharing the 1-2 diagonal: 5 unique edges.
        assert_eq!(mesh.edges().len(), 5);
    }

    #[test]
    fn test_face_normal_of_ccw_triangle_points_up_z() {
        let mesh = triangle();
        let [a, b, c] = mesh.faces[0];
        let normal =
            face_normal(&mesh.vertices[a], &mesh.vertices[b], &mesh.vertices[c]).unwrap();
        assert!((normal - Vector3::new(0.0, 0.0, 1.0)).norm() < 1e-6);
    }

    #[test]
    fn test_face_normal_of_degenerate_triangle_is_none() {
        let p = Point3::new(1.0, 2.0, 3.0);
        assert!(face_normal(&p, &p, &p).is_none());
    }

    #[test]
    fn test_center_and_fit_recenters_and_rescales() {
        let mut mesh = Mesh::from_parts(
            vec![
                Point3::new(10.0, 10.0, 10.0),
                Point3::new(30.0, 10.0, 10.0),
                Point3::new(10.0, 30.0, 10.0),
            ],
            vec![[0, 1, 2]],
            Rgba::WHITE,
        )
        .unwrap();
        mesh.center_and_fit(100.0);

        let max_extent = mesh
            .vertices
            .iter()
            .map(|v| v.coords.norm())
            .fold(0.0, f32::max);
        assert!((max_extent - 100.0).abs() < 1e-3);

        // The bounding-box center moved onto the origin.
        let mut min = mesh.vertices[0].coords;
        let mut max = mesh.vertices[0].coords;
        for v in &mesh.vertices {
            min = min.inf(&v.coords);
            max = max.sup(&v.coords);
        }
        assert!(((min + max) * 0.5).norm() < 1e-3);
    }

    #[test]
    fn test_center_and_fit_leaves_degenerate_meshes_alone() {
        let mut empty = Mesh::from_parts(vec![], vec![], Rgba::WHITE).unwrap();
        empty.center_and_fit(100.0);
        assert!(empty.vertices.is_empty());

        let point = Point3::new(5.0, 5.0, 5.0);
        let mut single = Mesh::from_parts(vec![point], vec![], Rgba::WHITE).unwrap();
        single.center_and_fit(100.0);
        assert_eq!(single.vertices[0], point);
    }
}

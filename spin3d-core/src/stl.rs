//! STL parsing (binary and ASCII) into the indexed [`Mesh`] type.
//!
//! Stored facet normals are discarded; shading recomputes normals from
//! the transformed vertices. Vertices shared between facets are
//! deduplicated by exact coordinate bits so the indexed mesh reflects
//! the model's connectivity.

use nom::{
    bytes::complete::tag,
    character::complete::{multispace0, multispace1, not_line_ending},
    multi::many0,
    number::complete::float,
    sequence::preceded,
    IResult,
};
use std::collections::HashMap;
use thiserror::Error;

use crate::framebuffer::Rgba;
use crate::geometry::{Mesh, MeshError, Vertex};

/// Base color for meshes loaded from STL files.
const STL_COLOR: Rgba = Rgba::new(205, 205, 205, 255);

#[derive(Debug, Error)]
pub enum StlError {
    #[error("file too small to be a valid STL")]
    TooSmall,
    #[error("unexpected end of file in facet data")]
    Truncated,
    #[error("failed to parse ASCII STL: {0}")]
    Ascii(String),
    #[error(transparent)]
    Mesh(#[from] MeshError),
}

/// A facet straight from the file: three corner positions.
type Facet = [[f32; 3]; 3];

/// Accumulates facets into an indexed mesh, deduplicating vertices by
/// their exact bit patterns.
struct MeshBuilder {
    vertices: Vec<Vertex>,
    faces: Vec<[usize; 3]>,
    dedup: HashMap<[u32; 3], usize>,
}

impl MeshBuilder {
    fn with_capacity(facets: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(facets * 3),
            faces: Vec::with_capacity(facets),
            dedup: HashMap::new(),
        }
    }

    fn add_facet(&mut self, facet: Facet) {
        let mut indices = [0usize; 3];
        for (slot, corner) in indices.iter_mut().zip(facet) {
            *slot = self.add_vertex(corner);
        }
        self.faces.push(indices);
    }

    fn add_vertex(&mut self, [x, y, z]: [f32; 3]) -> usize {
        let key = [x.to_bits(), y.to_bits(), z.to_bits()];
        if let Some(&index) = self.dedup.get(&key) {
            return index;
        }
        self.vertices.push(Vertex::new(x, y, z));
        let index = self.vertices.len() - 1;
        self.dedup.insert(key, index);
        index
    }

    fn finish(self) -> Result<Mesh, MeshError> {
        Mesh::from_parts(self.vertices, self.faces, STL_COLOR)
    }
}

/// Parse a binary STL file.
pub fn parse_binary_stl(data: &[u8]) -> Result<Mesh, StlError> {
    if data.len() < 84 {
        return Err(StlError::TooSmall);
    }

    // Skip the 80-byte header.
    let data = &data[80..];
    let facet_count = u32::from_le_bytes([data[0], data[1], data[2], data[3]]) as usize;

    let mut builder = MeshBuilder::with_capacity(facet_count);
    let mut offset = 4;

    for _ in 0..facet_count {
        // 12 bytes normal + 36 bytes vertices + 2 bytes attributes.
        if offset + 50 > data.len() {
            return Err(StlError::Truncated);
        }
        offset += 12; // stored normal, recomputed later

        let mut facet: Facet = [[0.0; 3]; 3];
        for corner in &mut facet {
            for coord in corner.iter_mut() {
                *coord = f32::from_le_bytes([
                    data[offset],
                    data[offset + 1],
                    data[offset + 2],
                    data[offset + 3],
                ]);
                offset += 4;
            }
        }
        offset += 2;

        builder.add_facet(facet);
    }

    Ok(builder.finish()?)
}

/// Parse an ASCII STL file.
pub fn parse_ascii_stl(input: &str) -> Result<Mesh, StlError> {
    let (_, facets) =
        parse_ascii_impl(input).map_err(|e| StlError::Ascii(format!("{e:?}")))?;
    let mut builder = MeshBuilder::with_capacity(facets.len());
    for facet in facets {
        builder.add_facet(facet);
    }
    Ok(builder.finish()?)
}

fn parse_ascii_impl(input: &str) -> IResult<&str, Vec<Facet>> {
    let (input, _) = preceded(multispace0, tag("solid"))(input)?;
    let (input, _) = not_line_ending(input)?; // optional solid name
    let (input, facets) = many0(parse_facet)(input)?;
    let (input, _) = preceded(multispace0, tag("endsolid"))(input)?;

    Ok((input, facets))
}

fn parse_facet(input: &str) -> IResult<&str, Facet> {
    let (input, _) = preceded(multispace0, tag("facet"))(input)?;
    let (input, _) = preceded(multispace1, tag("normal"))(input)?;
    let (input, _) = parse_vector3(input)?; // stored normal, unused
    let (input, _) = preceded(multispace0, tag("outer"))(input)?;
    let (input, _) = preceded(multispace1, tag("loop"))(input)?;
    let (input, v0) = parse_corner(input)?;
    let (input, v1) = parse_corner(input)?;
    let (input, v2) = parse_corner(input)?;
    let (input, _) = preceded(multispace0, tag("endloop"))(input)?;
    let (input, _) = preceded(multispace0, tag("endfacet"))(input)?;

    Ok((input, [v0, v1, v2]))
}

fn parse_corner(input: &str) -> IResult<&str, [f32; 3]> {
    let (input, _) = preceded(multispace0, tag("vertex"))(input)?;
    parse_vector3(input)
}

fn parse_vector3(input: &str) -> IResult<&str, [f32; 3]> {
    let (input, _) = multispace0(input)?;
    let (input, x) = float(input)?;
    let (input, _) = multispace1(input)?;
    let (input, y) = float(input)?;
    let (input, _) = multispace1(input)?;
    let (input, z) = float(input)?;
    Ok((input, [x, y, z]))
}

/// Detect and parse an STL file (binary or ASCII).
pub fn parse_stl(data: &[u8]) -> Result<Mesh, StlError> {
    if data.len() > 5 && &data[0..5] == b"solid" {
        // Might be ASCII; binary files can also start with "solid".
        if let Ok(text) = std::str::from_utf8(data) {
            if let Ok(mesh) = parse_ascii_stl(text) {
                return Ok(mesh);
            }
        }
    }

    parse_binary_stl(data)
}

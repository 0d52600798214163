/// Wavefront OBJ subset: `v`, `vt`, `vn` and `f` lines.
///
/// Texture coordinates and normals are assigned to vertices by order of
/// appearance (the k-th `vt`/`vn` goes to the k-th vertex); face tokens only
/// use their leading position index, so `f 1/2/3 ...` works. Faces with more
/// than three corners are fan-triangulated from their first corner.

use std::path::Path;

use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::error::{Error, Result};
use crate::{engine_info, engine_warn};
use super::material::MaterialDesc;
use super::model::fit_transform;
use super::primitive::{bounds_of, retain_valid_triangles, Primitive, Topology};
use super::resources::Resources;
use super::vertex::{transform_vertices, VertexStd};

/// Parsed triangle mesh
#[derive(Debug, Clone, Default)]
pub struct ObjMesh {
    pub vertices: Vec<VertexStd>,
    pub indices: Vec<i32>,
}

fn floats<const N: usize>(tokens: std::str::SplitWhitespace<'_>) -> [f32; N] {
    let mut out = [0.0; N];
    for (slot, token) in out.iter_mut().zip(tokens) {
        *slot = token.parse().unwrap_or(0.0);
    }
    out
}

/// Leading integer of a face token ("12", "12/3", "-1//4")
fn face_index(token: &str) -> Option<i32> {
    token.split('/').next()?.parse().ok()
}

/// Parse OBJ text, transforming positions as points and normals as normals
///
/// Triangles with a corner outside the vertex list are dropped.
pub fn parse(text: &str, transform: &Mat4) -> ObjMesh {
    let (vertex_count, triangle_count) = text.lines().fold((0, 0), |(nv, nf), line| {
        let mut tokens = line.split_whitespace();
        match tokens.next() {
            Some("v") => (nv + 1, nf),
            Some("f") => (nv, nf + tokens.count().saturating_sub(2)),
            _ => (nv, nf),
        }
    });

    let mut vertices = vec![
        VertexStd::new(Vec3::ZERO, Vec2::ZERO, Vec3::ZERO, Vec4::ONE);
        vertex_count
    ];
    let mut indices = Vec::with_capacity(triangle_count * 3);
    let (mut nv, mut nt, mut nn) = (0usize, 0usize, 0usize);
    let mut min_index: Option<i32> = None;

    for line in text.lines() {
        let mut tokens = line.split_whitespace();
        match tokens.next() {
            Some("v") => {
                let [x, y, z] = floats::<3>(tokens);
                vertices[nv].position = Vec3::new(x, y, z);
                nv += 1;
            }
            Some("vt") => {
                if let Some(v) = vertices.get_mut(nt) {
                    let [u, w] = floats::<2>(tokens);
                    v.texcoord = Vec2::new(u, w);
                }
                nt += 1;
            }
            Some("vn") => {
                if let Some(v) = vertices.get_mut(nn) {
                    let [x, y, z] = floats::<3>(tokens);
                    v.normal = Vec3::new(x, y, z);
                }
                nn += 1;
            }
            Some("f") => {
                let corners = tokens.filter_map(face_index).map(|i| {
                    // negative indices are relative to the vertices read so far
                    if i < 0 { nv as i32 + i } else { i - 1 }
                });
                let (mut first, mut previous) = (0, 0);
                for (n, i) in corners.enumerate() {
                    match n {
                        0 => first = i,
                        1 => previous = i,
                        _ => {
                            indices.extend_from_slice(&[first, previous, i]);
                            let lowest = first.min(previous).min(i);
                            min_index = Some(min_index.map_or(lowest, |m| m.min(lowest)));
                            previous = i;
                        }
                    }
                }
            }
            _ => {}
        }
    }

    if let Some(offset) = min_index.filter(|&m| m > 0) {
        for index in &mut indices {
            *index -= offset;
        }
    }
    let dropped = retain_valid_triangles(&mut indices, vertex_count);
    if dropped > 0 {
        engine_warn!("tse::Primitive", "{} OBJ triangle(s) reference missing vertices, dropped", dropped);
    }
    transform_vertices(&mut vertices, transform);
    ObjMesh { vertices, indices }
}

impl Primitive {
    /// Load an OBJ file as one triangle mesh with a material named after the file
    ///
    /// A non-zero `fit_size` first normalizes the raw mesh the way models are
    /// fitted, then `transform` is applied.
    pub fn load_obj(res: &mut Resources, path: &Path, transform: Mat4, fit_size: Vec3) -> Result<u32> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::AssetError(format!("{}: {}", path.display(), e)))?;
        if text.is_empty() {
            return Err(Error::AssetError(format!("{}: empty file", path.display())));
        }

        let mesh = if fit_size == Vec3::ZERO {
            parse(&text, &transform)
        } else {
            let mut mesh = parse(&text, &Mat4::IDENTITY);
            let (min, max) = bounds_of(&mesh.vertices);
            transform_vertices(&mut mesh.vertices, &(transform * fit_transform(min, max, fit_size)));
            mesh
        };

        let name = path.to_string_lossy().into_owned();
        let material = res.material_create(MaterialDesc {
            name: name.clone(),
            ..Default::default()
        })?;
        let id = res.primitive_create(Some(material), Topology::TriMesh, &mesh.vertices, &mesh.indices)?;
        engine_info!("tse::Primitive", "Primitive loaded: {} ({} vertices, {} triangles)",
            name, mesh.vertices.len(), mesh.indices.len() / 3);
        Ok(id)
    }
}

#[cfg(test)]
#[path = "obj_tests.rs"]
mod tests;

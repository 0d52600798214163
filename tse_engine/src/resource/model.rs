/// Multi-primitive model loaded from a G3DM container.
///
/// Layout (little-endian):
/// - "G3DM", i32 primitive count, i32 material count, i32 texture count
/// - per primitive: u32 vertex count, u32 index count, i32 material index,
///   vertex records (48 bytes each), i32 indices
/// - per material: 300-byte name, ka/kd/ks (3 × f32 each), shininess,
///   transparency, 8 × i32 texture index (-1 = none), 300-byte shader name,
///   i32 shader index (both unused)
/// - per texture: 300-byte name, i32 width, height, channels, pixel bytes
///
/// A texture whose pixel payload would run past the end of the file stops
/// texture loading; everything read so far is kept. Triangles indexing past
/// their primitive's vertex records are dropped.

use std::path::Path;

use glam::{Mat4, Vec3};

use crate::error::{Error, Result};
use crate::{engine_info, engine_warn};
use super::asset_reader::{AssetReader, NAME_LENGTH};
use super::material::{MaterialDesc, DEFAULT_NAME, MAX_TEXTURES};
use super::primitive::{bounds_of, retain_valid_triangles, Topology};
use super::resources::Resources;
use super::vertex::{transform_vertices, VertexStd};

const MAGIC: &[u8; 4] = b"G3DM";

/// Uniform scale and translation fitting a bounding box to a requested size
///
/// The first non-zero axis of `fit_size` (X, then Y, then Z) selects the
/// scale `fit / extent`; the minimum corner moves to the origin. A zero
/// `fit_size`, or a flat box along the chosen axis, yields identity.
pub fn fit_transform(min: Vec3, max: Vec3, fit_size: Vec3) -> Mat4 {
    let extent = max - min;
    let axis = (0..3).find(|&i| fit_size[i] != 0.0);
    match axis {
        Some(i) if extent[i] != 0.0 => {
            let scale = fit_size[i] / extent[i];
            Mat4::from_scale(Vec3::splat(scale)) * Mat4::from_translation(-min)
        }
        _ => Mat4::IDENTITY,
    }
}

// ===== CONTAINER RECORDS =====

pub struct PrimitiveRecord {
    pub vertices: Vec<VertexStd>,
    pub indices: Vec<i32>,
    pub material: i32,
}

pub struct MaterialRecord {
    pub name: String,
    pub ka: Vec3,
    pub kd: Vec3,
    pub ks: Vec3,
    pub ph: f32,
    pub trans: f32,
    pub textures: [i32; MAX_TEXTURES],
}

pub struct TextureRecord {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub channels: u32,
    pub pixels: Vec<u8>,
}

/// Decoded G3DM contents
#[derive(Default)]
pub struct ModelData {
    pub primitives: Vec<PrimitiveRecord>,
    pub materials: Vec<MaterialRecord>,
    pub textures: Vec<TextureRecord>,
}

fn read_vec3(reader: &mut AssetReader) -> Result<Vec3> {
    Ok(Vec3::new(reader.f32()?, reader.f32()?, reader.f32()?))
}

fn count(value: i32, what: &str) -> Result<usize> {
    usize::try_from(value).map_err(|_| Error::AssetError(format!("negative {} count {}", what, value)))
}

/// Decode a G3DM container
pub fn parse_container(data: &[u8]) -> Result<ModelData> {
    let mut reader = AssetReader::new(data);
    reader.expect_magic(MAGIC)?;
    let primitive_count = count(reader.i32()?, "primitive")?;
    let material_count = count(reader.i32()?, "material")?;
    let texture_count = count(reader.i32()?, "texture")?;

    let mut model = ModelData::default();
    for _ in 0..primitive_count {
        let vertex_count = reader.u32()? as usize;
        let index_count = reader.u32()? as usize;
        let material = reader.i32()?;
        let vertices = reader.pod_vec(vertex_count)?;
        let mut indices = reader.pod_vec(index_count)?;
        let dropped = retain_valid_triangles(&mut indices, vertex_count);
        if dropped > 0 {
            engine_warn!("tse::Model", "{} triangle(s) reference missing vertices, dropped", dropped);
        }
        model.primitives.push(PrimitiveRecord { vertices, indices, material });
    }

    for _ in 0..material_count {
        let name = reader.fixed_string(NAME_LENGTH)?;
        let ka = read_vec3(&mut reader)?;
        let kd = read_vec3(&mut reader)?;
        let ks = read_vec3(&mut reader)?;
        let ph = reader.f32()?;
        let trans = reader.f32()?;
        let mut textures = [-1i32; MAX_TEXTURES];
        for slot in &mut textures {
            *slot = reader.i32()?;
        }
        reader.bytes(NAME_LENGTH)?;
        reader.i32()?;
        model.materials.push(MaterialRecord { name, ka, kd, ks, ph, trans, textures });
    }

    for _ in 0..texture_count {
        let name = reader.fixed_string(NAME_LENGTH)?;
        let width = reader.i32()?.max(0) as u32;
        let height = reader.i32()?.max(0) as u32;
        let channels = reader.i32()?.max(0) as u32;
        let size = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(channels as usize))
            .filter(|&n| n <= reader.remaining());
        let Some(size) = size else {
            engine_warn!("tse::Model", "Texture '{}' truncated, skipping the remaining textures", name);
            break;
        };
        let pixels = reader.bytes(size)?.to_vec();
        model.textures.push(TextureRecord { name, width, height, channels, pixels });
    }

    Ok(model)
}

// ===== MODEL =====

/// A set of primitives drawn together
///
/// The model owns its primitive keys; materials and textures it creates are
/// named `<file>::<name>` and live on in their managers.
#[derive(Default)]
pub struct Model {
    name: String,
    primitives: Vec<u32>,
    min: Vec3,
    max: Vec3,
}

impl Model {
    /// Load a model file; failures are logged and leave an empty model
    pub fn from_file(res: &mut Resources, path: &Path, transform: Mat4, fit_size: Vec3) -> Self {
        let mut model = Self::default();
        model.load(res, path, transform, fit_size);
        model
    }

    /// Replace the current contents with a model file
    ///
    /// Returns false (with the model left empty) when the file is missing or
    /// malformed.
    pub fn load(&mut self, res: &mut Resources, path: &Path, transform: Mat4, fit_size: Vec3) -> bool {
        self.free(res);
        self.name = path.to_string_lossy().into_owned();

        let result = std::fs::read(path)
            .map_err(Error::from)
            .and_then(|bytes| parse_container(&bytes))
            .and_then(|data| self.build(res, data, transform, fit_size));
        match result {
            Ok(()) => {
                engine_info!("tse::Model", "Model created: {} ({} primitive(s))", self.name, self.primitives.len());
                true
            }
            Err(e) => {
                engine_warn!("tse::Model", "Model '{}' not loaded: {}", self.name, e);
                self.free(res);
                false
            }
        }
    }

    fn build(&mut self, res: &mut Resources, mut data: ModelData, transform: Mat4, fit_size: Vec3) -> Result<()> {
        // aggregate bounds of the raw streams
        let raw_bounds = data
            .primitives
            .iter()
            .filter(|p| !p.vertices.is_empty())
            .map(|p| bounds_of(&p.vertices))
            .reduce(|(amin, amax), (bmin, bmax)| (amin.min(bmin), amax.max(bmax)));
        let (raw_min, raw_max) = raw_bounds.unwrap_or((Vec3::ZERO, Vec3::ZERO));
        let combined = transform * fit_transform(raw_min, raw_max, fit_size);

        let texture_names: Vec<String> = data
            .textures
            .iter()
            .map(|t| {
                let name = format!("{}::{}", self.name, t.name);
                res.texture_create(&name, t.width, t.height, t.channels, Some(&t.pixels), true)
            })
            .collect::<Result<_>>()?;

        let mut material_names = Vec::with_capacity(data.materials.len());
        for record in &data.materials {
            let textures = record
                .textures
                .iter()
                .map(|&t| usize::try_from(t).ok().and_then(|t| texture_names.get(t)).cloned())
                .collect();
            material_names.push(res.material_create(MaterialDesc {
                name: format!("{}::{}", self.name, record.name),
                ka: record.ka,
                kd: record.kd,
                ks: record.ks,
                ph: record.ph,
                trans: record.trans,
                shader: None,
                textures,
            })?);
        }

        let mut bounds: Option<(Vec3, Vec3)> = None;
        for record in &mut data.primitives {
            transform_vertices(&mut record.vertices, &combined);
            if !record.vertices.is_empty() {
                let (min, max) = bounds_of(&record.vertices);
                bounds = Some(bounds.map_or((min, max), |(a, b)| (a.min(min), b.max(max))));
            }
            let material = usize::try_from(record.material)
                .ok()
                .and_then(|i| material_names.get(i))
                .cloned()
                .unwrap_or_else(|| DEFAULT_NAME.to_string());
            let id = res.primitive_create(Some(material), Topology::TriMesh, &record.vertices, &record.indices)?;
            self.primitives.push(id);
        }
        (self.min, self.max) = bounds.unwrap_or((Vec3::ZERO, Vec3::ZERO));
        Ok(())
    }

    /// Delete every primitive of the model
    pub fn free(&mut self, res: &mut Resources) {
        for id in self.primitives.drain(..) {
            res.primitive_delete(id);
        }
        self.min = Vec3::ZERO;
        self.max = Vec3::ZERO;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn primitives(&self) -> &[u32] {
        &self.primitives
    }

    /// Bounds after the load transform, as (min, max)
    pub fn bounds(&self) -> (Vec3, Vec3) {
        (self.min, self.max)
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }
}

#[cfg(test)]
#[path = "model_tests.rs"]
mod tests;

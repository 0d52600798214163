//! Resource management module
//!
//! GPU resources (buffers, textures, shaders, materials, primitives, fonts)
//! live in keyed managers grouped by [`Resources`]; models are app-owned
//! collections of primitive keys.

mod resource_manager;
mod resources;
mod asset_reader;
mod dir_watcher;
mod image_loader;
pub mod buffer;
pub mod texture;
pub mod shader;
pub mod material;
pub mod vertex;
pub mod primitive;
pub mod obj;
pub mod model;
pub mod font;

pub use resource_manager::{Resource, ResourceKey, ResourceManager};
pub use resources::{
    Resources,
    BufferManager, TextureManager, ShaderManager,
    MaterialManager, PrimitiveManager, FontManager,
};
pub use asset_reader::AssetReader;
pub use dir_watcher::DirWatcher;
pub use image_loader::{load_bgra, DecodedImage};
pub use buffer::Buffer;
pub use texture::{Texture, mip_level_count};
pub use shader::{Shader, ShaderVariable, ShaderBlock, assemble_stage_source};
pub use material::{Material, MaterialDesc, MaterialSync, MATERIAL_SLOT, MAX_TEXTURES};
pub use vertex::{Vertex, VertexSemantic, VertexStd, VertexPos, transform_vertices};
pub use primitive::{Primitive, Topology, bounds_of};
pub use obj::ObjMesh;
pub use model::{Model, fit_transform};
pub use font::{Font, GlyphPlacement};

//! Integration tests for the device-free asset helpers
//!
//! OBJ parsing, model fitting and the G3DM/G3DF container decoders.
//! No GPU required.
//!
//! Run with: cargo test --test asset_integration_tests

use tse_engine::glam::{Mat4, Vec2, Vec3, Vec4};
use tse_engine::tse::resource::{fit_transform, obj, model, font, AssetReader, VertexStd};

// ============================================================================
// OBJ
// ============================================================================

const CUBE_CORNER: &str = "\
# three faces around the origin corner
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
v 0 0 1
vn 0 0 1
vt 0 0
f 1/1/1 2/1/1 3/1/1 4/1/1
f 1 5 2
";

#[test]
fn test_obj_quad_and_triangle() {
    let mesh = obj::parse(CUBE_CORNER, &Mat4::IDENTITY);

    assert_eq!(mesh.vertices.len(), 5);
    assert_eq!(mesh.indices, vec![0, 1, 2, 0, 2, 3, 0, 4, 1]);
}

#[test]
fn test_obj_transform_applied() {
    let mesh = obj::parse(CUBE_CORNER, &Mat4::from_translation(Vec3::new(10.0, 0.0, 0.0)));

    assert_eq!(mesh.vertices[0].position, Vec3::new(10.0, 0.0, 0.0));
    assert_eq!(mesh.vertices[4].position, Vec3::new(10.0, 0.0, 1.0));
}

#[test]
fn test_obj_empty_text() {
    let mesh = obj::parse("", &Mat4::IDENTITY);
    assert!(mesh.vertices.is_empty());
    assert!(mesh.indices.is_empty());
}

// ============================================================================
// FIT
// ============================================================================

#[test]
fn test_fit_first_nonzero_axis_wins() {
    let m = fit_transform(Vec3::ZERO, Vec3::new(2.0, 4.0, 1.0), Vec3::new(0.0, 2.0, 100.0));
    // y extent 4 scaled to 2
    assert_eq!(m.transform_point3(Vec3::new(2.0, 4.0, 1.0)), Vec3::new(1.0, 2.0, 0.5));
}

#[test]
fn test_fit_zero_size_is_identity() {
    assert_eq!(fit_transform(Vec3::ZERO, Vec3::ONE, Vec3::ZERO), Mat4::IDENTITY);
}

// ============================================================================
// CONTAINERS
// ============================================================================

#[test]
fn test_model_container_empty() {
    let mut bytes = b"G3DM".to_vec();
    for _ in 0..3 {
        bytes.extend_from_slice(&0i32.to_le_bytes());
    }
    let data = model::parse_container(&bytes).unwrap();
    assert!(data.primitives.is_empty());
    assert!(data.materials.is_empty());
    assert!(data.textures.is_empty());
}

#[test]
fn test_model_container_bad_magic() {
    assert!(model::parse_container(b"G3DF\0\0\0\0").is_err());
}

#[test]
fn test_model_container_truncated_primitive() {
    let mut bytes = b"G3DM".to_vec();
    for count in [1i32, 0, 0] {
        bytes.extend_from_slice(&count.to_le_bytes());
    }
    // 3 vertices announced, none present
    bytes.extend_from_slice(&3u32.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&0i32.to_le_bytes());
    assert!(model::parse_container(&bytes).is_err());
}

#[test]
fn test_font_container_truncated() {
    let mut bytes = b"G3DF".to_vec();
    bytes.extend_from_slice(&32u32.to_le_bytes());
    bytes.extend_from_slice(&24u32.to_le_bytes());
    assert!(font::parse_container(&bytes).is_err());
}

#[test]
fn test_reader_vertex_records() {
    let vertex = VertexStd::new(Vec3::new(1.0, 2.0, 3.0), Vec2::ZERO, Vec3::Z, Vec4::ONE);
    let mut bytes = vec![0xAAu8]; // misalign the records on purpose
    bytes.extend_from_slice(bytemuck::cast_slice(&[vertex, vertex]));

    let mut reader = AssetReader::new(&bytes);
    reader.bytes(1).unwrap();
    let vertices: Vec<VertexStd> = reader.pod_vec(2).unwrap();
    assert_eq!(vertices[1].position, Vec3::new(1.0, 2.0, 3.0));
    assert_eq!(reader.remaining(), 0);
}

use super::*;

#[test]
fn test_std_layout_offsets() {
    let offsets: Vec<usize> = VertexStd::SEMANTICS.iter().map(|&(_, o)| o).collect();
    assert_eq!(offsets, vec![0, 12, 20, 32]);
    assert_eq!(VERTEX_STD_SIZE, 48);
}

#[test]
fn test_attribute_names() {
    assert_eq!(VertexSemantic::Position.attribute_name(), "InPosition");
    assert_eq!(VertexSemantic::TexCoord.attribute_name(), "InTexCoord");
    assert_eq!(VertexSemantic::Bitangent.attribute_name(), "InBitangent");
}

#[test]
fn test_transform_points_and_normals() {
    let mut vertices = [VertexStd::new(Vec3::new(1.0, 1.0, 0.0), Vec2::ZERO, Vec3::Y, Vec4::ONE)];
    let m = Mat4::from_translation(Vec3::new(0.0, 0.0, 3.0)) * Mat4::from_scale(Vec3::new(2.0, 1.0, 1.0));

    transform_vertices(&mut vertices, &m);

    assert_eq!(vertices[0].position, Vec3::new(2.0, 1.0, 3.0));
    // translation leaves normals alone; scaling X does not touch a Y normal
    assert_eq!(vertices[0].normal, Vec3::Y);
}

#[test]
fn test_transform_singular_matrix_keeps_finite_normals() {
    let mut vertices = [VertexStd::new(Vec3::ONE, Vec2::ZERO, Vec3::X, Vec4::ONE)];
    transform_vertices(&mut vertices, &Mat4::from_scale(Vec3::new(1.0, 0.0, 1.0)));
    assert!(vertices[0].normal.is_finite());
}

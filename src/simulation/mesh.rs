use bevy::math::Vec3;
use bevy::prelude::Mesh;
use bevy::render::mesh::{Indices, PrimitiveTopology};

pub fn banner_mesh(positions: &[f32], segments_w: usize, segments_h: usize) -> Mesh {
    let mut mesh = Mesh::new(PrimitiveTopology::TriangleList);

    update_positions(&mut mesh, positions, segments_w, segments_h);
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, grid_uvs(segments_w, segments_h));
    mesh.set_indices(Some(Indices::U32(grid_indices(segments_w, segments_h))));

    mesh
}

/// Replaces positions and recomputes shading normals.
pub fn update_positions(mesh: &mut Mesh, positions: &[f32], segments_w: usize, segments_h: usize) {
    let points: Vec<[f32; 3]> = positions
        .chunks_exact(3)
        .map(|c| [c[0], c[1], c[2]])
        .collect();
    let normals = grid_normals(&points, segments_w, segments_h);

    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, points);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
}

/// Two counter-clockwise triangles per cell, seen from +z.
pub fn grid_indices(segments_w: usize, segments_h: usize) -> Vec<u32> {
    let columns = (segments_w + 1) as u32;
    let mut indices = Vec::with_capacity(segments_w * segments_h * 6);

    for v in 0..segments_h as u32 {
        for u in 0..segments_w as u32 {
            let top_left = u + v * columns;
            let top_right = top_left + 1;
            let bottom_left = top_left + columns;
            let bottom_right = bottom_left + 1;

            indices.extend_from_slice(&[top_left, bottom_left, top_right]);
            indices.extend_from_slice(&[top_right, bottom_left, bottom_right]);
        }
    }

    indices
}

pub fn grid_uvs(segments_w: usize, segments_h: usize) -> Vec<[f32; 2]> {
    let mut uvs = Vec::with_capacity((segments_w + 1) * (segments_h + 1));
    for v in 0..=segments_h {
        for u in 0..=segments_w {
            uvs.push([u as f32 / segments_w as f32, v as f32 / segments_h as f32]);
        }
    }
    uvs
}

/// Smooth per-vertex normals: the normalized sum of the adjacent face
/// normals. Degenerate vertices fall back to +z.
pub fn grid_normals(points: &[[f32; 3]], segments_w: usize, segments_h: usize) -> Vec<[f32; 3]> {
    let mut sums = vec![Vec3::ZERO; points.len()];

    for triangle in grid_indices(segments_w, segments_h).chunks_exact(3) {
        let [a, b, c] = [triangle[0], triangle[1], triangle[2]].map(|i| i as usize);
        if a.max(b).max(c) >= points.len() {
            continue;
        }

        let pa = Vec3::from(points[a]);
        let face = (Vec3::from(points[b]) - pa).cross(Vec3::from(points[c]) - pa);

        sums[a] += face;
        sums[b] += face;
        sums[c] += face;
    }

    sums.into_iter()
        .map(|n| {
            let n = n.normalize_or_zero();
            if n == Vec3::ZERO {
                Vec3::Z.to_array()
            } else {
                n.to_array()
            }
        })
        .collect()
}

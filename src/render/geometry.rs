use std::f32::consts::{PI, TAU};

use glam::Vec3;
use itertools::iproduct;

use super::data::Vertex;

pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

/// Latitude/longitude sphere centered at the origin.
///
/// Rows run from the +y pole (`iy = 0`) to the -y pole, columns sweep around y. Each row
/// repeats its first vertex at the end so the seam is closed. Triangles wind
/// counter-clockwise seen from outside; the pole rows skip their degenerate half.
pub fn generate_sphere(radius: f32, width_segments: u32, height_segments: u32) -> Mesh {
    let width_segments = width_segments.max(3);
    let height_segments = height_segments.max(2);
    let row_length = width_segments + 1;

    let vertices = iproduct!(0..=height_segments, 0..=width_segments)
        .map(|(iy, ix)| {
            let u = ix as f32 / width_segments as f32;
            let v = iy as f32 / height_segments as f32;
            let normal = Vec3::new(
                -(u * TAU).cos() * (v * PI).sin(),
                (v * PI).cos(),
                (u * TAU).sin() * (v * PI).sin(),
            );
            Vertex::new(normal * radius, normal)
        })
        .collect();

    let indices = iproduct!(0..height_segments, 0..width_segments)
        .flat_map(|(iy, ix)| {
            let a = iy * row_length + ix + 1;
            let b = iy * row_length + ix;
            let c = (iy + 1) * row_length + ix;
            let d = (iy + 1) * row_length + ix + 1;

            let top = (iy != 0).then_some([a, b, d]);
            let bottom = (iy != height_segments - 1).then_some([b, c, d]);
            top.into_iter().chain(bottom).flatten()
        })
        .collect();

    Mesh { vertices, indices }
}

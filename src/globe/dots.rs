use std::f32::consts::TAU;

use glam::{Affine3A, Quat, Vec3};
use rand::Rng;

use super::{
    error::GlobeError, land_mask::LandMask, projection::point_to_uv, sampler::SphereSampler,
};

pub const SPHERE_CENTER: Vec3 = Vec3::ZERO;

/// Regular polygon used as the marker for one dot.
///
/// Corners lie on a circle in the xy plane so the polygon faces +z before it gets oriented
/// onto the sphere. It is triangulated as a fan from the first corner.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DotPolygon {
    radius: f32,
    sides: u32,
}

impl Default for DotPolygon {
    fn default() -> Self {
        Self {
            radius: 2.0,
            sides: 3,
        }
    }
}

impl DotPolygon {
    pub fn new(radius: f32, sides: u32) -> Result<Self, GlobeError> {
        if radius.is_nan() || radius <= 0.0 || sides < 3 {
            return Err(GlobeError::InvalidDotShape { radius, sides });
        }

        Ok(Self { radius, sides })
    }

    pub fn vertices_per_dot(&self) -> usize {
        3 * (self.sides as usize - 2)
    }

    fn corner(&self, k: u32) -> Vec3 {
        let angle = TAU * k as f32 / self.sides as f32;
        Vec3::new(angle.cos(), angle.sin(), 0.0) * self.radius
    }

    /// Triangle corners in the canonical +z facing pose, counter-clockwise.
    pub fn triangle_vertices(&self) -> Vec<Vec3> {
        let first = self.corner(0);
        (1..self.sides - 1)
            .flat_map(|k| [first, self.corner(k), self.corner(k + 1)])
            .collect()
    }
}

/// Flattened dot geometry ready for upload.
///
/// `positions` holds three floats per vertex and `attributes` one float per vertex, so
/// vertex `i` lives at `positions[3 * i..3 * i + 3]` and `attributes[i]`. Every vertex of
/// a dot carries the same attribute value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DotMesh {
    positions: Vec<f32>,
    attributes: Vec<f32>,
    vertices_per_dot: usize,
}

impl DotMesh {
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn attributes(&self) -> &[f32] {
        &self.attributes
    }

    pub fn vertices_per_dot(&self) -> usize {
        self.vertices_per_dot
    }

    pub fn vertex_count(&self) -> usize {
        self.attributes.len()
    }

    pub fn dot_count(&self) -> usize {
        if self.vertices_per_dot == 0 {
            0
        } else {
            self.vertex_count() / self.vertices_per_dot
        }
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

pub struct DotMeshBuilder<'a> {
    sampler: SphereSampler,
    polygon: DotPolygon,
    mask: &'a LandMask,
}

impl<'a> DotMeshBuilder<'a> {
    pub fn new(sampler: SphereSampler, polygon: DotPolygon, mask: &'a LandMask) -> Self {
        Self {
            sampler,
            polygon,
            mask,
        }
    }

    fn is_land(&self, point: Vec3) -> bool {
        // a regular polygon is centered on its point, so the dot center is the point itself
        self.mask.is_land(point_to_uv(point, SPHERE_CENTER))
    }

    /// Sampled points that fall on land, in ascending sample order.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn land_points(&self) -> Vec<Vec3> {
        use rayon::iter::{IntoParallelIterator, ParallelIterator};

        (0..self.sampler.count())
            .into_par_iter()
            .map(|i| self.sampler.point(i))
            .filter(|&point| self.is_land(point))
            .collect()
    }

    /// Sampled points that fall on land, in ascending sample order.
    #[cfg(target_arch = "wasm32")]
    pub fn land_points(&self) -> Vec<Vec3> {
        self.sampler
            .points()
            .filter(|&point| self.is_land(point))
            .collect()
    }

    pub fn build<R: Rng + ?Sized>(&self, rng: &mut R) -> DotMesh {
        let land_points = self.land_points();
        let canonical = self.polygon.triangle_vertices();
        let vertices_per_dot = canonical.len();

        let mut positions = Vec::with_capacity(land_points.len() * vertices_per_dot * 3);
        let mut attributes = Vec::with_capacity(land_points.len() * vertices_per_dot);

        for point in land_points {
            let rotation = Quat::from_rotation_arc(Vec3::Z, (point - SPHERE_CENTER).normalize());
            let transform = Affine3A::from_rotation_translation(rotation, point);
            let random = rng.random::<f32>();

            for vertex in &canonical {
                positions.extend_from_slice(&transform.transform_point3(*vertex).to_array());
            }
            attributes.extend(std::iter::repeat_n(random, vertices_per_dot));
        }

        log::info!(
            "Built {} land dots out of {} samples ({} vertices)",
            attributes.len() / vertices_per_dot,
            self.sampler.count(),
            attributes.len()
        );

        DotMesh {
            positions,
            attributes,
            vertices_per_dot,
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use rstest::rstest;

    use super::*;

    fn opaque_mask() -> LandMask {
        LandMask::filled(2, 2, [255, 255, 255, 255]).unwrap()
    }

    fn build(count: u32, polygon: DotPolygon, mask: &LandMask, seed: u64) -> DotMesh {
        let sampler = SphereSampler::new(count, 600.0).unwrap();
        DotMeshBuilder::new(sampler, polygon, mask).build(&mut ChaCha8Rng::seed_from_u64(seed))
    }

    fn dot_vertices(mesh: &DotMesh) -> Vec<Vec<Vec3>> {
        mesh.positions()
            .chunks_exact(3 * mesh.vertices_per_dot())
            .map(|dot| dot.chunks_exact(3).map(Vec3::from_slice).collect())
            .collect()
    }

    #[test]
    fn opaque_mask_keeps_every_point() {
        let mesh = build(4, DotPolygon::default(), &opaque_mask(), 1);

        assert_eq!(mesh.dot_count(), 4);
        assert_eq!(mesh.positions().len(), 36);
        assert_eq!(mesh.attributes().len(), 12);
    }

    #[test]
    fn transparent_mask_keeps_nothing() {
        let mask = LandMask::filled(8, 4, [255, 255, 255, 0]).unwrap();
        let mesh = build(500, DotPolygon::default(), &mask, 1);

        assert!(mesh.is_empty());
        assert!(mesh.positions().is_empty());
        assert!(mesh.attributes().is_empty());
        assert_eq!(mesh.dot_count(), 0);
    }

    #[test]
    fn zero_samples_build_an_empty_mesh() {
        let mesh = build(0, DotPolygon::default(), &opaque_mask(), 1);

        assert!(mesh.is_empty());
    }

    #[rstest]
    #[case(3, 3)]
    #[case(4, 6)]
    #[case(5, 9)]
    fn buffers_stay_aligned(#[case] sides: u32, #[case] vertices_per_dot: usize) {
        let polygon = DotPolygon::new(2.0, sides).unwrap();
        let mesh = build(64, polygon, &opaque_mask(), 7);

        assert_eq!(mesh.vertices_per_dot(), vertices_per_dot);
        assert_eq!(mesh.attributes().len(), mesh.positions().len() / 3);
        assert_eq!(mesh.attributes().len(), 64 * vertices_per_dot);
    }

    #[test]
    fn every_vertex_of_a_dot_shares_one_random_value() {
        let polygon = DotPolygon::new(2.0, 5).unwrap();
        let mesh = build(200, polygon, &opaque_mask(), 3);

        for dot in mesh.attributes().chunks_exact(mesh.vertices_per_dot()) {
            assert!(dot.iter().all(|value| value.to_bits() == dot[0].to_bits()));
            assert!((0.0..1.0).contains(&dot[0]));
        }
    }

    #[test]
    fn seeded_builds_are_reproducible() {
        let first = build(300, DotPolygon::default(), &opaque_mask(), 42);
        let second = build(300, DotPolygon::default(), &opaque_mask(), 42);
        let other_seed = build(300, DotPolygon::default(), &opaque_mask(), 43);

        assert_eq!(first, second);
        assert_eq!(first.positions(), other_seed.positions());
        assert_ne!(first.attributes(), other_seed.attributes());
    }

    #[test]
    fn dots_lie_flat_on_the_sphere_facing_outwards() {
        let sampler = SphereSampler::new(50, 600.0).unwrap();
        let mesh = build(50, DotPolygon::default(), &opaque_mask(), 5);

        for (point, vertices) in sampler.points().zip(dot_vertices(&mesh)) {
            let [a, b, c] = [vertices[0], vertices[1], vertices[2]];
            let normal = (b - a).cross(c - a).normalize();
            let centroid = (a + b + c) / 3.0;

            assert_relative_eq!(normal.dot(point.normalize()), 1.0, epsilon = 1e-3);
            assert_abs_diff_eq!(centroid.distance(point), 0.0, epsilon = 1e-2);
            for vertex in vertices {
                assert_relative_eq!(vertex.distance(point), 2.0, epsilon = 1e-2);
            }
        }
    }

    #[test]
    fn only_land_points_survive() {
        // left half of the image is land
        #[rustfmt::skip]
        let pixels = vec![
            0, 0, 0, 255,    0, 0, 0, 0,
            0, 0, 0, 255,    0, 0, 0, 0,
        ];
        let mask = LandMask::new(2, 2, pixels).unwrap();
        let sampler = SphereSampler::new(400, 600.0).unwrap();
        let builder = DotMeshBuilder::new(sampler, DotPolygon::default(), &mask);

        let land_points = builder.land_points();
        let expected = sampler
            .points()
            .filter(|&p| point_to_uv(p, SPHERE_CENTER).x < 0.5)
            .collect::<Vec<_>>();

        assert!(!land_points.is_empty());
        assert!(land_points.len() < 400);
        assert_eq!(land_points, expected);
    }

    #[rstest]
    #[case(0.0, 3)]
    #[case(-2.0, 3)]
    #[case(2.0, 2)]
    #[case(f32::NAN, 4)]
    fn rejects_degenerate_polygons(#[case] radius: f32, #[case] sides: u32) {
        assert!(matches!(
            DotPolygon::new(radius, sides),
            Err(GlobeError::InvalidDotShape { .. })
        ));
    }
}

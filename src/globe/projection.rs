use std::f32::consts::PI;

use glam::{Vec2, Vec3};

/// Maps a point on the sphere to equirectangular texture coordinates.
///
/// The direction used is the one pointing from the point back *towards* the center; the
/// land masks in use are authored for that orientation and flipping it mirrors them.
/// For any unit direction both coordinates land in `[0, 1]`.
pub fn point_to_uv(point: Vec3, sphere_center: Vec3) -> Vec2 {
    let direction = (sphere_center - point).normalize_or_zero();

    let u = 1.0 - (0.5 + direction.z.atan2(direction.x) / (2.0 * PI));
    let v = 0.5 + direction.y.asin() / PI;

    Vec2::new(u, v)
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use rstest::rstest;

    use crate::globe::sampler::SphereSampler;

    use super::*;

    #[rstest]
    #[case(Vec3::X)]
    #[case(Vec3::NEG_X)]
    #[case(Vec3::Y)]
    #[case(Vec3::NEG_Y)]
    #[case(Vec3::Z)]
    #[case(Vec3::NEG_Z)]
    #[case(Vec3::new(1.0, -2.0, 3.0))]
    fn stays_in_unit_square(#[case] point: Vec3) {
        let uv = point_to_uv(point, Vec3::ZERO);

        assert!((0.0..=1.0).contains(&uv.x), "u = {}", uv.x);
        assert!((0.0..=1.0).contains(&uv.y), "v = {}", uv.y);
    }

    #[test]
    fn sampled_sphere_stays_in_unit_square() {
        let sampler = SphereSampler::new(2_000, 600.0).unwrap();

        for point in sampler.points() {
            let uv = point_to_uv(point, Vec3::ZERO);
            assert!((0.0..=1.0).contains(&uv.x));
            assert!((0.0..=1.0).contains(&uv.y));
        }
    }

    #[test]
    fn opposite_x_directions_are_half_a_turn_apart() {
        let positive = point_to_uv(Vec3::X, Vec3::ZERO);
        let negative = point_to_uv(Vec3::NEG_X, Vec3::ZERO);

        assert_abs_diff_eq!((positive.x - negative.x).abs().rem_euclid(1.0), 0.5, epsilon = 1e-6);
    }

    #[test]
    fn direction_points_towards_the_center() {
        // +y point looks down at the center, so it lands on the bottom edge of the image
        let top = point_to_uv(Vec3::new(0.0, 600.0, 0.0), Vec3::ZERO);
        let bottom = point_to_uv(Vec3::new(0.0, -600.0, 0.0), Vec3::ZERO);

        assert_abs_diff_eq!(top.y, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(bottom.y, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn respects_sphere_center() {
        let center = Vec3::new(10.0, -4.0, 2.0);

        assert_eq!(
            point_to_uv(center + Vec3::Z * 5.0, center),
            point_to_uv(Vec3::Z, Vec3::ZERO)
        );
    }

    #[test]
    fn center_itself_maps_to_image_middle() {
        assert_eq!(point_to_uv(Vec3::ZERO, Vec3::ZERO), Vec2::new(0.5, 0.5));
    }
}

use std::f32::consts::PI;

use glam::Vec3;

use super::error::GlobeError;

/// Spreads points over a sphere along a phyllotaxis spiral.
///
/// The polar angle walks `acos(-1 + 2i/n)` from the south pole to the north pole while the
/// azimuth winds `sqrt(n * pi)` times faster, which keeps neighbouring points roughly the
/// same distance apart at any count. Sampling is a pure function of `(i, n, radius)`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SphereSampler {
    count: u32,
    radius: f32,
}

impl SphereSampler {
    pub fn new(count: u32, radius: f32) -> Result<Self, GlobeError> {
        if radius.is_nan() || radius <= 0.0 {
            return Err(GlobeError::InvalidRadius(radius));
        }

        Ok(Self { count, radius })
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Position of the `i`-th point. `i` is expected to be below `count`.
    pub fn point(&self, i: u32) -> Vec3 {
        let n = self.count as f32;
        let phi = (-1.0 + 2.0 * i as f32 / n).acos();
        let theta = (n * PI).sqrt() * phi;

        from_spherical_coords(self.radius, phi, theta)
    }

    pub fn points(&self) -> impl ExactSizeIterator<Item = Vec3> + '_ {
        (0..self.count).map(|i| self.point(i))
    }
}

// y is the polar axis
pub fn from_spherical_coords(radius: f32, phi: f32, theta: f32) -> Vec3 {
    let sin_phi_radius = phi.sin() * radius;

    Vec3::new(
        sin_phi_radius * theta.sin(),
        phi.cos() * radius,
        sin_phi_radius * theta.cos(),
    )
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(1, 1.0)]
    #[case(4, 600.0)]
    #[case(100, 2.5)]
    #[case(60_000, 600.0)]
    fn produces_requested_count_on_the_sphere(#[case] count: u32, #[case] radius: f32) {
        let sampler = SphereSampler::new(count, radius).unwrap();
        let points = sampler.points().collect::<Vec<_>>();

        assert_eq!(points.len(), count as usize);
        for point in points {
            assert_relative_eq!(point.length(), radius, max_relative = 1e-4);
        }
    }

    #[test]
    fn zero_count_is_empty() {
        let sampler = SphereSampler::new(0, 600.0).unwrap();

        assert_eq!(sampler.points().count(), 0);
    }

    #[rstest]
    #[case(0.0)]
    #[case(-1.0)]
    #[case(f32::NAN)]
    fn rejects_non_positive_radius(#[case] radius: f32) {
        assert!(matches!(
            SphereSampler::new(10, radius),
            Err(GlobeError::InvalidRadius(_))
        ));
    }

    #[test]
    fn sampling_is_repeatable() {
        let first = SphereSampler::new(500, 10.0).unwrap().points().collect::<Vec<_>>();
        let second = SphereSampler::new(500, 10.0).unwrap().points().collect::<Vec<_>>();

        assert_eq!(first, second);
    }

    #[test]
    fn first_point_sits_on_the_south_pole() {
        let sampler = SphereSampler::new(8, 3.0).unwrap();
        let first = sampler.point(0);

        assert_relative_eq!(first.y, -3.0, epsilon = 1e-5);
        assert_relative_eq!(first.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(first.z, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn covers_both_hemispheres_evenly() {
        let sampler = SphereSampler::new(1000, 1.0).unwrap();
        let north = sampler.points().filter(|p| p.y > 0.0).count();
        let south = sampler.points().filter(|p| p.y < 0.0).count();

        assert!(north.abs_diff(south) <= 2, "north {north}, south {south}");
    }
}

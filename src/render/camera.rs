use glam::{Mat4, Vec3};

use crate::common::settings::Settings;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    up: Vec3,
    // degrees
    fov_y: f32,
    near: f32,
    far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl Camera {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            eye: Vec3::from_array(settings.camera_position),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_y: settings.camera_fov,
            near: settings.camera_near,
            far: settings.camera_far,
        }
    }

    pub fn get_view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn build_view_proj_matrix(&self, aspect_ratio: f32) -> Mat4 {
        let proj = Mat4::perspective_rh(self.fov_y.to_radians(), aspect_ratio, self.near, self.far);

        proj * self.get_view()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn globe_center_lands_mid_screen() {
        let camera = Camera::default();
        let clip = camera.build_view_proj_matrix(4.0 / 3.0).project_point3(Vec3::ZERO);

        assert_abs_diff_eq!(clip.x, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(clip.y, 0.0, epsilon = 1e-6);
        assert!((0.0..1.0).contains(&clip.z));
    }

    #[test]
    fn near_side_is_closer_than_far_side() {
        let camera = Camera::default();
        let view_proj = camera.build_view_proj_matrix(1.0);

        let front = view_proj.project_point3(Vec3::new(0.0, 0.0, 600.0));
        let back = view_proj.project_point3(Vec3::new(0.0, 0.0, -600.0));

        assert!(front.z < back.z);
        assert!(back.z < 1.0);
    }

    #[test]
    fn whole_globe_fits_the_view() {
        let camera = Camera::default();
        let view_proj = camera.build_view_proj_matrix(1.0);

        for edge in [Vec3::X, Vec3::NEG_X, Vec3::Y, Vec3::NEG_Y] {
            let clip = view_proj.project_point3(edge * 600.0);
            assert!(clip.x.abs() <= 1.0 && clip.y.abs() <= 1.0);
        }
    }
}

use glam::{Mat4, Vec3, Vec4};

use crate::common::settings::{Settings, rgb_from_hex};

use super::camera::Camera;

/// Vertex of the earth sphere.
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
}

impl Vertex {
    const ATTRIBS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        // position
        0 => Float32x3,
        // normal
        1 => Float32x3
    ];

    pub fn new(position: Vec3, normal: Vec3) -> Self {
        Self { position, normal }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// Layouts of the two parallel dot buffers: positions in slot 0, per-vertex phase in slot 1.
pub struct DotVertex;

impl DotVertex {
    const POSITION_ATTRIBS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![
        0 => Float32x3
    ];

    const DISPLACEMENT_ATTRIBS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![
        1 => Float32
    ];

    pub fn position_desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: (3 * std::mem::size_of::<f32>()) as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::POSITION_ATTRIBS,
        }
    }

    pub fn displacement_desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<f32>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::DISPLACEMENT_ATTRIBS,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct DotUniforms {
    view_proj: Mat4,
    model: Mat4,
    color_a: Vec4,
    color_b: Vec4,
    time: f32,
    _padding: [f32; 3],
}

impl DotUniforms {
    pub fn new(camera: &Camera, aspect_ratio: f32, settings: &Settings) -> Self {
        Self {
            view_proj: camera.build_view_proj_matrix(aspect_ratio),
            model: Mat4::IDENTITY,
            color_a: Vec3::from_array(settings.color_a).extend(1.0),
            color_b: Vec3::from_array(settings.color_b).extend(1.0),
            time: 0.0,
            _padding: [0.0; 3],
        }
    }

    pub fn update_projection(&mut self, camera: &Camera, aspect_ratio: f32) {
        self.view_proj = camera.build_view_proj_matrix(aspect_ratio);
    }

    pub fn set_time(&mut self, time: f32) {
        self.time = time;
    }

    /// Whole-mesh rotation about +y.
    pub fn set_rotation(&mut self, angle: f32) {
        self.model = Mat4::from_rotation_y(angle);
    }

    pub fn model(&self) -> Mat4 {
        self.model
    }
}

#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct EarthUniforms {
    view_proj: Mat4,
    color: Vec4,
    ambient: Vec4,
    sun_position: Vec4,
    sun_color: Vec4,
    highlight_position: Vec4,
    highlight_color: Vec4,
}

fn light_color(hex: u32, intensity: f32) -> Vec4 {
    (Vec3::from_array(rgb_from_hex(hex)) * intensity).extend(1.0)
}

impl EarthUniforms {
    pub fn new(camera: &Camera, aspect_ratio: f32, settings: &Settings) -> Self {
        Self {
            view_proj: camera.build_view_proj_matrix(aspect_ratio),
            color: Vec3::from_array(rgb_from_hex(settings.earth_color))
                .extend(settings.earth_opacity),
            ambient: light_color(settings.ambient_light_color, settings.ambient_light_intensity),
            sun_position: Vec3::from_array(settings.sun_position).extend(1.0),
            sun_color: light_color(settings.sun_color, settings.sun_intensity),
            highlight_position: Vec3::from_array(settings.highlight_position).extend(1.0),
            highlight_color: light_color(settings.highlight_color, settings.highlight_intensity),
        }
    }

    pub fn update_projection(&mut self, camera: &Camera, aspect_ratio: f32) {
        self.view_proj = camera.build_view_proj_matrix(aspect_ratio);
    }
}

use std::sync::Arc;

use color_eyre::Result;
use winit::{dpi::PhysicalSize, window::Window};

use crate::{
    common::{
        data::Size,
        settings::{Settings, rgb_from_hex},
    },
    globe::{
        animation::{FrameScheduler, FrameTarget},
        dots::DotMesh,
    },
};

use super::{
    buffer::{DotBuffers, IndexedBuffers},
    camera::Camera,
    data::{DotUniforms, EarthUniforms},
    geometry::generate_sphere,
    pipeline::Pipeline,
    texture::Texture,
};

/// Owns the wgpu primitives and draws the dots and the earth sphere.
pub struct RenderEngine {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    size: PhysicalSize<u32>,
    camera: Camera,
    clear_color: wgpu::Color,
    dots_pipeline: Pipeline,
    earth_pipeline: Pipeline,
    dot_uniforms: DotUniforms,
    earth_uniforms: EarthUniforms,
    dots: Option<DotBuffers>,
    earth: IndexedBuffers,
    sample_count: u32,
    depth_texture: Texture,
    // None when rendering single-sampled
    msaa_texture: Option<Texture>,
}

fn create_render_targets(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    sample_count: u32,
) -> (Texture, Option<Texture>) {
    let size = (config.width, config.height);
    let depth_texture = Texture::create_depth_texture(device, size, sample_count, "depth texture");
    let msaa_texture = (sample_count > 1).then(|| {
        Texture::create_multisampled_texture(
            device,
            config.format,
            size,
            sample_count,
            "multisampled color texture",
        )
    });

    (depth_texture, msaa_texture)
}

impl RenderEngine {
    pub async fn new(window: Arc<Window>, settings: &Settings, mesh: &DotMesh) -> Result<Self> {
        let size = window.inner_size();
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });
        let surface = instance.create_surface(window.clone())?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
                experimental_features: Default::default(),
            })
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);

        // colors are given in display space, so skip the srgb conversion when possible
        let format = {
            let mut format = surface_caps.formats[0];
            let format_linear = format.remove_srgb_suffix();
            if surface_caps.formats.contains(&format_linear) {
                format = format_linear;
            }
            format
        };

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: surface_caps.present_modes[0],
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![format],
            desired_maximum_frame_latency: 2,
        };

        let aspect_ratio = Size::from(size).aspect_ratio();
        let camera = Camera::from_settings(settings);

        let dots = if mesh.is_empty() {
            log::info!("No land dots to draw");
            None
        } else {
            Some(DotBuffers::new(&device, mesh.positions(), mesh.attributes()))
        };

        let earth = IndexedBuffers::new(
            &device,
            "earth",
            &generate_sphere(
                settings.earth_radius,
                settings.earth_width_segments,
                settings.earth_height_segments,
            ),
        );

        let [r, g, b] = rgb_from_hex(settings.background_color).map(f64::from);

        let sample_count = settings.sample_count();
        let (depth_texture, msaa_texture) = create_render_targets(&device, &config, sample_count);

        log::info!(
            "Render engine ready with surface format {format:?}, {sample_count} sample(s) per pixel"
        );

        Ok(Self {
            window,
            surface,
            dots_pipeline: Pipeline::create_dots_pipeline(&device, format, sample_count),
            earth_pipeline: Pipeline::create_earth_pipeline(&device, format, sample_count),
            dot_uniforms: DotUniforms::new(&camera, aspect_ratio, settings),
            earth_uniforms: EarthUniforms::new(&camera, aspect_ratio, settings),
            device,
            queue,
            config,
            size,
            camera,
            clear_color: wgpu::Color { r, g, b, a: 1.0 },
            dots,
            earth,
            sample_count,
            depth_texture,
            msaa_texture,
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn window_handle(&self) -> Arc<Window> {
        Arc::clone(&self.window)
    }

    pub fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    /// Returns whether the surface could be configured for the new size.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) -> bool {
        if Size::from(new_size).is_empty() {
            return false;
        }

        self.size = new_size;
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
        (self.depth_texture, self.msaa_texture) =
            create_render_targets(&self.device, &self.config, self.sample_count);

        let aspect_ratio = Size::from(new_size).aspect_ratio();
        self.dot_uniforms
            .update_projection(&self.camera, aspect_ratio);
        self.earth_uniforms
            .update_projection(&self.camera, aspect_ratio);
        true
    }

    pub fn render(&mut self) -> std::result::Result<(), wgpu::SurfaceError> {
        self.queue.write_buffer(
            self.dots_pipeline.get_uniforms(),
            0,
            bytemuck::cast_slice(&[self.dot_uniforms]),
        );
        self.queue.write_buffer(
            self.earth_pipeline.get_uniforms(),
            0,
            bytemuck::cast_slice(&[self.earth_uniforms]),
        );

        let output = self.surface.get_current_texture()?;
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor {
            format: Some(self.config.format),
            ..Default::default()
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Globe Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: self.msaa_texture.as_ref().map_or(&view, Texture::get_view),
                    resolve_target: self.msaa_texture.as_ref().map(|_| &view),
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: self.depth_texture.get_view(),
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            if let Some(dots) = &self.dots {
                pass.set_pipeline(self.dots_pipeline.get_pipeline());
                pass.set_bind_group(0, self.dots_pipeline.get_uniform_bind_group(), &[]);
                pass.set_vertex_buffer(0, dots.positions.slice());
                pass.set_vertex_buffer(1, dots.attributes.slice());
                pass.draw(0..dots.vertex_count, 0..1);
            }

            pass.set_pipeline(self.earth_pipeline.get_pipeline());
            pass.set_bind_group(0, self.earth_pipeline.get_uniform_bind_group(), &[]);
            pass.set_vertex_buffer(0, self.earth.vertices.slice());
            pass.set_index_buffer(self.earth.indices.slice(), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(0..self.earth.index_count, 0, 0..1);
        }

        self.queue.submit(Some(encoder.finish()));
        self.window.pre_present_notify();
        output.present();

        Ok(())
    }
}

impl FrameTarget for RenderEngine {
    type Error = wgpu::SurfaceError;

    fn set_time(&mut self, time: f32) {
        self.dot_uniforms.set_time(time);
    }

    fn set_rotation(&mut self, angle: f32) {
        self.dot_uniforms.set_rotation(angle);
    }

    fn redraw(&mut self) -> std::result::Result<(), Self::Error> {
        self.render()
    }
}

impl FrameScheduler for Arc<Window> {
    fn request_frame(&mut self) {
        self.request_redraw();
    }
}

use wgpu::TextureView;

pub struct Texture {
    _texture: wgpu::Texture,
    view: TextureView,
}

impl Texture {
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    pub fn get_view(&self) -> &TextureView {
        &self.view
    }

    fn create_attachment(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        (width, height): (u32, u32),
        sample_count: u32,
        label: &str,
    ) -> Self {
        let size = wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        };
        let desc = wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        };
        let texture = device.create_texture(&desc);
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            _texture: texture,
            view,
        }
    }

    pub fn create_depth_texture(
        device: &wgpu::Device,
        size: (u32, u32),
        sample_count: u32,
        label: &str,
    ) -> Self {
        Self::create_attachment(device, Self::DEPTH_FORMAT, size, sample_count, label)
    }

    /// Color target that gets resolved into the surface texture.
    pub fn create_multisampled_texture(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        size: (u32, u32),
        sample_count: u32,
        label: &str,
    ) -> Self {
        Self::create_attachment(device, format, size, sample_count, label)
    }
}

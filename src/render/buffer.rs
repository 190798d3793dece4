use wgpu::util::DeviceExt;

pub struct Buffer {
    pub raw: wgpu::Buffer,
}

impl Buffer {
    pub fn new_init(
        device: &wgpu::Device,
        label: &'static str,
        data: &[u8],
        usage: wgpu::BufferUsages,
    ) -> Self {
        Self {
            raw: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: data,
                usage,
            }),
        }
    }

    pub fn slice(&self) -> wgpu::BufferSlice<'_> {
        self.raw.slice(..)
    }
}

/// Vertex buffers of the dot mesh, positions and per-vertex phases side by side.
pub struct DotBuffers {
    pub positions: Buffer,
    pub attributes: Buffer,
    pub vertex_count: u32,
}

impl DotBuffers {
    pub fn new(device: &wgpu::Device, positions: &[f32], attributes: &[f32]) -> Self {
        Self {
            positions: Buffer::new_init(
                device,
                "dot positions",
                bytemuck::cast_slice(positions),
                wgpu::BufferUsages::VERTEX,
            ),
            attributes: Buffer::new_init(
                device,
                "dot displacements",
                bytemuck::cast_slice(attributes),
                wgpu::BufferUsages::VERTEX,
            ),
            vertex_count: attributes.len() as u32,
        }
    }
}

pub struct IndexedBuffers {
    pub vertices: Buffer,
    pub indices: Buffer,
    pub index_count: u32,
}

impl IndexedBuffers {
    pub fn new(device: &wgpu::Device, label: &'static str, mesh: &super::geometry::Mesh) -> Self {
        Self {
            vertices: Buffer::new_init(
                device,
                label,
                bytemuck::cast_slice(&mesh.vertices),
                wgpu::BufferUsages::VERTEX,
            ),
            indices: Buffer::new_init(
                device,
                label,
                bytemuck::cast_slice(&mesh.indices),
                wgpu::BufferUsages::INDEX,
            ),
            index_count: mesh.indices.len() as u32,
        }
    }
}

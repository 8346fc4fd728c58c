use crate::error::RenderError;
use crate::shaders::ShaderSources;
use armview_common::{BoxDimensions, VertexRange};
use armview_render::mesh::{MeshData, Vec4Data};
use armview_render::{Renderer, box_model_view};
use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct MatrixUniform {
    matrix: [[f32; 4]; 4],
}

impl MatrixUniform {
    fn new(m: Mat4) -> Self {
        Self {
            matrix: m.to_cols_array_2d(),
        }
    }
}

const MATRIX_SIZE: u64 = std::mem::size_of::<MatrixUniform>() as u64;
const VERTEX_STRIDE: u64 = std::mem::size_of::<Vec4Data>() as u64;
const INITIAL_DRAW_CAPACITY: u32 = 16;

/// Round `size` up to the next multiple of `alignment` (treated as at least 1).
fn aligned_stride(size: u64, alignment: u64) -> u64 {
    let alignment = alignment.max(1);
    size.div_ceil(alignment) * alignment
}

/// A draw recorded between `begin_frame` and `finish_frame`.
#[derive(Debug, Clone, Copy)]
struct PendingDraw {
    model_view: Mat4,
    range: VertexRange,
}

/// wgpu renderer for the shared box mesh.
///
/// Owns one position buffer and one color buffer for every packed object,
/// a projection uniform, and a dynamic-offset uniform buffer holding one
/// model-view matrix per draw. Draws are recorded by the [`Renderer`] calls
/// and encoded into a single pass by [`WgpuRenderer::finish_frame`].
pub struct WgpuRenderer {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
    projection_buffer: wgpu::Buffer,
    model_view_buffer: wgpu::Buffer,
    model_view_stride: u64,
    model_view_capacity: u32,
    position_buffer: wgpu::Buffer,
    color_buffer: wgpu::Buffer,
    vertex_count: u32,
    depth_texture: wgpu::TextureView,
    clear_color: wgpu::Color,
    projection: Mat4,
    view: Mat4,
    pending: Vec<PendingDraw>,
}

impl WgpuRenderer {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        mesh: &MeshData,
        shaders: &ShaderSources,
        clear_color: [f64; 4],
    ) -> Result<Self, RenderError> {
        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let projection_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("projection_buffer"),
            contents: bytemuck::bytes_of(&MatrixUniform::new(Mat4::IDENTITY)),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let model_view_stride = aligned_stride(
            MATRIX_SIZE,
            device.limits().min_uniform_buffer_offset_alignment as u64,
        );
        let model_view_capacity = INITIAL_DRAW_CAPACITY;
        let model_view_buffer =
            Self::create_model_view_buffer(device, model_view_stride, model_view_capacity);

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("matrices_bind_group_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: true,
                        min_binding_size: wgpu::BufferSize::new(MATRIX_SIZE),
                    },
                    count: None,
                },
            ],
        });

        let bind_group = Self::create_bind_group(
            device,
            &bind_group_layout,
            &projection_buffer,
            &model_view_buffer,
        );

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("box_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let vertex_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("box_vertex_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders.vertex.as_str().into()),
        });
        let fragment_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("box_fragment_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders.fragment.as_str().into()),
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("box_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &vertex_shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[
                    wgpu::VertexBufferLayout {
                        array_stride: VERTEX_STRIDE,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &wgpu::vertex_attr_array![0 => Float32x4],
                    },
                    wgpu::VertexBufferLayout {
                        array_stride: VERTEX_STRIDE,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &wgpu::vertex_attr_array![1 => Float32x4],
                    },
                ],
            },
            fragment: Some(wgpu::FragmentState {
                module: &fragment_shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: wgpu::TextureFormat::Depth32Float,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            return Err(RenderError::Pipeline(err.to_string()));
        }

        let position_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("position_buffer"),
            contents: bytemuck::cast_slice(&mesh.positions),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let color_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("color_buffer"),
            contents: bytemuck::cast_slice(&mesh.colors),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let vertex_count = mesh.vertex_count().min(mesh.colors.len() as u32);

        let depth_texture = Self::create_depth_texture(device, width, height);
        let [r, g, b, a] = clear_color;

        tracing::debug!(
            "box renderer ready: {vertex_count} vertices, model-view stride {model_view_stride}"
        );

        Ok(Self {
            pipeline,
            bind_group_layout,
            bind_group,
            projection_buffer,
            model_view_buffer,
            model_view_stride,
            model_view_capacity,
            position_buffer,
            color_buffer,
            vertex_count,
            depth_texture,
            clear_color: wgpu::Color { r, g, b, a },
            projection: Mat4::IDENTITY,
            view: Mat4::IDENTITY,
            pending: Vec::new(),
        })
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_texture = Self::create_depth_texture(device, width, height);
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    /// Draws recorded for the current frame.
    pub fn pending_draws(&self) -> usize {
        self.pending.len()
    }

    /// Upload this frame's matrices and encode one clearing pass over every recorded draw.
    pub fn finish_frame(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, target: &wgpu::TextureView) {
        self.ensure_capacity(device, self.pending.len() as u32);

        queue.write_buffer(
            &self.projection_buffer,
            0,
            bytemuck::bytes_of(&MatrixUniform::new(self.projection)),
        );

        if !self.pending.is_empty() {
            let stride = self.model_view_stride as usize;
            let mut bytes = vec![0u8; stride * self.pending.len()];
            for (i, draw) in self.pending.iter().enumerate() {
                let uniform = MatrixUniform::new(draw.model_view);
                let start = i * stride;
                bytes[start..start + MATRIX_SIZE as usize]
                    .copy_from_slice(bytemuck::bytes_of(&uniform));
            }
            queue.write_buffer(&self.model_view_buffer, 0, &bytes);
        }

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("box_encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("box_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            pass.set_pipeline(&self.pipeline);
            pass.set_vertex_buffer(0, self.position_buffer.slice(..));
            pass.set_vertex_buffer(1, self.color_buffer.slice(..));
            for (i, draw) in self.pending.iter().enumerate() {
                let offset = (i as u64 * self.model_view_stride) as wgpu::DynamicOffset;
                pass.set_bind_group(0, &self.bind_group, &[offset]);
                pass.draw(draw.range.as_range(), 0..1);
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
        self.pending.clear();
    }

    fn ensure_capacity(&mut self, device: &wgpu::Device, draws: u32) {
        if draws <= self.model_view_capacity {
            return;
        }
        let capacity = draws.next_power_of_two();
        tracing::debug!(
            "growing model-view buffer from {} to {capacity} draws",
            self.model_view_capacity
        );
        self.model_view_buffer =
            Self::create_model_view_buffer(device, self.model_view_stride, capacity);
        self.bind_group = Self::create_bind_group(
            device,
            &self.bind_group_layout,
            &self.projection_buffer,
            &self.model_view_buffer,
        );
        self.model_view_capacity = capacity;
    }

    fn create_model_view_buffer(device: &wgpu::Device, stride: u64, capacity: u32) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("model_view_buffer"),
            size: stride * capacity as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    fn create_bind_group(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        projection: &wgpu::Buffer,
        model_view: &wgpu::Buffer,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("matrices_bind_group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: projection.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                        buffer: model_view,
                        offset: 0,
                        size: wgpu::BufferSize::new(MATRIX_SIZE),
                    }),
                },
            ],
        })
    }

    fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth_texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Depth32Float,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&Default::default())
    }
}

impl Renderer for WgpuRenderer {
    fn begin_frame(&mut self, projection: Mat4, view: Mat4) {
        self.projection = projection;
        self.view = view;
        self.pending.clear();
    }

    fn draw_box(&mut self, model: Mat4, dims: BoxDimensions, range: VertexRange) {
        if !range_fits(range, self.vertex_count) {
            tracing::warn!(
                "skipping draw of vertices {}..{}: mesh has {}",
                range.offset,
                range.end(),
                self.vertex_count
            );
            return;
        }
        self.pending.push(PendingDraw {
            model_view: box_model_view(self.view, model, dims),
            range,
        });
    }
}

/// A drawable range is non-empty and lies inside the mesh.
fn range_fits(range: VertexRange, vertex_count: u32) -> bool {
    range.count > 0 && range.offset.checked_add(range.count).is_some_and(|end| end <= vertex_count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stride_rounds_up_to_alignment() {
        assert_eq!(aligned_stride(64, 256), 256);
        assert_eq!(aligned_stride(64, 64), 64);
        assert_eq!(aligned_stride(300, 256), 512);
        assert_eq!(aligned_stride(64, 0), 64);
    }

    #[test]
    fn matrix_uniform_is_column_major_64_bytes() {
        assert_eq!(MATRIX_SIZE, 64);
        let m = Mat4::from_translation(glam::Vec3::new(1.0, 2.0, 3.0));
        let u = MatrixUniform::new(m);
        assert_eq!(u.matrix[3], [1.0, 2.0, 3.0, 1.0]);
    }

    #[test]
    fn ranges_must_lie_inside_mesh() {
        assert!(range_fits(VertexRange::UNIT_CUBE, 36));
        assert!(range_fits(VertexRange::new(36, 36), 72));
        assert!(!range_fits(VertexRange::new(36, 36), 36));
        assert!(!range_fits(VertexRange::new(0, 0), 36));
        assert!(!range_fits(VertexRange::new(u32::MAX, 2), u32::MAX));
    }
}

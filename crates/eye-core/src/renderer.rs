use crate::canvas::DrawList;

/// Most ellipses one frame can carry to the GPU.
pub const MAX_ELLIPSES: usize = 32;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GpuEllipse {
    pub center: [f32; 2],
    pub radii: [f32; 2],
    pub color: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CanvasUniforms {
    pub bg_color: [f32; 4],
    pub screen_size: [f32; 2],
    pub count: u32,
    pub _pad: u32,
    pub ellipses: [GpuEllipse; MAX_ELLIPSES],
}

impl CanvasUniforms {
    /// Pack the visible part of a draw list. Overflow is dropped with a warning.
    pub fn from_draw_list(list: &DrawList, screen_size: (u32, u32)) -> Self {
        let bg = list.background().unwrap_or([0.0, 0.0, 0.0]);
        let mut uniforms = Self {
            bg_color: [bg[0], bg[1], bg[2], 1.0],
            screen_size: [screen_size.0 as f32, screen_size.1 as f32],
            count: 0,
            _pad: 0,
            ellipses: [bytemuck::Zeroable::zeroed(); MAX_ELLIPSES],
        };

        let mut dropped = 0usize;
        for e in list.visible_ellipses() {
            let slot = uniforms.count as usize;
            if slot == MAX_ELLIPSES {
                dropped += 1;
                continue;
            }
            uniforms.ellipses[slot] = GpuEllipse {
                center: e.center,
                radii: e.radii,
                color: [e.color[0], e.color[1], e.color[2], 1.0],
            };
            uniforms.count += 1;
        }
        if dropped > 0 {
            log::warn!("dropped {dropped} ellipses past the limit of {MAX_ELLIPSES}");
        }
        uniforms
    }
}

pub struct EyeRenderer {
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl EyeRenderer {
    pub fn new(device: &wgpu::Device, target_format: wgpu::TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("eyes_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/eyes.wgsl").into()),
        });

        let bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("eyes_bind_group_layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("eyes_uniform_buffer"),
            size: std::mem::size_of::<CanvasUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("eyes_bind_group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("eyes_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("eyes_render_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: target_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Self {
            pipeline,
            uniform_buffer,
            bind_group,
        }
    }

    /// Upload a frame's draw list. Call before [`EyeRenderer::draw`].
    pub fn prepare(&self, queue: &wgpu::Queue, list: &DrawList, screen_size: (u32, u32)) {
        let uniforms = CanvasUniforms::from_draw_list(list, screen_size);
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));
    }

    /// Record the full-screen draw into an open pass.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.draw(0..3, 0..1);
    }
}

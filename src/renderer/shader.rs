use glam::Mat4;
use log::{debug, error};

use crate::error::{RenderError, ShaderStage};
use crate::renderer::geometry::wire_vertex_layout;
use crate::renderer::gpu::DEPTH_FORMAT;

pub const WIRE_SHADER: &str = include_str!("shaders.wgsl");

/// `@location` of the `vertex` position attribute.
pub const VERTEX_ATTRIBUTE_LOCATION: u32 = 0;
/// `@group(0) @binding(..)` of the uniform block.
pub const UNIFORM_BINDING: u32 = 0;

#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct WireUniforms {
    pub model_view_projection: [[f32; 4]; 4],
    pub color: [f32; 4],
}

pub const TRANSFORM_OFFSET: wgpu::BufferAddress =
    std::mem::offset_of!(WireUniforms, model_view_projection) as _;
pub const COLOR_OFFSET: wgpu::BufferAddress = std::mem::offset_of!(WireUniforms, color) as _;

/// Line strip pipeline plus the uniform block it reads.
pub struct ShaderProgram {
    pub name: &'static str,
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl ShaderProgram {
    pub fn build(
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        source: &str,
    ) -> Result<Self, RenderError> {
        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Wireframe Shader"),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });
        check_scope(device, ShaderStage::Compile)?;

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Wireframe Uniform Buffer"),
            size: std::mem::size_of::<WireUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Wireframe Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: UNIFORM_BINDING,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Wireframe Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: UNIFORM_BINDING,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Wireframe Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Wireframe Render Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[wire_vertex_layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: color_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::LineStrip,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });
        check_scope(device, ShaderStage::Link)?;

        let name = "Basic";
        debug!("built shader program '{name}'");

        Ok(Self {
            name,
            pipeline,
            uniform_buffer,
            bind_group,
        })
    }

    pub fn use_program(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
    }

    pub fn set_transform(&self, queue: &wgpu::Queue, transform: Mat4) {
        let cols = transform.to_cols_array_2d();
        queue.write_buffer(
            &self.uniform_buffer,
            TRANSFORM_OFFSET,
            bytemuck::cast_slice(&cols),
        );
    }

    pub fn set_color(&self, queue: &wgpu::Queue, color: [f32; 4]) {
        queue.write_buffer(&self.uniform_buffer, COLOR_OFFSET, bytemuck::cast_slice(&color));
    }
}

fn check_scope(device: &wgpu::Device, stage: ShaderStage) -> Result<(), RenderError> {
    match pollster::block_on(device.pop_error_scope()) {
        None => Ok(()),
        Some(err) => {
            let log = err.to_string();
            error!("shader {stage} failed: {log}");
            Err(RenderError::ShaderBuild { stage, log })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_block_matches_wgsl_layout() {
        assert_eq!(std::mem::size_of::<WireUniforms>(), 80);
        assert_eq!(TRANSFORM_OFFSET, 0);
        assert_eq!(COLOR_OFFSET, 64);
    }

    #[test]
    fn source_declares_the_bound_names() {
        assert!(WIRE_SHADER.contains("ModelViewProjectionMatrix: mat4x4<f32>"));
        assert!(WIRE_SHADER.contains("color: vec4<f32>"));
        assert!(WIRE_SHADER.contains(&format!(
            "@location({VERTEX_ATTRIBUTE_LOCATION}) vertex: vec3<f32>"
        )));
        assert!(WIRE_SHADER.contains(&format!("@binding({UNIFORM_BINDING})")));
    }

    #[test]
    fn transform_columns_cast_to_sixteen_floats() {
        let cols = Mat4::from_translation(glam::Vec3::new(1.0, 2.0, 3.0)).to_cols_array_2d();
        let flat: &[f32] = bytemuck::cast_slice(&cols);
        assert_eq!(flat.len(), 16);
        assert_eq!(&flat[12..15], &[1.0, 2.0, 3.0]);
    }
}

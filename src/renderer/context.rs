use std::sync::Arc;

use crossbeam::channel::Sender;
use log::{debug, info, warn};
use winit::window::Window;

use crate::config::AppConfig;
use crate::error::RenderError;
use crate::math::{MeshStats, tessellate};
use crate::renderer::geometry::GeometryBuffer;
use crate::renderer::gpu::GpuState;
use crate::renderer::shader::{ShaderProgram, WIRE_SHADER};
use crate::renderer::trackball::{RedrawRequest, Trackball};
use crate::renderer::transform::{WIRE_COLOR, model_view_projection};
use crate::renderer::viewport::{DrawableSurface, Viewport};

/// Whether a `render` call reached the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    Presented,
    /// No frame was acquired; the caller must ask for another redraw.
    Skipped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Recovery {
    Reconfigure,
    Retry,
}

/// How to get past a failed frame acquisition. Out of memory is terminal.
fn recovery_for(err: wgpu::SurfaceError) -> Result<Recovery, RenderError> {
    match err {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => Ok(Recovery::Reconfigure),
        wgpu::SurfaceError::Timeout => Ok(Recovery::Retry),
        wgpu::SurfaceError::OutOfMemory => Err(RenderError::SurfaceOutOfMemory),
    }
}

/// Everything the render loop touches, created once at startup.
pub struct RenderContext {
    pub gpu: GpuState,
    pub geometry: GeometryBuffer<wgpu::Buffer>,
    pub program: ShaderProgram,
    pub viewport: Viewport,
    pub trackball: Trackball,
    pub mesh_stats: MeshStats,
    pub resolution: (usize, usize),
}

impl RenderContext {
    pub fn new(
        window: Arc<Window>,
        config: &AppConfig,
        redraw: Sender<RedrawRequest>,
    ) -> Result<Self, RenderError> {
        let gpu = pollster::block_on(GpuState::new(window, config.render.vsync))?;
        let program = ShaderProgram::build(&gpu.device, gpu.config.format, WIRE_SHADER)?;
        info!("shader program '{}' ready", program.name);

        let (steps_u, steps_v) = (config.surface.steps_u, config.surface.steps_v);
        let mesh = tessellate(steps_u, steps_v);
        let mesh_stats = mesh.stats();
        info!(
            "tessellated surface at {steps_u}x{steps_v}: {} vertices, {} polylines",
            mesh_stats.vertex_count, mesh_stats.polyline_count
        );

        let mut geometry = GeometryBuffer::new();
        geometry.upload(&gpu.device, &mesh.into_vertices())?;
        debug!("uploaded {} vertices to the wireframe buffer", geometry.count());

        let mut viewport = Viewport::new();
        viewport.mark_applied(gpu.size);

        Ok(Self {
            gpu,
            geometry,
            program,
            viewport,
            trackball: Trackball::new(0.0, redraw),
            mesh_stats,
            resolution: (steps_u, steps_v),
        })
    }

    /// Draws one frame of the wireframe, then lets `overlay` record extra
    /// passes into the same encoder before submission.
    pub fn render<F>(
        &mut self,
        surface: &impl DrawableSurface,
        overlay: F,
    ) -> Result<FrameStatus, RenderError>
    where
        F: FnOnce(&GpuState, &mut wgpu::CommandEncoder, &wgpu::TextureView),
    {
        if let Some(size) = self.viewport.resync(surface) {
            self.gpu.resize(size);
        }

        let transform = model_view_projection(self.trackball.view_matrix());

        let output = match self.gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(err) => {
                match recovery_for(err)? {
                    Recovery::Reconfigure => {
                        warn!("surface lost or outdated, reconfiguring");
                        self.gpu.reconfigure();
                    }
                    Recovery::Retry => warn!("timed out acquiring the next frame"),
                }
                return Ok(FrameStatus::Skipped);
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.program.set_transform(&self.gpu.queue, transform);
        self.program.set_color(&self.gpu.queue, WIRE_COLOR);

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Wireframe Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.gpu.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.program.use_program(&mut render_pass);
            self.geometry.draw(&mut render_pass);
        }

        overlay(&self.gpu, &mut encoder, &view);

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(FrameStatus::Presented)
    }
}

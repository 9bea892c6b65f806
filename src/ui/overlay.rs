use egui::{Color32, Context, RichText};
use winit::event::WindowEvent;
use winit::window::Window;

use crate::math::MeshStats;
use crate::renderer::GpuState;
use crate::ui::theme::{ACCENT_PURPLE, TEXT_MUTED, apply_theme};

/// Values shown in the help overlay for the current frame.
pub struct OverlayInfo {
    pub stats: MeshStats,
    pub resolution: (usize, usize),
    pub dragging: bool,
}

/// egui help panel painted on top of the wireframe.
pub struct Overlay {
    ctx: Context,
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
    visible: bool,
}

impl Overlay {
    pub fn new(window: &Window, gpu: &GpuState, visible: bool) -> Self {
        let ctx = Context::default();
        apply_theme(&ctx);

        let state = egui_winit::State::new(
            ctx.clone(),
            ctx.viewport_id(),
            window,
            Some(window.scale_factor() as f32),
            None,
            Some(2048),
        );

        let renderer = egui_wgpu::Renderer::new(&gpu.device, gpu.config.format, None, 1, false);

        Self {
            ctx,
            state,
            renderer,
            visible,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    pub fn on_window_event(
        &mut self,
        window: &Window,
        event: &WindowEvent,
    ) -> egui_winit::EventResponse {
        self.state.on_window_event(window, event)
    }

    pub fn paint(
        &mut self,
        window: &Window,
        gpu: &GpuState,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        info: &OverlayInfo,
    ) {
        let raw_input = self.state.take_egui_input(window);
        let full_output = self.ctx.run(raw_input, |ctx| draw_help_overlay(ctx, info));

        self.state
            .handle_platform_output(window, full_output.platform_output);

        let paint_jobs = self
            .ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [gpu.config.width, gpu.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, delta) in full_output.textures_delta.set {
            self.renderer
                .update_texture(&gpu.device, &gpu.queue, id, &delta);
        }

        self.renderer.update_buffers(
            &gpu.device,
            &gpu.queue,
            encoder,
            &paint_jobs,
            &screen_descriptor,
        );

        {
            let render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("egui Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            let mut render_pass = render_pass.forget_lifetime();
            self.renderer
                .render(&mut render_pass, &paint_jobs, &screen_descriptor);
        }

        for id in full_output.textures_delta.free {
            self.renderer.free_texture(&id);
        }
    }
}

fn draw_help_overlay(ctx: &Context, info: &OverlayInfo) {
    egui::Area::new(egui::Id::new("help_overlay"))
        .anchor(egui::Align2::LEFT_BOTTOM, egui::vec2(12.0, -12.0))
        .show(ctx, |ui| {
            egui::Frame::default()
                .fill(Color32::from_black_alpha(180))
                .rounding(6.0)
                .inner_margin(10.0)
                .show(ui, |ui| {
                    ui.style_mut().override_font_id =
                        Some(egui::FontId::new(11.0, egui::FontFamily::Monospace));

                    let drag_color = if info.dragging { ACCENT_PURPLE } else { TEXT_MUTED };
                    ui.label(RichText::new("LMB+Drag - Rotate | R - Reset | H - Hide").color(drag_color));
                    ui.label(RichText::new(stats_line(info)).color(TEXT_MUTED));
                });
        });
}

fn stats_line(info: &OverlayInfo) -> String {
    format!(
        "Steps: {}x{} | Vertices: {} | Polylines: {}",
        info.resolution.0, info.resolution.1, info.stats.vertex_count, info.stats.polyline_count
    )
}

//! wgpu presentation of a [`ShapeBatch`]
//!
//! One alpha-blended triangle-list pipeline. The batch is in canvas pixels;
//! vertices are moved to clip space on upload.

use glam::Vec2;
use wgpu::util::DeviceExt;

use super::batch::ShapeBatch;
use super::vertex::Vertex;
use crate::canvas_to_ndc;
use crate::surface::Color;

/// Vertices the buffer starts with before it first has to grow
const INITIAL_VERTEX_CAPACITY: u64 = 4096;

/// GPU objects for drawing rope frames onto the canvas
pub struct RenderState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    /// In vertices
    vertex_capacity: u64,
    /// Logical canvas size the drawing calls are expressed in
    canvas: Vec2,
}

impl RenderState {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
        canvas: Vec2,
    ) -> Result<Self, wgpu::RequestDeviceError> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("rope-swing-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        let caps = surface.get_capabilities(adapter);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: linear_format(&caps.formats),
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let pipeline = build_pipeline(&device, config.format);
        let vertex_buffer = vertex_buffer(&device, INITIAL_VERTEX_CAPACITY);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            vertex_buffer,
            vertex_capacity: INITIAL_VERTEX_CAPACITY,
            canvas,
        })
    }

    /// Backing store size in physical pixels
    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
    }

    /// Reconfigure after the surface was lost
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    /// Clear to the batch's background and draw its triangles
    pub fn render(&mut self, batch: &ShapeBatch) -> Result<(), wgpu::SurfaceError> {
        let vertices = clip_space_vertices(batch, self.canvas);
        self.upload(&vertices);

        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("rope_frame"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("rope_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear_color(batch.clear_color())),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            if !vertices.is_empty() {
                pass.set_pipeline(&self.pipeline);
                pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
                pass.draw(0..vertices.len() as u32, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }

    /// Write vertices into the shared buffer, doubling it when too small
    fn upload(&mut self, vertices: &[Vertex]) {
        if vertices.is_empty() {
            return;
        }
        let needed = vertices.len() as u64;
        if needed > self.vertex_capacity {
            self.vertex_capacity = needed.next_power_of_two();
            self.vertex_buffer = vertex_buffer(&self.device, self.vertex_capacity);
            log::debug!("Vertex buffer grown to {} vertices", self.vertex_capacity);
        }
        self.queue
            .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(vertices));
    }
}

/// Prefer a non-sRGB format so colors land as written
fn linear_format(formats: &[wgpu::TextureFormat]) -> wgpu::TextureFormat {
    formats
        .iter()
        .copied()
        .find(|f| !f.is_srgb())
        .or_else(|| formats.first().copied())
        .unwrap_or(wgpu::TextureFormat::Bgra8Unorm)
}

fn vertex_buffer(device: &wgpu::Device, capacity: u64) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("rope_vertices"),
        size: capacity * std::mem::size_of::<Vertex>() as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn build_pipeline(device: &wgpu::Device, format: wgpu::TextureFormat) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("rope_shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
    });
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("rope_layout"),
        bind_group_layouts: &[],
        immediate_size: 0,
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("rope_pipeline"),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[Vertex::desc()],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        // Tessellated shapes mix windings
        primitive: wgpu::PrimitiveState {
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    })
}

/// Batch vertices mapped from canvas pixels into clip space
fn clip_space_vertices(batch: &ShapeBatch, canvas: Vec2) -> Vec<Vertex> {
    batch
        .vertices()
        .iter()
        .map(|v| {
            let p = canvas_to_ndc(Vec2::from(v.position), canvas);
            Vertex::new(p.x, p.y, v.color)
        })
        .collect()
}

fn clear_color([r, g, b, a]: Color) -> wgpu::Color {
    wgpu::Color {
        r: r as f64,
        g: g as f64,
        b: b as f64,
        a: a as f64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawSurface, gray};

    #[test]
    fn test_clip_space_vertices_span_canvas() {
        let mut batch = ShapeBatch::new();
        batch.rect(Vec2::ZERO, Vec2::new(800.0, 800.0), gray(0));

        let vertices = clip_space_vertices(&batch, Vec2::new(800.0, 800.0));
        assert_eq!(vertices.len(), batch.vertices().len());
        assert!(vertices.contains(&Vertex::new(-1.0, 1.0, gray(0))));
        assert!(vertices.contains(&Vertex::new(1.0, -1.0, gray(0))));
    }

    #[test]
    fn test_clear_color_widens_channels() {
        let color = clear_color([0.5, 0.25, 1.0, 1.0]);
        assert_eq!((color.r, color.g, color.b, color.a), (0.5, 0.25, 1.0, 1.0));
    }

    #[test]
    fn test_linear_format_skips_srgb() {
        use wgpu::TextureFormat::*;
        assert_eq!(linear_format(&[Bgra8UnormSrgb, Rgba8Unorm]), Rgba8Unorm);
        assert_eq!(linear_format(&[Rgba8UnormSrgb]), Rgba8UnormSrgb);
        assert_eq!(linear_format(&[]), Bgra8Unorm);
    }
}

use std::ops::Range;

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::error::RenderError;
use crate::renderer::shader::VERTEX_ATTRIBUTE_LOCATION;

pub const VERTEX_SLOT: u32 = 0;

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct WireVertex {
    pub position: [f32; 3],
}

/// Creates device-side vertex storage.
pub trait VertexStorage {
    type Buffer;

    fn create_vertex_buffer(&self, label: &str, contents: &[u8]) -> Self::Buffer;
}

impl VertexStorage for wgpu::Device {
    type Buffer = wgpu::Buffer;

    fn create_vertex_buffer(&self, label: &str, contents: &[u8]) -> wgpu::Buffer {
        self.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents,
            usage: wgpu::BufferUsages::VERTEX,
        })
    }
}

/// The part of a render pass a line strip draw needs.
pub trait LineStripPass<B> {
    fn bind_vertex_buffer(&mut self, slot: u32, buffer: &B);
    fn draw_vertices(&mut self, vertices: Range<u32>);
}

impl LineStripPass<wgpu::Buffer> for wgpu::RenderPass<'_> {
    fn bind_vertex_buffer(&mut self, slot: u32, buffer: &wgpu::Buffer) {
        self.set_vertex_buffer(slot, buffer.slice(..));
    }

    fn draw_vertices(&mut self, vertices: Range<u32>) {
        self.draw(vertices, 0..1);
    }
}

/// Vertex buffer holding one break-separated line strip.
///
/// Break triples are uploaded like any other vertex; the rasterizer discards
/// the segments touching them.
pub struct GeometryBuffer<B> {
    buffer: Option<B>,
    count: u32,
}

impl<B> Default for GeometryBuffer<B> {
    fn default() -> Self {
        Self {
            buffer: None,
            count: 0,
        }
    }
}

impl<B> GeometryBuffer<B> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the stored vertices. On error the previous contents are kept.
    pub fn upload<S>(&mut self, storage: &S, vertices: &[f32]) -> Result<(), RenderError>
    where
        S: VertexStorage<Buffer = B>,
    {
        let count = draw_count(vertices.len())?;

        let buffer =
            storage.create_vertex_buffer("Wireframe Vertex Buffer", bytemuck::cast_slice(vertices));

        self.buffer = Some(buffer);
        self.count = count;
        Ok(())
    }

    pub fn draw<P>(&self, pass: &mut P)
    where
        P: LineStripPass<B>,
    {
        let Some(buffer) = &self.buffer else { return };

        pass.bind_vertex_buffer(VERTEX_SLOT, buffer);
        pass.draw_vertices(0..self.count);
    }

    pub fn count(&self) -> u32 {
        self.count
    }
}

/// Vertex count for `len` packed floats, checked against the draw range.
fn draw_count(len: usize) -> Result<u32, RenderError> {
    if len % 3 != 0 {
        return Err(RenderError::InvalidMeshData { len });
    }
    let vertices = len / 3;
    u32::try_from(vertices).map_err(|_| RenderError::MeshTooLarge { vertices })
}

pub fn wire_vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<WireVertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[wgpu::VertexAttribute {
            offset: 0,
            shader_location: VERTEX_ATTRIBUTE_LOCATION,
            format: wgpu::VertexFormat::Float32x3,
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct MemoryStorage {
        created: RefCell<usize>,
    }

    impl VertexStorage for MemoryStorage {
        type Buffer = Vec<u8>;

        fn create_vertex_buffer(&self, _label: &str, contents: &[u8]) -> Vec<u8> {
            *self.created.borrow_mut() += 1;
            contents.to_vec()
        }
    }

    #[derive(Default)]
    struct RecordingPass {
        bound: Vec<(u32, usize)>,
        draws: Vec<Range<u32>>,
    }

    impl LineStripPass<Vec<u8>> for RecordingPass {
        fn bind_vertex_buffer(&mut self, slot: u32, buffer: &Vec<u8>) {
            self.bound.push((slot, buffer.len()));
        }

        fn draw_vertices(&mut self, vertices: Range<u32>) {
            self.draws.push(vertices);
        }
    }

    #[test]
    fn upload_then_draw_issues_one_draw_over_all_vertices() {
        let storage = MemoryStorage::default();
        let mut geometry = GeometryBuffer::new();
        let vertices = [0.0, 1.0, 2.0, f32::NAN, f32::NAN, f32::NAN, 3.0, 4.0, 5.0];

        geometry.upload(&storage, &vertices).unwrap();
        let mut pass = RecordingPass::default();
        geometry.draw(&mut pass);

        assert_eq!(geometry.count(), 3);
        assert_eq!(pass.bound, vec![(VERTEX_SLOT, 9 * 4)]);
        assert_eq!(pass.draws, vec![0..3]);
    }

    #[test]
    fn breaks_are_uploaded_verbatim() {
        let storage = MemoryStorage::default();
        let mut geometry = GeometryBuffer::new();
        let vertices = [f32::NAN, f32::NAN, f32::NAN];

        geometry.upload(&storage, &vertices).unwrap();

        let stored = geometry.buffer.as_ref().unwrap();
        assert_eq!(stored.len(), 12);
        assert!(
            stored
                .chunks_exact(4)
                .map(|b| f32::from_ne_bytes([b[0], b[1], b[2], b[3]]))
                .all(f32::is_nan)
        );
    }

    #[test]
    fn misaligned_upload_keeps_previous_state() {
        let storage = MemoryStorage::default();
        let mut geometry = GeometryBuffer::new();
        geometry.upload(&storage, &[1.0; 6]).unwrap();

        let err = geometry.upload(&storage, &[1.0; 7]).unwrap_err();

        assert!(matches!(err, RenderError::InvalidMeshData { len: 7 }));
        assert_eq!(geometry.count(), 2);
        assert_eq!(*storage.created.borrow(), 1);

        let mut pass = RecordingPass::default();
        geometry.draw(&mut pass);
        assert_eq!(pass.draws, vec![0..2]);
    }

    #[test]
    fn oversized_vertex_count_is_reported_as_too_large() {
        let len = (u32::MAX as usize + 1) * 3;
        assert!(matches!(
            draw_count(len),
            Err(RenderError::MeshTooLarge { vertices }) if vertices == u32::MAX as usize + 1
        ));
        assert_eq!(draw_count(u32::MAX as usize * 3).unwrap(), u32::MAX);
        assert!(matches!(
            draw_count(4),
            Err(RenderError::InvalidMeshData { len: 4 })
        ));
    }

    #[test]
    fn upload_replaces_previous_buffer() {
        let storage = MemoryStorage::default();
        let mut geometry = GeometryBuffer::new();
        geometry.upload(&storage, &[0.0; 12]).unwrap();
        geometry.upload(&storage, &[0.0; 3]).unwrap();

        let mut pass = RecordingPass::default();
        geometry.draw(&mut pass);

        assert_eq!(pass.bound, vec![(VERTEX_SLOT, 12)]);
        assert_eq!(pass.draws, vec![0..1]);
    }

    #[test]
    fn draw_before_upload_is_a_no_op() {
        let geometry: GeometryBuffer<Vec<u8>> = GeometryBuffer::new();
        let mut pass = RecordingPass::default();
        geometry.draw(&mut pass);

        assert!(pass.bound.is_empty());
        assert!(pass.draws.is_empty());
    }

    #[test]
    fn layout_is_three_packed_floats() {
        let layout = wire_vertex_layout();
        assert_eq!(layout.array_stride, 12);
        assert_eq!(layout.attributes.len(), 1);
        assert_eq!(layout.attributes[0].format, wgpu::VertexFormat::Float32x3);
        assert_eq!(layout.attributes[0].offset, 0);
    }
}

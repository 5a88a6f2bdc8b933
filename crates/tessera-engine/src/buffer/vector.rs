use core::marker::PhantomData;

use bytemuck::Pod;

use super::{BufferId, BufferUsage, UploadContext};

/// Growable CPU-side vertex storage.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexVector<V> {
    vertices: Vec<V>,
}

impl<V> Default for VertexVector<V> {
    fn default() -> Self {
        Self { vertices: Vec::new() }
    }
}

impl<V: Pod> VertexVector<V> {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn push(&mut self, vertex: V) {
        self.vertices.push(vertex);
    }

    /// Number of vertices stored.
    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[V] {
        &self.vertices
    }

    /// Grows to `len` by repeating `vertex`; never shrinks.
    #[inline]
    pub fn fill_to(&mut self, len: usize, vertex: V) {
        if len > self.vertices.len() {
            self.vertices.resize(len, vertex);
        }
    }

    /// Moves the vertices into a GPU buffer.
    pub fn upload(self, ctx: &mut dyn UploadContext, label: &str) -> VertexBuffer<V> {
        let id = ctx.create_buffer(BufferUsage::Vertex, label, bytemuck::cast_slice(&self.vertices));
        VertexBuffer {
            id,
            len: self.vertices.len(),
            _vertex: PhantomData,
        }
    }
}

/// Growable CPU-side triangle list with 16-bit, segment-relative indices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexVector {
    triangles: Vec<[u16; 3]>,
}

impl IndexVector {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn push_triangle(&mut self, a: u16, b: u16, c: u16) {
        self.triangles.push([a, b, c]);
    }

    /// Number of indices (three per triangle).
    #[inline]
    pub fn len(&self) -> usize {
        self.triangles.len() * 3
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    #[inline]
    pub fn triangles(&self) -> &[[u16; 3]] {
        &self.triangles
    }

    /// Moves the indices into a GPU buffer.
    pub fn upload(self, ctx: &mut dyn UploadContext, label: &str) -> IndexBuffer {
        let len = self.len();
        let id = ctx.create_buffer(BufferUsage::Index, label, bytemuck::cast_slice(&self.triangles));
        IndexBuffer { id, len }
    }
}

/// GPU-resident vertex buffer produced by [`VertexVector::upload`].
#[derive(Debug)]
pub struct VertexBuffer<V> {
    id: BufferId,
    len: usize,
    _vertex: PhantomData<fn() -> V>,
}

impl<V> VertexBuffer<V> {
    #[inline]
    pub fn id(&self) -> BufferId {
        self.id
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// GPU-resident `u16` index buffer produced by [`IndexVector::upload`].
#[derive(Debug)]
pub struct IndexBuffer {
    id: BufferId,
    len: usize,
}

impl IndexBuffer {
    #[inline]
    pub fn id(&self) -> BufferId {
        self.id
    }

    /// Number of indices.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

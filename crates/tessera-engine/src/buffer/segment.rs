/// Largest vertex count one segment may hold; its indices must fit `u16`.
pub const MAX_SEGMENT_VERTICES: usize = u16::MAX as usize;

/// Contiguous run of a bucket's vertex/index buffers.
///
/// Indices inside a segment are relative to `vertex_offset`, which the draw
/// call passes as base vertex.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Segment {
    pub vertex_offset: usize,
    pub index_offset: usize,
    pub vertex_length: usize,
    pub index_length: usize,
}

impl Segment {
    #[inline]
    pub const fn new(vertex_offset: usize, index_offset: usize) -> Self {
        Self {
            vertex_offset,
            index_offset,
            vertex_length: 0,
            index_length: 0,
        }
    }
}

/// Ordered segments of one bucket.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct SegmentVector {
    segments: Vec<Segment>,
}

impl SegmentVector {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the segment the next primitive of `vertices_needed` vertices goes into.
    ///
    /// Starts a new segment at the given buffer offsets when none exists yet or the
    /// current one would exceed [`MAX_SEGMENT_VERTICES`].
    ///
    /// # Panics
    /// Panics if `vertices_needed` alone exceeds [`MAX_SEGMENT_VERTICES`]; such a
    /// primitive would not fit even a fresh segment.
    pub fn prepare(
        &mut self,
        vertex_offset: usize,
        index_offset: usize,
        vertices_needed: usize,
    ) -> &mut Segment {
        assert!(
            vertices_needed <= MAX_SEGMENT_VERTICES,
            "primitive of {vertices_needed} vertices cannot fit a segment"
        );

        let full = self
            .segments
            .last()
            .is_none_or(|s| s.vertex_length + vertices_needed > MAX_SEGMENT_VERTICES);
        if full {
            self.segments.push(Segment::new(vertex_offset, index_offset));
        }

        let last = self.segments.len() - 1;
        &mut self.segments[last]
    }

    #[inline]
    pub fn as_slice(&self) -> &[Segment] {
        &self.segments
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter()
    }
}

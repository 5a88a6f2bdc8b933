use std::collections::HashSet;

use crate::geometry::BBox;

/// Uniform-grid spatial index over 2D bounding boxes.
///
/// The grid covers `[0, extent)` with `n × n` cells plus `padding` extra cells on
/// every side, so geometry that spills slightly past the tile edge still lands in
/// a dedicated cell instead of piling up in the border cells.
///
/// Lifecycle:
/// - populate with [`insert`](Self::insert) (single-threaded)
/// - query with [`query`](Self::query); the index is read-only from then on
///
/// There is no removal or update. Concurrent queries on a finished index are fine
/// (`GridIndex<T>: Sync` when `T: Sync`).
#[derive(Debug, Clone)]
pub struct GridIndex<T> {
    extent: i32,
    n: i32,
    padding: i32,
    d: i32,
    scale: f64,

    /// Backing store; the position of an element is its uid.
    elements: Vec<(T, BBox)>,

    /// `d * d` cells in row-major order (`d * y + x`), each holding uids.
    cells: Vec<Vec<usize>>,
}

impl<T> GridIndex<T> {
    /// Creates an empty index.
    ///
    /// # Panics
    /// Panics if `extent` or `n` is not positive, or `padding` is negative.
    pub fn new(extent: i32, n: i32, padding: i32) -> Self {
        assert!(extent > 0, "GridIndex extent must be positive, got {extent}");
        assert!(n > 0, "GridIndex resolution must be positive, got {n}");
        assert!(padding >= 0, "GridIndex padding must not be negative, got {padding}");

        let d = n + 2 * padding;
        Self {
            extent,
            n,
            padding,
            d,
            scale: f64::from(n) / f64::from(extent),
            elements: Vec::new(),
            cells: vec![Vec::new(); (d as usize) * (d as usize)],
        }
    }

    #[inline]
    pub fn extent(&self) -> i32 {
        self.extent
    }

    #[inline]
    pub fn resolution(&self) -> i32 {
        self.n
    }

    #[inline]
    pub fn padding(&self) -> i32 {
        self.padding
    }

    /// Cells per side, padding included.
    #[inline]
    pub fn cells_per_side(&self) -> i32 {
        self.d
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Stores `payload` once and references its uid from every cell `bbox` touches.
    ///
    /// Cost is O(cells covered by `bbox`).
    pub fn insert(&mut self, payload: T, bbox: BBox) {
        let uid = self.elements.len();

        let cx1 = self.convert_to_cell_coord(bbox.x1);
        let cy1 = self.convert_to_cell_coord(bbox.y1);
        let cx2 = self.convert_to_cell_coord(bbox.x2);
        let cy2 = self.convert_to_cell_coord(bbox.y2);

        for x in cx1..=cx2 {
            for y in cy1..=cy2 {
                let cell = self.cell_index(x, y);
                self.cells[cell].push(uid);
            }
        }

        self.elements.push((payload, bbox));
    }

    /// Maps a geometry-space coordinate to a cell coordinate in `[0, d - 1]`.
    ///
    /// Total over all `i32` inputs; out-of-tile values clamp into the padded border.
    #[inline]
    pub fn convert_to_cell_coord(&self, x: i32) -> i32 {
        let cell = (f64::from(x) * self.scale).floor() + f64::from(self.padding);
        cell.clamp(0.0, f64::from(self.d - 1)) as i32
    }

    #[inline]
    fn cell_index(&self, x: i32, y: i32) -> usize {
        (self.d * y + x) as usize
    }

    /// Uids of elements overlapping `query`, ascending and without duplicates.
    fn query_uids(&self, query: BBox) -> Vec<usize> {
        let cx1 = self.convert_to_cell_coord(query.x1);
        let cy1 = self.convert_to_cell_coord(query.y1);
        let cx2 = self.convert_to_cell_coord(query.x2);
        let cy2 = self.convert_to_cell_coord(query.y2);

        let mut seen = HashSet::new();
        let mut hits = Vec::new();

        for x in cx1..=cx2 {
            for y in cy1..=cy2 {
                for &uid in &self.cells[self.cell_index(x, y)] {
                    // A uid spanning several cells is tested once.
                    if !seen.insert(uid) {
                        continue;
                    }
                    if query.intersects(self.elements[uid].1) {
                        hits.push(uid);
                    }
                }
            }
        }

        hits.sort_unstable();
        hits
    }
}

impl<T: Clone> GridIndex<T> {
    /// Returns payloads whose bbox overlaps `query` (closed intervals), in insertion order.
    pub fn query(&self, query: BBox) -> Vec<T> {
        self.query_uids(query)
            .into_iter()
            .map(|uid| self.elements[uid].0.clone())
            .collect()
    }

    /// Like [`query`](Self::query), also returning each hit's stored bbox.
    pub fn query_with_bbox(&self, query: BBox) -> Vec<(T, BBox)> {
        self.query_uids(query)
            .into_iter()
            .map(|uid| self.elements[uid].clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid<T>() -> GridIndex<T> {
        GridIndex::new(100, 10, 1)
    }

    /// Tiny deterministic generator so property-style tests stay reproducible.
    struct Lcg(u64);

    impl Lcg {
        fn next_in(&mut self, lo: i32, hi: i32) -> i32 {
            self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let span = (hi - lo + 1) as u64;
            lo + ((self.0 >> 33) % span) as i32
        }

        fn bbox(&mut self) -> BBox {
            let x1 = self.next_in(-20, 110);
            let y1 = self.next_in(-20, 110);
            BBox::new(x1, y1, x1 + self.next_in(0, 40), y1 + self.next_in(0, 40))
        }
    }

    // ── convert_to_cell_coord ─────────────────────────────────────────────

    #[test]
    fn cell_coord_maps_with_padding_offset() {
        let g = grid::<u32>();
        assert_eq!(g.convert_to_cell_coord(0), 1);
        assert_eq!(g.convert_to_cell_coord(9), 1);
        assert_eq!(g.convert_to_cell_coord(10), 2);
        assert_eq!(g.convert_to_cell_coord(99), 10);
        assert_eq!(g.convert_to_cell_coord(-1), 0);
    }

    #[test]
    fn cell_coord_clamps_extreme_inputs() {
        let g = grid::<u32>();
        let d = g.cells_per_side();
        for x in [i32::MIN, -1_000_000, -11, 100, 110, 5_000, i32::MAX] {
            let c = g.convert_to_cell_coord(x);
            assert!((0..d).contains(&c), "x={x} mapped to {c}");
        }
        assert_eq!(g.convert_to_cell_coord(i32::MIN), 0);
        assert_eq!(g.convert_to_cell_coord(i32::MAX), d - 1);
    }

    // ── query ─────────────────────────────────────────────────────────────

    #[test]
    fn query_empty_index() {
        assert!(grid::<u32>().query(BBox::new(0, 0, 100, 100)).is_empty());
    }

    #[test]
    fn query_spanning_element_is_returned_once() {
        let mut g = grid();
        g.insert(7, BBox::new(0, 0, 99, 99));
        assert_eq!(g.query(BBox::new(-50, -50, 150, 150)), vec![7]);
    }

    #[test]
    fn query_results_in_insertion_order() {
        let mut g = grid();
        // Inserted far-right first so cell visitation order differs from uid order.
        g.insert(0, BBox::new(80, 80, 90, 90));
        g.insert(1, BBox::new(0, 0, 5, 5));
        g.insert(2, BBox::new(40, 40, 45, 45));
        assert_eq!(g.query(BBox::new(0, 0, 100, 100)), vec![0, 1, 2]);
    }

    #[test]
    fn query_same_cell_exact_test_rejects_non_overlap() {
        let mut g = grid();
        g.insert(1, BBox::new(0, 0, 2, 2));
        g.insert(2, BBox::new(5, 5, 8, 8));
        // Both live in cell (1, 1); only the first overlaps.
        assert_eq!(g.query(BBox::new(0, 0, 3, 3)), vec![1]);
    }

    #[test]
    fn query_touching_edge_matches() {
        let mut g = grid();
        g.insert(1, BBox::new(10, 10, 20, 20));
        assert_eq!(g.query(BBox::new(20, 20, 30, 30)), vec![1]);
        assert!(g.query(BBox::new(21, 21, 30, 30)).is_empty());
    }

    #[test]
    fn query_out_of_tile_geometry_in_padding() {
        let mut g = grid();
        g.insert(1, BBox::new(-8, -8, -2, -2));
        g.insert(2, BBox::new(104, 104, 108, 108));
        assert_eq!(g.query(BBox::new(-5, -5, -5, -5)), vec![1]);
        assert_eq!(g.query(BBox::new(105, 105, 500, 500)), vec![2]);
    }

    #[test]
    fn query_with_bbox_returns_stored_boxes() {
        let mut g = grid();
        g.insert("a", BBox::new(1, 2, 3, 4));
        assert_eq!(g.query_with_bbox(BBox::new(0, 0, 10, 10)), vec![("a", BBox::new(1, 2, 3, 4))]);
    }

    #[test]
    fn query_matches_brute_force() {
        let mut rng = Lcg(7);
        let boxes: Vec<BBox> = (0..300).map(|_| rng.bbox()).collect();

        let mut g = grid();
        for (i, b) in boxes.iter().enumerate() {
            g.insert(i, *b);
        }

        for _ in 0..200 {
            let q = rng.bbox();
            let expected: Vec<usize> = boxes
                .iter()
                .enumerate()
                .filter(|(_, b)| q.intersects(**b))
                .map(|(i, _)| i)
                .collect();
            assert_eq!(g.query(q), expected, "query {q:?}");
        }
    }

    #[test]
    fn query_stable_under_resolution_changes() {
        let mut rng = Lcg(42);
        let boxes: Vec<BBox> = (0..200).map(|_| rng.bbox()).collect();
        let queries: Vec<BBox> = (0..50).map(|_| rng.bbox()).collect();

        let build = |n: i32, padding: i32| {
            let mut g = GridIndex::new(100, n, padding);
            for (i, b) in boxes.iter().enumerate() {
                g.insert(i, *b);
            }
            g
        };

        let reference = build(1, 0);
        for (n, padding) in [(2, 1), (7, 1), (16, 2), (64, 3)] {
            let g = build(n, padding);
            for q in &queries {
                assert_eq!(g.query(*q), reference.query(*q), "n={n} padding={padding} q={q:?}");
            }
        }
    }

    #[test]
    #[should_panic(expected = "resolution must be positive")]
    fn new_rejects_zero_resolution() {
        let _ = GridIndex::<u8>::new(100, 0, 1);
    }
}

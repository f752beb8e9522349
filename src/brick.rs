use core::ops::Range;

/// Edge length of a brick, in samples.
pub const BRICK_EDGE: usize = 8;

/// Bytes per brick (one byte per sample).
pub const BRICK_SIZE: usize = BRICK_EDGE * BRICK_EDGE * BRICK_EDGE;

/// Position of a brick in the brick grid, in brick units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BrickIndex {
    pub x: usize,
    pub y: usize,
    pub z: usize,
}

impl BrickIndex {
    #[inline]
    pub const fn new(x: usize, y: usize, z: usize) -> Self {
        Self { x, y, z }
    }

    #[inline]
    /// Sample offset of the brick's first corner as (z, y, x).
    pub const fn origin(&self) -> [usize; 3] {
        [self.z * BRICK_EDGE, self.y * BRICK_EDGE, self.x * BRICK_EDGE]
    }
}

/// How an extent is tiled by bricks, and where each brick sits in the stream.
///
/// Bricks are stored x fastest, then y, then z. The last brick along an axis
/// is padded when the extent is not a multiple of [`BRICK_EDGE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrickLayout {
    /// Samples per axis (x, y, z)
    extent: [usize; 3],
    /// Bricks per axis (x, y, z)
    counts: [usize; 3],
}

impl BrickLayout {
    #[inline]
    pub fn new(extent: [usize; 3]) -> Self {
        Self {
            extent,
            counts: extent.map(|n| n.div_ceil(BRICK_EDGE)),
        }
    }

    #[inline]
    pub fn extent(&self) -> [usize; 3] {
        self.extent
    }

    #[inline]
    /// Bricks per axis as (x, y, z).
    pub fn counts(&self) -> [usize; 3] {
        self.counts
    }

    #[inline]
    pub fn brick_count(&self) -> usize {
        self.counts.iter().product()
    }

    #[inline]
    /// Bytes of brick data needed to cover the extent.
    pub fn data_size(&self) -> usize {
        self.brick_count() * BRICK_SIZE
    }

    #[inline]
    /// Shape of the brick-aligned grid as (z, y, x).
    pub fn padded_shape(&self) -> [usize; 3] {
        let [x, y, z] = self.counts;
        [z * BRICK_EDGE, y * BRICK_EDGE, x * BRICK_EDGE]
    }

    #[inline]
    pub fn linear_index(&self, brick: BrickIndex) -> usize {
        let [bx, by, _] = self.counts;
        brick.x + bx * (brick.y + by * brick.z)
    }

    #[inline]
    /// Inverse of [`linear_index`](Self::linear_index).
    pub fn brick_at(&self, index: usize) -> BrickIndex {
        let [bx, by, _] = self.counts;
        BrickIndex::new(index % bx, (index / bx) % by, index / (bx * by))
    }

    #[inline]
    pub fn byte_range(&self, brick: BrickIndex) -> Range<usize> {
        let start = self.linear_index(brick) * BRICK_SIZE;
        start..start + BRICK_SIZE
    }

    /// Every brick in stream order.
    pub fn bricks(&self) -> impl Iterator<Item = BrickIndex> + '_ {
        (0..self.brick_count()).map(|i| self.brick_at(i))
    }

    #[inline]
    pub fn contains(&self, brick: BrickIndex) -> bool {
        brick.x < self.counts[0] && brick.y < self.counts[1] && brick.z < self.counts[2]
    }
}

/// Lookup table mapping every raw byte to its physical density.
#[derive(Clone)]
pub struct Dequantizer {
    table: [f32; 256],
}

impl Dequantizer {
    /// Build the table for `(sample - offset) / scale`, evaluated in `f64`.
    pub fn new(offset: i16, scale: f64) -> Self {
        let offset = f64::from(offset);
        Self {
            table: core::array::from_fn(|s| ((s as f64 - offset) / scale) as f32),
        }
    }

    #[inline]
    pub fn apply(&self, sample: u8) -> f32 {
        self.table[usize::from(sample)]
    }
}

impl core::fmt::Debug for Dequantizer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Dequantizer")
            .field("zero", &self.table[0])
            .field("step", &(self.table[1] - self.table[0]))
            .finish()
    }
}

/// Write one brick into a z-slab of the output grid.
///
/// `slab` starts at section `brick.z * BRICK_EDGE` and holds whole sections of
/// `ny * nx` values; samples beyond the slab or the (y, x) extent are dropped.
///
/// The brick is stored as 16-bit words with their two bytes swapped, so sample
/// `i` sits at byte `i ^ 1`. Rows have an even length, so a pair never straddles
/// two rows.
pub(crate) fn scatter_brick(
    slab: &mut [f32],
    [ny, nx]: [usize; 2],
    brick: BrickIndex,
    samples: &[u8],
    dequantizer: &Dequantizer,
) {
    let section = ny * nx;
    let planes = (slab.len() / section).min(BRICK_EDGE);
    let [_, y0, x0] = brick.origin();
    let rows = ny.saturating_sub(y0).min(BRICK_EDGE);
    let cols = nx.saturating_sub(x0).min(BRICK_EDGE);

    for lz in 0..planes {
        for ly in 0..rows {
            let src = (lz * BRICK_EDGE + ly) * BRICK_EDGE;
            let dst = lz * section + (y0 + ly) * nx + x0;
            for (lx, out) in slab[dst..dst + cols].iter_mut().enumerate() {
                *out = dequantizer.apply(samples[(src + lx) ^ 1]);
            }
        }
    }
}

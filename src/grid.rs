use crate::brick::scatter_brick;
use crate::{BRICK_EDGE, BRICK_SIZE, BrickIndex, BrickLayout, Dequantizer, Error, Header, Result};

/// Dense density values in row-major `[z][y][x]` order.
#[derive(Debug, Clone, PartialEq)]
pub struct DensityGrid {
    /// Axis lengths as (z, y, x)
    shape: [usize; 3],
    data: Vec<f32>,
}

/// Summary of the values in a grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Statistics {
    pub min: f32,
    pub max: f32,
    pub mean: f32,
    /// RMS deviation from the mean
    pub rms: f32,
}

impl DensityGrid {
    /// A grid of zeros with the given (z, y, x) shape.
    pub fn zeros(shape: [usize; 3]) -> Self {
        Self {
            shape,
            data: vec![0.0; shape.iter().product()],
        }
    }

    #[inline]
    /// Axis lengths as (z, y, x).
    pub fn shape(&self) -> [usize; 3] {
        self.shape
    }

    #[inline]
    /// Axis lengths as (x, y, z), the order the header uses.
    pub fn dimensions(&self) -> (usize, usize, usize) {
        let [z, y, x] = self.shape;
        (x, y, z)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn get(&self, z: usize, y: usize, x: usize) -> Option<f32> {
        let [nz, ny, nx] = self.shape;
        if z >= nz || y >= ny || x >= nx {
            return None;
        }
        Some(self.data[(z * ny + y) * nx + x])
    }

    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    #[inline]
    /// One z-section as a row-major `[y][x]` slice.
    pub fn section(&self, z: usize) -> Option<&[f32]> {
        let [nz, ny, nx] = self.shape;
        (z < nz).then(|| &self.data[z * ny * nx..(z + 1) * ny * nx])
    }

    #[inline]
    /// Values as native-endian `f32` bytes.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.data)
    }

    #[inline]
    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }

    /// Decode one brick from `bricks` and write it at its place in the grid.
    ///
    /// `bricks` is the whole brick stream; `layout` must describe this grid.
    /// Bricks touch disjoint regions, so the insertion order does not matter.
    pub fn insert_brick(
        &mut self,
        layout: &BrickLayout,
        brick: BrickIndex,
        bricks: &[u8],
        dequantizer: &Dequantizer,
    ) -> Result<()> {
        let [ex, ey, ez] = layout.extent();
        if self.shape != [ez, ey, ex] || !layout.contains(brick) {
            return Err(Error::InvalidDimensions);
        }
        let range = layout.byte_range(brick);
        let samples = bricks.get(range.clone()).ok_or(Error::TruncatedData {
            expected: range.end,
            found: bricks.len(),
        })?;

        let section = ey * ex;
        let [z0, _, _] = brick.origin();
        let end = ((z0 + BRICK_EDGE) * section).min(self.data.len());
        scatter_brick(
            &mut self.data[z0 * section..end],
            [ey, ex],
            brick,
            samples,
            dequantizer,
        );
        Ok(())
    }

    /// Min, max, mean and RMS deviation. `None` for an empty grid.
    pub fn statistics(&self) -> Option<Statistics> {
        if self.data.is_empty() {
            return None;
        }
        let (mut min, mut max, mut sum) = (f32::INFINITY, f32::NEG_INFINITY, 0.0f64);
        for &v in &self.data {
            min = min.min(v);
            max = max.max(v);
            sum += f64::from(v);
        }
        let n = self.data.len() as f64;
        let mean = sum / n;
        let var = self
            .data
            .iter()
            .map(|&v| (f64::from(v) - mean).powi(2))
            .sum::<f64>()
            / n;
        Some(Statistics {
            min,
            max,
            mean: mean as f32,
            rms: var.sqrt() as f32,
        })
    }
}

impl core::ops::Index<[usize; 3]> for DensityGrid {
    type Output = f32;

    #[inline]
    fn index(&self, [z, y, x]: [usize; 3]) -> &f32 {
        let [nz, ny, nx] = self.shape;
        assert!(
            z < nz && y < ny && x < nx,
            "index [{z}, {y}, {x}] out of bounds for grid of shape {:?}",
            self.shape
        );
        &self.data[(z * ny + y) * nx + x]
    }
}

/// Decode the brick stream that follows `header` into a cropped density grid.
///
/// `bytes` starts at the first brick; anything past the last brick is ignored.
pub fn decode_grid(header: &Header, bytes: &[u8]) -> Result<DensityGrid> {
    let layout = header.brick_layout();
    let expected = layout.data_size();
    if bytes.len() < expected {
        return Err(Error::TruncatedData {
            expected,
            found: bytes.len(),
        });
    }
    let bricks = &bytes[..expected];
    let dequantizer = header.dequantizer();
    let mut grid = DensityGrid::zeros(header.grid_shape());

    log::debug!(
        "decoding {} bricks ({:?}) into grid {:?}",
        layout.brick_count(),
        layout.counts(),
        grid.shape
    );

    let [_, ny, nx] = grid.shape;
    let slab_len = BRICK_EDGE * ny * nx;

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;

        grid.data
            .par_chunks_mut(slab_len)
            .enumerate()
            .for_each(|(bz, slab)| decode_slab(slab, bz, &layout, bricks, &dequantizer));
    }
    #[cfg(not(feature = "parallel"))]
    {
        grid.data
            .chunks_mut(slab_len)
            .enumerate()
            .for_each(|(bz, slab)| decode_slab(slab, bz, &layout, bricks, &dequantizer));
    }

    Ok(grid)
}

/// Fill one layer of bricks (eight sections, fewer at the top of the grid).
fn decode_slab(
    slab: &mut [f32],
    bz: usize,
    layout: &BrickLayout,
    bricks: &[u8],
    dequantizer: &Dequantizer,
) {
    let [ex, ey, _] = layout.extent();
    let [bx, by, _] = layout.counts();
    for y in 0..by {
        for x in 0..bx {
            let brick = BrickIndex::new(x, y, bz);
            let start = layout.linear_index(brick) * BRICK_SIZE;
            scatter_brick(
                slab,
                [ey, ex],
                brick,
                &bricks[start..start + BRICK_SIZE],
                dequantizer,
            );
        }
    }
}

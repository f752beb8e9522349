//! Builders for synthetic DSN6 maps, shared by the unit tests and benches.
//!
//! Nothing here goes through the crate's decoding code: bricks are packed and
//! the expected densities computed voxel by voxel, straight from the layout.
#![allow(dead_code)]

/// Header fields of a test map, in raw header units.
#[derive(Debug, Clone, Copy)]
pub struct MapSpec {
    pub start: [i16; 3],
    pub extent: [i16; 3],
    pub sampling_rate: [i16; 3],
    pub cell: [i16; 6],
    pub density_a: i16,
    pub density_c: i16,
    pub cell_factor: i16,
    pub density_factor: i16,
}

impl MapSpec {
    /// Header of the 6c10 2Fo-Fc map.
    pub fn reference() -> Self {
        Self {
            start: [-21, -10, 33],
            extent: [83, 122, 90],
            sampling_rate: [104, 104, 288],
            cell: [4614, 4614, 12734, 7200, 7200, 7200],
            density_a: 2108,
            density_c: 47,
            cell_factor: 80,
            density_factor: 100,
        }
    }

    pub fn with_extent(extent: [i16; 3]) -> Self {
        Self {
            extent,
            ..Self::reference()
        }
    }

    pub fn words(&self) -> [i16; 256] {
        let mut words = [0i16; 256];
        words[0..3].copy_from_slice(&self.start);
        words[3..6].copy_from_slice(&self.extent);
        words[6..9].copy_from_slice(&self.sampling_rate);
        words[9..15].copy_from_slice(&self.cell);
        words[15] = self.density_a;
        words[16] = self.density_c;
        words[17] = self.cell_factor;
        words[18] = self.density_factor;
        // Trailing words are not part of the decoded header.
        words[19] = 0x5a5a;
        words[255] = -1;
        words
    }

    pub fn header_bytes(&self) -> Vec<u8> {
        header_bytes(&self.words())
    }

    pub fn extent_usize(&self) -> [usize; 3] {
        self.extent.map(|n| n as usize)
    }

    /// Expected physical value of one raw sample.
    pub fn density(&self, sample: u8) -> f32 {
        let scale = f64::from(self.density_a) / f64::from(self.density_factor);
        ((f64::from(sample) - f64::from(self.density_c)) / scale) as f32
    }

    /// Header followed by the packed bricks.
    pub fn file_bytes(&self, sample: impl Fn(usize, usize, usize) -> u8) -> Vec<u8> {
        let mut bytes = self.header_bytes();
        bytes.extend(brick_bytes(self.extent_usize(), sample));
        bytes
    }

    /// Densities in `[z][y][x]` order, one voxel at a time.
    pub fn reference_grid(&self, sample: impl Fn(usize, usize, usize) -> u8) -> Vec<f32> {
        let [nx, ny, nz] = self.extent_usize();
        let mut out = Vec::with_capacity(nx * ny * nz);
        for z in 0..nz {
            for y in 0..ny {
                for x in 0..nx {
                    out.push(self.density(sample(z, y, x)));
                }
            }
        }
        out
    }
}

pub fn header_bytes(words: &[i16; 256]) -> Vec<u8> {
    words.iter().flat_map(|w| w.to_be_bytes()).collect()
}

/// Pack `sample(z, y, x)` into 8×8×8 bricks. Padding outside the extent is 0xFF.
///
/// Each brick is written the way DSN6 files store it: as 16-bit words whose two
/// bytes are swapped relative to sample order.
pub fn brick_bytes(extent: [usize; 3], sample: impl Fn(usize, usize, usize) -> u8) -> Vec<u8> {
    let [nx, ny, nz] = extent;
    let [bx, by, bz] = extent.map(|n| n.div_ceil(8));
    let mut out = Vec::with_capacity(bx * by * bz * 512);
    for kz in 0..bz {
        for ky in 0..by {
            for kx in 0..bx {
                let brick_start = out.len();
                for lz in 0..8 {
                    for ly in 0..8 {
                        for lx in 0..8 {
                            let (z, y, x) = (kz * 8 + lz, ky * 8 + ly, kx * 8 + lx);
                            if z < nz && y < ny && x < nx {
                                out.push(sample(z, y, x));
                            } else {
                                out.push(0xFF);
                            }
                        }
                    }
                }
                for word in out[brick_start..].chunks_exact_mut(2) {
                    word.swap(0, 1);
                }
            }
        }
    }
    out
}

/// Deterministic sample pattern that differs along every axis. Never 0xFF.
pub fn pattern(z: usize, y: usize, x: usize) -> u8 {
    ((x * 7 + y * 13 + z * 29) % 251) as u8
}

use crate::{BrickLayout, Dequantizer, Error, Result};

/// Size of the fixed header in bytes (256 big-endian 16-bit words).
pub const HEADER_SIZE: usize = 512;

const WORDS: usize = HEADER_SIZE / 2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Header {
    /// Grid origin in sample units (x, y, z)
    start: [i16; 3],
    /// Number of samples along each axis (x, y, z)
    extent: [u16; 3],
    /// Samples per unit cell edge (x, y, z)
    sampling_rate: [u16; 3],
    /// Cell edge lengths in Å followed by cell angles in degrees
    unit_cell: [f64; 6],
    /// Density scale, already divided by its scaling factor
    density_a: f64,
    /// Density offset, in raw sample units
    density_c: i16,
    unit_cell_scaling_factor: i16,
    density_a_scaling_factor: i16,
}

impl Header {
    /// Decode a header from the first 512 bytes of `bytes`.
    ///
    /// Longer input is fine, so a whole file can be passed in. Every word is
    /// read big-endian regardless of the host.
    pub fn decode_from_bytes(bytes: &[u8]) -> Result<Self> {
        let block = bytes.get(..HEADER_SIZE).ok_or(Error::TruncatedHeader {
            expected: HEADER_SIZE,
            found: bytes.len(),
        })?;

        let pairs: &[[u8; 2]] = bytemuck::cast_slice(block);
        let words: [i16; WORDS] = core::array::from_fn(|i| i16::from_be_bytes(pairs[i]));

        let unit_cell_scaling_factor = words[17];
        let density_a_scaling_factor = words[18];
        if unit_cell_scaling_factor == 0 {
            return Err(Error::InvalidHeader("unit cell scaling factor is zero"));
        }
        if density_a_scaling_factor == 0 {
            return Err(Error::InvalidHeader("density scaling factor is zero"));
        }
        if words[3..6].iter().any(|&n| n <= 0) {
            return Err(Error::InvalidHeader("extent must be positive on every axis"));
        }

        let cell_factor = f64::from(unit_cell_scaling_factor);
        let header = Self {
            start: [words[0], words[1], words[2]],
            extent: [words[3] as u16, words[4] as u16, words[5] as u16],
            sampling_rate: [words[6], words[7], words[8]].map(reinterpret_unsigned),
            unit_cell: core::array::from_fn(|i| f64::from(words[9 + i]) / cell_factor),
            density_a: f64::from(words[15]) / f64::from(density_a_scaling_factor),
            density_c: words[16],
            unit_cell_scaling_factor,
            density_a_scaling_factor,
        };

        // A zero numerator passes the factor checks but still cannot be divided by.
        if header.density_a == 0.0 {
            return Err(Error::InvalidHeader("density scale is zero"));
        }

        log::debug!(
            "DSN6 header: extent {:?}, start {:?}, density_a {}, density_c {}",
            header.extent,
            header.start,
            header.density_a,
            header.density_c
        );
        Ok(header)
    }

    #[inline]
    pub fn start(&self) -> [i16; 3] {
        self.start
    }

    #[inline]
    pub fn extent(&self) -> [u16; 3] {
        self.extent
    }

    #[inline]
    pub fn sampling_rate(&self) -> [u16; 3] {
        self.sampling_rate
    }

    #[inline]
    /// Cell lengths (a, b, c) then angles (alpha, beta, gamma).
    pub fn unit_cell(&self) -> [f64; 6] {
        self.unit_cell
    }

    #[inline]
    pub fn cell_lengths(&self) -> [f64; 3] {
        [self.unit_cell[0], self.unit_cell[1], self.unit_cell[2]]
    }

    #[inline]
    pub fn cell_angles(&self) -> [f64; 3] {
        [self.unit_cell[3], self.unit_cell[4], self.unit_cell[5]]
    }

    #[inline]
    pub fn density_a(&self) -> f64 {
        self.density_a
    }

    #[inline]
    pub fn density_c(&self) -> i16 {
        self.density_c
    }

    #[inline]
    pub fn unit_cell_scaling_factor(&self) -> i16 {
        self.unit_cell_scaling_factor
    }

    #[inline]
    pub fn density_a_scaling_factor(&self) -> i16 {
        self.density_a_scaling_factor
    }

    #[inline]
    /// Shape of the decoded grid as (z, y, x).
    pub fn grid_shape(&self) -> [usize; 3] {
        let [x, y, z] = self.extent;
        [usize::from(z), usize::from(y), usize::from(x)]
    }

    #[inline]
    pub fn brick_layout(&self) -> BrickLayout {
        let [x, y, z] = self.extent;
        BrickLayout::new([usize::from(x), usize::from(y), usize::from(z)])
    }

    #[inline]
    /// Offset, in bytes, from file start to the first brick.
    pub const fn data_offset(&self) -> usize {
        HEADER_SIZE
    }

    #[inline]
    /// Size, in bytes, of the brick data the extent requires.
    pub fn data_size(&self) -> usize {
        self.brick_layout().data_size()
    }

    #[inline]
    pub fn dequantizer(&self) -> Dequantizer {
        Dequantizer::new(self.density_c, self.density_a)
    }

    #[inline]
    /// Physical density of a single raw sample.
    pub fn dequantize(&self, sample: u8) -> f32 {
        ((f64::from(sample) - f64::from(self.density_c)) / self.density_a) as f32
    }
}

/// Same bits, read as unsigned: -1 becomes 65535.
#[inline]
fn reinterpret_unsigned(word: i16) -> u16 {
    u16::from_ne_bytes(word.to_ne_bytes())
}

/// Decode the 512-byte header at the start of `bytes`.
pub fn decode_header(bytes: &[u8]) -> Result<Header> {
    Header::decode_from_bytes(bytes)
}

//! Reader for DSN6/BRIX electron-density maps.
//!
//! A DSN6 file is a 512-byte header of big-endian 16-bit words followed by the
//! density samples, quantized to one byte each and stored in 8×8×8 bricks.
//! [`decode_header`] and [`decode_grid`] work on byte slices; the `file` and
//! `mmap` features add backends that read straight from disk.

mod brick;
mod grid;
mod header;

#[cfg(test)]
#[path = "../test/fixtures.rs"]
mod fixtures;

#[cfg(test)]
#[path = "../test/tests.rs"]
mod tests;

pub use brick::{BRICK_EDGE, BRICK_SIZE, BrickIndex, BrickLayout, Dequantizer};
pub use grid::{DensityGrid, Statistics, decode_grid};
pub use header::{HEADER_SIZE, Header, decode_header};

// Optional file features
#[cfg(feature = "file")]
mod dsn6file;
#[cfg(test)]
#[cfg(feature = "file")]
#[path = "../test/dsn6file_test.rs"]
mod dsn6file_test;

#[cfg(feature = "file")]
pub use dsn6file::{Dsn6File, decode_file, open_file};

#[cfg(feature = "mmap")]
pub use dsn6file::{Dsn6Mmap, open_mmap};

// Error type

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Failure reported by the underlying file or memory map.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Fewer bytes than a full header were supplied.
    #[error("truncated DSN6 header: expected {expected} bytes, found {found}")]
    TruncatedHeader { expected: usize, found: usize },

    /// A header field makes the map undecodable.
    #[error("invalid DSN6 header: {0}")]
    InvalidHeader(&'static str),

    /// The brick data is shorter than the extent requires.
    #[error("truncated brick data: expected {expected} bytes, found {found}")]
    TruncatedData { expected: usize, found: usize },

    /// A brick layout was applied to a grid of a different shape.
    #[error("brick layout does not match the grid dimensions")]
    InvalidDimensions,
}

pub type Result<T> = core::result::Result<T, Error>;

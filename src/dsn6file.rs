use crate::{DensityGrid, Error, HEADER_SIZE, Header, Result, decode_grid};

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

/// Dsn6File reads the header on open and the bricks on demand
pub struct Dsn6File {
    path: PathBuf,
    file: File,
    header: Header,
    file_len: u64,
}

impl Dsn6File {
    #[inline]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut file = File::open(&path)?;
        let file_len = file.metadata()?.len();

        if file_len < HEADER_SIZE as u64 {
            return Err(Error::TruncatedHeader {
                expected: HEADER_SIZE,
                found: file_len as usize,
            });
        }

        let mut header_bytes = [0u8; HEADER_SIZE];
        file.read_exact(&mut header_bytes)?;
        let header = Header::decode_from_bytes(&header_bytes)?;

        log::trace!("opened {} ({} bytes)", path.display(), file_len);

        Ok(Self {
            path,
            file,
            header,
            file_len,
        })
    }

    #[inline]
    pub fn header(&self) -> &Header {
        &self.header
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw brick bytes, exactly as many as the extent requires.
    pub fn read_data(&self) -> Result<Vec<u8>> {
        let expected = self.header.data_size();
        let available = self.file_len.saturating_sub(HEADER_SIZE as u64) as usize;
        if available < expected {
            return Err(Error::TruncatedData {
                expected,
                found: available,
            });
        }

        let mut buffer = vec![0u8; expected];
        let mut file = &self.file;
        file.seek(SeekFrom::Start(self.header.data_offset() as u64))?;
        file.read_exact(&mut buffer)?;
        Ok(buffer)
    }

    #[inline]
    pub fn read_grid(&self) -> Result<DensityGrid> {
        let data = self.read_data()?;
        decode_grid(&self.header, &data)
    }
}

impl core::fmt::Debug for Dsn6File {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Dsn6File({:?})", self.path)
    }
}

#[cfg(feature = "mmap")]
/// Dsn6Mmap decodes straight from a memory-mapped file
pub struct Dsn6Mmap {
    path: PathBuf,
    header: Header,
    mmap: memmap2::Mmap,
}

#[cfg(feature = "mmap")]
impl Dsn6Mmap {
    #[inline]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        use memmap2::MmapOptions;

        let path = path.as_ref().to_path_buf();
        let file = File::open(&path)?;

        // SAFETY: the map is read-only and dropped together with `self`.
        let mmap = unsafe { MmapOptions::new().map(&file)? };
        let header = Header::decode_from_bytes(&mmap)?;

        log::trace!("mapped {} ({} bytes)", path.display(), mmap.len());

        Ok(Self { path, header, mmap })
    }

    #[inline]
    pub fn header(&self) -> &Header {
        &self.header
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[inline]
    /// Everything after the header, trailing padding included.
    pub fn data(&self) -> &[u8] {
        &self.mmap[self.header.data_offset()..]
    }

    #[inline]
    pub fn read_grid(&self) -> Result<DensityGrid> {
        decode_grid(&self.header, self.data())
    }
}

#[cfg(feature = "mmap")]
impl core::fmt::Debug for Dsn6Mmap {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Dsn6Mmap({:?})", self.path)
    }
}

/// Read and decode a whole file in one go.
pub fn decode_file(path: impl AsRef<Path>) -> Result<(Header, DensityGrid)> {
    let bytes = std::fs::read(path)?;
    let header = Header::decode_from_bytes(&bytes)?;
    let grid = decode_grid(&header, &bytes[HEADER_SIZE..])?;
    Ok((header, grid))
}

pub fn open_file(path: impl AsRef<Path>) -> Result<(Header, DensityGrid)> {
    let file = Dsn6File::open(path)?;
    let grid = file.read_grid()?;
    Ok((file.header, grid))
}

#[cfg(feature = "mmap")]
pub fn open_mmap(path: impl AsRef<Path>) -> Result<(Header, DensityGrid)> {
    let file = Dsn6Mmap::open(path)?;
    let grid = file.read_grid()?;
    Ok((file.header, grid))
}

//! Image loading.
//!
//! The analyzer never opens files itself. This module maps a file read-only
//! and hands out the bytes as an immutable `Bytes` view, refusing files that
//! exceed the configured size limit.

pub mod error;

use crate::config::IoConfig;
use crate::io::error::{IoError, Result};
use bytes::Bytes;
use memmap2::Mmap;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A read-only, memory-mapped image.
#[derive(Debug, Clone)]
pub struct MappedImage {
    path: PathBuf,
    data: Bytes,
}

impl MappedImage {
    /// Opens and memory-maps a file.
    ///
    /// This function will fail if the file size exceeds `config.max_file_size`.
    pub fn open<P: AsRef<Path>>(path: P, config: &IoConfig) -> Result<Self> {
        let path = path.as_ref();
        let open_err = |source| IoError::Open {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(open_err)?;
        let file_size = file.metadata().map_err(open_err)?.len();

        debug!(
            path = %path.display(),
            size = file_size,
            max_file_size = config.max_file_size,
            "Opening image"
        );

        if file_size > config.max_file_size {
            warn!(
                path = %path.display(),
                size = file_size,
                limit = config.max_file_size,
                "File is too large"
            );
            return Err(IoError::FileTooLarge {
                limit: config.max_file_size,
                found: file_size,
            });
        }

        // Empty files cannot be mapped.
        let data = if file_size == 0 {
            Bytes::new()
        } else {
            // Safety: read-only private mapping; the bytes are never written through.
            let mmap = unsafe { Mmap::map(&file) }.map_err(|source| IoError::Map {
                path: path.to_path_buf(),
                source,
            })?;
            Bytes::from_owner(mmap)
        };

        Ok(Self {
            path: path.to_path_buf(),
            data,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The image contents.
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// Returns the size of the image in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

//! Bounds-checked readers over the image buffer

use crate::formats::macho::types::{MachoError, Result};

/// Little-endian field reads at an absolute offset.
///
/// Every read is checked against the slice length; nothing is ever
/// reinterpreted in place.
pub trait LeRead {
    fn read_u8(&self, offset: usize) -> Result<u8>;
    fn read_u16(&self, offset: usize) -> Result<u16>;
    fn read_u32(&self, offset: usize) -> Result<u32>;
    fn read_u64(&self, offset: usize) -> Result<u64>;
}

impl LeRead for [u8] {
    fn read_u8(&self, offset: usize) -> Result<u8> {
        self.get(offset)
            .copied()
            .ok_or(MachoError::Truncated { offset, needed: 1 })
    }

    fn read_u16(&self, offset: usize) -> Result<u16> {
        read_array(self, offset).map(u16::from_le_bytes)
    }

    fn read_u32(&self, offset: usize) -> Result<u32> {
        read_array(self, offset).map(u32::from_le_bytes)
    }

    fn read_u64(&self, offset: usize) -> Result<u64> {
        read_array(self, offset).map(u64::from_le_bytes)
    }
}

fn read_array<const N: usize>(data: &[u8], offset: usize) -> Result<[u8; N]> {
    offset
        .checked_add(N)
        .and_then(|end| data.get(offset..end))
        .and_then(|bytes| bytes.try_into().ok())
        .ok_or(MachoError::Truncated { offset, needed: N })
}

/// Borrow `size` bytes at `offset`, failing with `Truncated` past the end
pub fn slice_at(data: &[u8], offset: usize, size: usize) -> Result<&[u8]> {
    offset
        .checked_add(size)
        .and_then(|end| data.get(offset..end))
        .ok_or(MachoError::Truncated {
            offset,
            needed: size,
        })
}

/// Borrow a file-relative table region, failing with `TableOutOfBounds`
pub fn table_slice<'a>(
    data: &'a [u8],
    table: &'static str,
    offset: u64,
    size: u64,
) -> Result<&'a [u8]> {
    let out_of_bounds = MachoError::TableOutOfBounds {
        table,
        offset,
        size,
    };
    let start = usize::try_from(offset).map_err(|_| out_of_bounds.clone())?;
    let len = usize::try_from(size).map_err(|_| out_of_bounds.clone())?;
    slice_at(data, start, len).map_err(|_| out_of_bounds)
}

/// Read a fixed-width, NUL-padded name (segment and section names)
pub fn read_fixed_name(data: &[u8], offset: usize, width: usize) -> Result<String> {
    let raw = slice_at(data, offset, width)?;
    let end = memchr::memchr(0, raw).unwrap_or(raw.len());
    Ok(String::from_utf8_lossy(&raw[..end]).into_owned())
}

/// Read a NUL-terminated string starting at `offset`.
///
/// The string ends at the first NUL or at the end of `data`.
pub fn read_cstring(data: &[u8], offset: usize) -> Option<&[u8]> {
    let tail = data.get(offset..)?;
    let end = memchr::memchr(0, tail).unwrap_or(tail.len());
    Some(&tail[..end])
}

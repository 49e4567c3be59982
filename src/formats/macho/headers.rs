//! Mach-O header parsing

use crate::formats::macho::types::*;
use crate::formats::macho::utils::LeRead;

/// Parse and validate the 64-bit Mach-O header.
///
/// The magic is the only gate: anything that is not `MH_MAGIC_64` in little
/// endian order is `NotMachO`, including byte-swapped, 32-bit and fat images.
pub fn parse_header(data: &[u8]) -> Result<MachHeader> {
    if data.len() < 4 {
        return Err(MachoError::NotMachO {
            magic: partial_magic(data),
        });
    }

    let magic = data.read_u32(0)?;
    if magic != MH_MAGIC_64 {
        return Err(MachoError::NotMachO { magic });
    }

    if data.len() < MACH_HEADER_64_SIZE {
        return Err(MachoError::Truncated {
            offset: 0,
            needed: MACH_HEADER_64_SIZE,
        });
    }

    Ok(MachHeader {
        magic,
        cputype: data.read_u32(4)?,
        cpusubtype: data.read_u32(8)?,
        filetype: data.read_u32(12)?,
        ncmds: data.read_u32(16)?,
        sizeofcmds: data.read_u32(20)?,
        flags: data.read_u32(24)?,
        reserved: data.read_u32(28)?,
    })
}

fn partial_magic(data: &[u8]) -> u32 {
    let mut bytes = [0u8; 4];
    bytes[..data.len()].copy_from_slice(data);
    u32::from_le_bytes(bytes)
}

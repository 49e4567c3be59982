//! Segment and section parsing

use crate::formats::macho::types::*;
use crate::formats::macho::utils::{read_fixed_name, LeRead};
use tracing::trace;

/// Parse an `LC_SEGMENT_64` command body.
///
/// `command` is the command's own byte span (exactly `cmdsize` bytes). The
/// section array starts right after the fixed segment fields and must fit
/// inside that span.
pub fn parse_segment(command: &[u8], index: usize) -> Result<Segment> {
    let cmdsize = command.len() as u32;
    if command.len() < SEGMENT_COMMAND_64_SIZE {
        return Err(MachoError::Truncated {
            offset: 0,
            needed: SEGMENT_COMMAND_64_SIZE,
        });
    }

    let nsects = command.read_u32(64)?;
    let sections_size = (nsects as u64) * (SECTION_64_SIZE as u64);
    if sections_size > (command.len() - SEGMENT_COMMAND_64_SIZE) as u64 {
        return Err(MachoError::SectionsOverflow {
            index,
            nsects,
            cmdsize,
        });
    }

    let mut sections = Vec::with_capacity(nsects as usize);
    for i in 0..nsects as usize {
        let offset = SEGMENT_COMMAND_64_SIZE + i * SECTION_64_SIZE;
        sections.push(parse_section(command, offset)?);
    }

    let segment = Segment {
        cmdsize,
        name: read_fixed_name(command, 8, 16)?,
        vmaddr: command.read_u64(24)?,
        vmsize: command.read_u64(32)?,
        fileoff: command.read_u64(40)?,
        filesize: command.read_u64(48)?,
        maxprot: command.read_u32(56)?,
        initprot: command.read_u32(60)?,
        nsects,
        flags: command.read_u32(68)?,
        sections,
    };

    trace!(
        segment = %segment.name,
        vmaddr = segment.vmaddr,
        nsects = segment.nsects,
        "Parsed segment"
    );

    Ok(segment)
}

/// Parse a single `section_64` record
fn parse_section(data: &[u8], offset: usize) -> Result<Section> {
    Ok(Section {
        name: read_fixed_name(data, offset, 16)?,
        segment_name: read_fixed_name(data, offset + 16, 16)?,
        addr: data.read_u64(offset + 32)?,
        size: data.read_u64(offset + 40)?,
        offset: data.read_u32(offset + 48)?,
        align: data.read_u32(offset + 52)?,
        reloff: data.read_u32(offset + 56)?,
        nreloc: data.read_u32(offset + 60)?,
        flags: data.read_u32(offset + 64)?,
        reserved1: data.read_u32(offset + 68)?,
        reserved2: data.read_u32(offset + 72)?,
        reserved3: data.read_u32(offset + 76)?,
    })
}

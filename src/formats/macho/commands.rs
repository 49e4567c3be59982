//! Load command walking
//!
//! Commands are visited strictly in file order. The cursor starts right after
//! the header and advances by each command's declared `cmdsize`; a size that
//! is too small to make progress, or that would run past the command area or
//! the buffer, ends the walk with `TruncatedCommand`.

use crate::formats::macho::dysymtab::parse_dysymtab_command;
use crate::formats::macho::segments::parse_segment;
use crate::formats::macho::symbols::parse_symtab_command;
use crate::formats::macho::types::*;
use crate::formats::macho::utils::LeRead;
use tracing::{debug, trace};

/// Iterator over the load commands of an image.
///
/// Yields at most `ncmds` items. After the first error it is exhausted.
pub struct LoadCommands<'data> {
    data: &'data [u8],
    offset: usize,
    limit: usize,
    index: usize,
    ncmds: usize,
    done: bool,
}

impl<'data> LoadCommands<'data> {
    pub fn new(data: &'data [u8], header: &MachHeader) -> Self {
        Self {
            data,
            offset: MACH_HEADER_64_SIZE,
            limit: header.commands_end().min(data.len()),
            index: 0,
            ncmds: header.ncmds as usize,
            done: false,
        }
    }

    /// Bytes consumed so far, counted from the end of the header
    pub fn bytes_walked(&self) -> usize {
        self.offset - MACH_HEADER_64_SIZE
    }

    fn next_command(&mut self) -> Result<LoadCommand> {
        let index = self.index;
        let offset = self.offset;

        let truncated = |cmdsize: u32| MachoError::TruncatedCommand {
            index,
            offset,
            cmdsize,
        };

        if offset + LOAD_COMMAND_SIZE > self.limit {
            let cmdsize = self.data.read_u32(offset + 4).unwrap_or(0);
            return Err(truncated(cmdsize));
        }

        let cmd = self.data.read_u32(offset)?;
        let cmdsize = self.data.read_u32(offset + 4)?;
        let size = cmdsize as usize;
        if size < LOAD_COMMAND_SIZE || size > self.limit - offset {
            return Err(truncated(cmdsize));
        }

        let span = &self.data[offset..offset + size];
        let kind = classify(cmd, span, index).map_err(|e| match e {
            MachoError::Truncated { .. } => truncated(cmdsize),
            other => other,
        })?;

        trace!(
            index,
            offset,
            cmd = format_args!("{:#x}", cmd),
            cmdsize,
            "Load command"
        );

        self.offset += size;
        self.index += 1;

        Ok(LoadCommand {
            index,
            offset,
            cmd,
            cmdsize,
            kind,
        })
    }
}

impl Iterator for LoadCommands<'_> {
    type Item = Result<LoadCommand>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.index >= self.ncmds {
            return None;
        }
        let item = self.next_command();
        if item.is_err() {
            self.done = true;
        }
        Some(item)
    }
}

/// Turn one command span into its typed variant
fn classify(cmd: u32, span: &[u8], index: usize) -> Result<LoadCommandKind> {
    Ok(match cmd {
        LC_SEGMENT_64 => LoadCommandKind::Segment(parse_segment(span, index)?),
        LC_SYMTAB => LoadCommandKind::Symtab(parse_symtab_command(span)?),
        LC_DYSYMTAB => LoadCommandKind::Dysymtab(parse_dysymtab_command(span)?),
        other => LoadCommandKind::Other(other),
    })
}

/// Result of walking the whole command list.
///
/// `commands` holds everything visited before `error`, so a caller still
/// sees the well-formed prefix of a damaged list.
#[derive(Debug, Clone, Default)]
pub struct CommandWalk {
    pub commands: Vec<LoadCommand>,
    pub error: Option<MachoError>,
    /// Sum of the `cmdsize` fields of `commands`
    pub bytes_walked: usize,
}

impl CommandWalk {
    pub fn into_result(self) -> Result<Vec<LoadCommand>> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.commands),
        }
    }
}

/// Walk every load command, stopping at the first structural failure
pub fn walk_load_commands(data: &[u8], header: &MachHeader) -> CommandWalk {
    let mut iter = LoadCommands::new(data, header);
    let mut walk = CommandWalk::default();

    for item in iter.by_ref() {
        match item {
            Ok(command) => walk.commands.push(command),
            Err(err) => {
                debug!(error = %err, "Load command walk stopped");
                walk.error = Some(err);
                break;
            }
        }
    }
    walk.bytes_walked = iter.bytes_walked();

    debug!(
        visited = walk.commands.len(),
        ncmds = header.ncmds,
        bytes = walk.bytes_walked,
        "Walked load commands"
    );

    walk
}

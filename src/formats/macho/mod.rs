//! Mach-O (64-bit) parser
//!
//! A read-only parser over an immutable image buffer: header, load commands,
//! segments and sections, the symbol and string tables, the dynamic symbol
//! table and the indirect symbol bindings of pointer sections.

pub mod bindings;
pub mod commands;
pub mod dysymtab;
pub mod headers;
pub mod segments;
pub mod symbols;
pub mod types;
pub mod utils;

use bindings::{BindingResolver, BindingSet};
use commands::walk_load_commands;
use dysymtab::IndirectSymbolTable;
use headers::parse_header;
use symbols::SymbolTable;
pub use types::*;

/// Main Mach-O parser
pub struct MachoParser<'data> {
    data: &'data [u8],
    header: MachHeader,
    commands: Vec<LoadCommand>,
    bytes_walked: usize,
}

impl<'data> MachoParser<'data> {
    /// Parse the header and walk the load commands.
    ///
    /// Fails on a bad magic or on the first structurally invalid command.
    pub fn parse(data: &'data [u8]) -> Result<Self> {
        let header = parse_header(data)?;
        let walk = walk_load_commands(data, &header);
        let bytes_walked = walk.bytes_walked;
        let commands = walk.into_result()?;

        Ok(Self {
            data,
            header,
            commands,
            bytes_walked,
        })
    }

    /// Get Mach-O header
    pub fn header(&self) -> &MachHeader {
        &self.header
    }

    /// Get raw data
    pub fn data(&self) -> &'data [u8] {
        self.data
    }

    /// Load commands in file order
    pub fn load_commands(&self) -> &[LoadCommand] {
        &self.commands
    }

    /// `LC_SEGMENT_64` commands in file order
    pub fn segments(&self) -> impl Iterator<Item = &Segment> + '_ {
        self.commands.iter().filter_map(|c| match &c.kind {
            LoadCommandKind::Segment(seg) => Some(seg),
            _ => None,
        })
    }

    /// The `LC_SYMTAB` command, if present.
    ///
    /// When an image carries more than one, the last one wins.
    pub fn symtab_command(&self) -> Option<&SymtabCommand> {
        self.commands.iter().rev().find_map(|c| match &c.kind {
            LoadCommandKind::Symtab(symtab) => Some(symtab),
            _ => None,
        })
    }

    /// The `LC_DYSYMTAB` command, if present
    pub fn dysymtab_command(&self) -> Option<&DysymtabCommand> {
        self.commands.iter().rev().find_map(|c| match &c.kind {
            LoadCommandKind::Dysymtab(dysymtab) => Some(dysymtab),
            _ => None,
        })
    }

    /// Get symbol table
    pub fn symbols(&self) -> Result<Option<SymbolTable<'data>>> {
        self.symtab_command()
            .map(|cmd| SymbolTable::parse(self.data, cmd))
            .transpose()
    }

    /// Get indirect symbol table
    pub fn indirect_symbols(&self) -> Result<Option<IndirectSymbolTable<'data>>> {
        self.dysymtab_command()
            .map(|cmd| IndirectSymbolTable::parse(self.data, cmd))
            .transpose()
    }

    /// Resolve the symbol pointer sections of `pointer_segments`, stopping
    /// after `max_bindings` bindings when a limit is given.
    ///
    /// Returns `None` when the image has no `LC_SYMTAB` or no `LC_DYSYMTAB`;
    /// such an image simply has nothing to bind.
    pub fn bindings(
        &self,
        pointer_segments: &[String],
        max_bindings: Option<usize>,
    ) -> Result<Option<BindingSet>> {
        let (Some(symbols), Some(indirect)) = (self.symbols()?, self.indirect_symbols()?) else {
            return Ok(None);
        };
        let resolver =
            BindingResolver::new(&symbols, &indirect, pointer_segments).with_limit(max_bindings);
        Ok(Some(resolver.resolve(self.segments())))
    }

    /// Sum of the `cmdsize` fields of all walked commands
    pub fn commands_size(&self) -> usize {
        self.bytes_walked
    }

    /// Validate Mach-O structure
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.bytes_walked != self.header.sizeofcmds as usize {
            errors.push(format!(
                "sizeofcmds is {} but load commands occupy {} bytes",
                self.header.sizeofcmds, self.bytes_walked
            ));
        }

        if self.header.commands_end() > self.data.len() {
            errors.push(format!(
                "sizeofcmds {} extends past the end of the image ({} bytes)",
                self.header.sizeofcmds,
                self.data.len()
            ));
        }

        match (self.symtab_command(), self.dysymtab_command()) {
            (None, _) => errors.push("No LC_SYMTAB command".to_string()),
            (_, None) => errors.push("No LC_DYSYMTAB command".to_string()),
            _ => {}
        }

        for seg in self.segments() {
            for sect in &seg.sections {
                if sect.segment_name != seg.name {
                    errors.push(format!(
                        "Section {} names segment {} but is stored in {}",
                        sect.name, sect.segment_name, seg.name
                    ));
                }
            }
        }

        errors
    }
}

//! Dynamic symbol table and indirect symbol table parsing

use crate::formats::macho::types::*;
use crate::formats::macho::utils::{table_slice, LeRead};
use serde::Serialize;
use tracing::debug;

/// Parse an `LC_DYSYMTAB` command body
pub fn parse_dysymtab_command(command: &[u8]) -> Result<DysymtabCommand> {
    if command.len() < DYSYMTAB_COMMAND_SIZE {
        return Err(MachoError::Truncated {
            offset: 0,
            needed: DYSYMTAB_COMMAND_SIZE,
        });
    }
    Ok(DysymtabCommand {
        ilocalsym: command.read_u32(8)?,
        nlocalsym: command.read_u32(12)?,
        iextdefsym: command.read_u32(16)?,
        nextdefsym: command.read_u32(20)?,
        iundefsym: command.read_u32(24)?,
        nundefsym: command.read_u32(28)?,
        tocoff: command.read_u32(32)?,
        ntoc: command.read_u32(36)?,
        modtaboff: command.read_u32(40)?,
        nmodtab: command.read_u32(44)?,
        extrefsymoff: command.read_u32(48)?,
        nextrefsyms: command.read_u32(52)?,
        indirectsymoff: command.read_u32(56)?,
        nindirectsyms: command.read_u32(60)?,
        extreloff: command.read_u32(64)?,
        nextrel: command.read_u32(68)?,
        locreloff: command.read_u32(72)?,
        nlocrel: command.read_u32(76)?,
    })
}

/// A decoded indirect symbol table entry.
///
/// The sentinels share the 32-bit space with real indices, so entries are
/// decoded before anything is used as a symbol-table index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IndirectEntry {
    /// Index into the symbol table
    Symbol(u32),
    /// `INDIRECT_SYMBOL_LOCAL`
    Local,
    /// `INDIRECT_SYMBOL_ABS`
    Absolute,
    /// `INDIRECT_SYMBOL_LOCAL | INDIRECT_SYMBOL_ABS`
    LocalAbsolute,
}

impl IndirectEntry {
    pub fn decode(raw: u32) -> Self {
        match raw {
            INDIRECT_SYMBOL_LOCAL => IndirectEntry::Local,
            INDIRECT_SYMBOL_ABS => IndirectEntry::Absolute,
            v if v == INDIRECT_SYMBOL_LOCAL | INDIRECT_SYMBOL_ABS => IndirectEntry::LocalAbsolute,
            index => IndirectEntry::Symbol(index),
        }
    }

    /// Symbol-table index, if the entry names an external symbol
    pub fn symbol_index(&self) -> Option<u32> {
        match self {
            IndirectEntry::Symbol(index) => Some(*index),
            _ => None,
        }
    }

    pub fn is_external(&self) -> bool {
        self.symbol_index().is_some()
    }
}

/// The `nindirectsyms` 32-bit entries at `indirectsymoff`
#[derive(Debug, Clone, Copy)]
pub struct IndirectSymbolTable<'data> {
    data: &'data [u8],
    count: u32,
}

impl<'data> IndirectSymbolTable<'data> {
    pub fn parse(data: &'data [u8], dysymtab: &DysymtabCommand) -> Result<Self> {
        let size = dysymtab.nindirectsyms as u64 * INDIRECT_ENTRY_SIZE as u64;
        let table = table_slice(
            data,
            "indirect symbol table",
            dysymtab.indirectsymoff as u64,
            size,
        )?;

        debug!(
            indirectsymoff = dysymtab.indirectsymoff,
            nindirectsyms = dysymtab.nindirectsyms,
            "Located indirect symbol table"
        );

        Ok(Self {
            data: table,
            count: dysymtab.nindirectsyms,
        })
    }

    /// Raw entry at `index`
    pub fn raw(&self, index: u64) -> Result<u32> {
        if index >= self.count as u64 {
            return Err(MachoError::IndirectIndexOutOfBounds {
                index,
                count: self.count,
            });
        }
        self.data.read_u32(index as usize * INDIRECT_ENTRY_SIZE)
    }

    /// Decoded entry at `index`
    pub fn entry(&self, index: u64) -> Result<IndirectEntry> {
        self.raw(index).map(IndirectEntry::decode)
    }

    /// All decoded entries in table order
    pub fn entries(&self) -> impl Iterator<Item = IndirectEntry> + '_ {
        self.data
            .chunks_exact(INDIRECT_ENTRY_SIZE)
            .filter_map(|chunk| chunk.read_u32(0).ok())
            .map(IndirectEntry::decode)
    }

    pub fn count(&self) -> u32 {
        self.count
    }
}

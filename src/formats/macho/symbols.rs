//! Symbol and string table parsing

use crate::formats::macho::types::*;
use crate::formats::macho::utils::{read_cstring, table_slice, LeRead};
use serde::Serialize;
use std::borrow::Cow;
use tracing::{debug, warn};

/// Placeholder shown for a symbol whose name cannot be resolved
pub const INVALID_NAME: &str = "<invalid>";

/// Parse an `LC_SYMTAB` command body
pub fn parse_symtab_command(command: &[u8]) -> Result<SymtabCommand> {
    if command.len() < SYMTAB_COMMAND_SIZE {
        return Err(MachoError::Truncated {
            offset: 0,
            needed: SYMTAB_COMMAND_SIZE,
        });
    }
    Ok(SymtabCommand {
        symoff: command.read_u32(8)?,
        nsyms: command.read_u32(12)?,
        stroff: command.read_u32(16)?,
        strsize: command.read_u32(20)?,
    })
}

/// The string blob at `stroff..stroff + strsize`.
///
/// Names are addressed by byte offset only and run to the next NUL or the
/// end of the blob.
#[derive(Debug, Clone, Copy)]
pub struct StringTable<'data> {
    data: &'data [u8],
}

impl<'data> StringTable<'data> {
    pub fn parse(data: &'data [u8], symtab: &SymtabCommand) -> Result<Self> {
        let blob = table_slice(
            data,
            "string table",
            symtab.stroff as u64,
            symtab.strsize as u64,
        )?;
        Ok(Self { data: blob })
    }

    /// Wrap an already isolated string blob
    pub fn from_bytes(data: &'data [u8]) -> Self {
        Self { data }
    }

    /// Raw bytes of the string at `strx`
    pub fn get(&self, strx: u32) -> Result<&'data [u8]> {
        if strx == 0 {
            return Ok(&[]);
        }
        let strsize = self.data.len() as u32;
        if strx >= strsize {
            return Err(MachoError::NameOutOfBounds { strx, strsize });
        }
        read_cstring(self.data, strx as usize).ok_or(MachoError::NameOutOfBounds { strx, strsize })
    }

    /// String at `strx`, with invalid UTF-8 replaced
    pub fn name(&self, strx: u32) -> Result<Cow<'data, str>> {
        self.get(strx).map(String::from_utf8_lossy)
    }
}

/// The `nlist_64` array at `symoff` together with its string table
#[derive(Debug, Clone, Copy)]
pub struct SymbolTable<'data> {
    entries: &'data [u8],
    nsyms: u32,
    strings: StringTable<'data>,
}

impl<'data> SymbolTable<'data> {
    /// Locate the symbol and string tables described by `LC_SYMTAB`.
    ///
    /// Both regions must lie inside the image; individual names are only
    /// checked when they are resolved.
    pub fn parse(data: &'data [u8], symtab: &SymtabCommand) -> Result<Self> {
        let size = symtab.nsyms as u64 * NLIST_64_SIZE as u64;
        let entries = table_slice(data, "symbol table", symtab.symoff as u64, size)?;
        let strings = StringTable::parse(data, symtab)?;

        debug!(
            symoff = symtab.symoff,
            nsyms = symtab.nsyms,
            stroff = symtab.stroff,
            strsize = symtab.strsize,
            "Located symbol table"
        );

        Ok(Self {
            entries,
            nsyms: symtab.nsyms,
            strings,
        })
    }

    /// Get symbol record by index
    pub fn get(&self, index: u32) -> Result<Nlist> {
        if index >= self.nsyms {
            return Err(MachoError::SymbolIndexOutOfBounds {
                index,
                nsyms: self.nsyms,
            });
        }
        parse_nlist(self.entries, index as usize * NLIST_64_SIZE)
    }

    /// Resolve the name of a symbol record
    pub fn name_of(&self, symbol: &Nlist) -> Result<Cow<'data, str>> {
        self.strings.name(symbol.n_strx)
    }

    /// Fetch the symbol at `index` and resolve its name
    pub fn name_at(&self, index: u32) -> Result<Cow<'data, str>> {
        let symbol = self.get(index)?;
        self.name_of(&symbol)
    }

    /// All symbol records in table order
    pub fn symbols(&self) -> impl Iterator<Item = Nlist> + '_ {
        self.entries
            .chunks_exact(NLIST_64_SIZE)
            .filter_map(|chunk| parse_nlist(chunk, 0).ok())
    }

    /// All symbols with their names resolved.
    ///
    /// A bad name offset only affects its own entry.
    pub fn entries(&self) -> Vec<SymbolEntry> {
        self.symbols()
            .enumerate()
            .map(|(index, nlist)| {
                let name = match self.name_of(&nlist) {
                    Ok(name) => SymbolName::Resolved {
                        name: name.into_owned(),
                    },
                    Err(err) => {
                        warn!(index, error = %err, "Unresolvable symbol name");
                        SymbolName::Unresolved {
                            strx: nlist.n_strx,
                            reason: err.to_string(),
                        }
                    }
                };
                SymbolEntry {
                    index: index as u32,
                    nlist,
                    name,
                }
            })
            .collect()
    }

    /// Count symbols
    pub fn count(&self) -> u32 {
        self.nsyms
    }
}

/// Parse a single `nlist_64`
fn parse_nlist(data: &[u8], offset: usize) -> Result<Nlist> {
    Ok(Nlist {
        n_strx: data.read_u32(offset)?,
        n_type: data.read_u8(offset + 4)?,
        n_sect: data.read_u8(offset + 5)?,
        n_desc: data.read_u16(offset + 6)?,
        n_value: data.read_u64(offset + 8)?,
    })
}

/// Outcome of looking up a symbol's name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SymbolName {
    Resolved { name: String },
    Unresolved { strx: u32, reason: String },
}

impl SymbolName {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Resolved { name } => name,
            Self::Unresolved { .. } => INVALID_NAME,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved { .. })
    }
}

/// Symbol record with its resolved name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymbolEntry {
    pub index: u32,
    pub nlist: Nlist,
    pub name: SymbolName,
}

impl SymbolEntry {
    pub fn name(&self) -> &str {
        self.name.as_str()
    }
}

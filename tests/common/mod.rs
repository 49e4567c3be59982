//! Common test utilities and helpers.
//!
//! Integration tests assemble their Mach-O images in memory with
//! [`MachoBuilder`] instead of relying on sample binaries.

#![allow(dead_code)]


use machscope::formats::macho::*;

/// A section inside a [`SegmentSpec`]
#[derive(Debug, Clone)]
pub struct SectionSpec {
    pub name: String,
    pub flags: u32,
    pub size: u64,
    pub reserved1: u32,
}

impl SectionSpec {
    pub fn new(name: &str, flags: u32, size: u64, reserved1: u32) -> Self {
        Self {
            name: name.to_string(),
            flags,
            size,
            reserved1,
        }
    }

    /// Non-lazy symbol pointer section with `slots` pointers
    pub fn non_lazy(slots: u64, reserved1: u32) -> Self {
        Self::new(
            "__nl_symbol_ptr",
            S_NON_LAZY_SYMBOL_POINTERS,
            slots * 8,
            reserved1,
        )
    }

    /// Lazy symbol pointer section with `slots` pointers
    pub fn lazy(slots: u64, reserved1: u32) -> Self {
        Self::new("__la_symbol_ptr", S_LAZY_SYMBOL_POINTERS, slots * 8, reserved1)
    }

    /// Plain code section
    pub fn text(size: u64) -> Self {
        Self::new("__text", S_REGULAR | 0x8000_0400, size, 0)
    }
}

#[derive(Debug, Clone)]
pub struct SegmentSpec {
    pub name: String,
    pub vmaddr: u64,
    pub sections: Vec<SectionSpec>,
}

#[derive(Debug, Clone)]
enum CommandSpec {
    Segment(SegmentSpec),
    Symtab,
    Dysymtab,
    Raw(Vec<u8>),
}

#[derive(Debug, Clone)]
enum SymbolSpec {
    Named(String),
    Raw(u32),
}

/// Assembles a little-endian 64-bit Mach-O image.
///
/// Commands are emitted in the order they are added. The symbol, string and
/// indirect tables are laid out after the command area.
#[derive(Debug, Clone, Default)]
pub struct MachoBuilder {
    commands: Vec<CommandSpec>,
    symbols: Vec<SymbolSpec>,
    indirect: Vec<u32>,
    ncmds_override: Option<u32>,
    sizeofcmds_override: Option<u32>,
}

impl MachoBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn segment(mut self, name: &str, vmaddr: u64, sections: Vec<SectionSpec>) -> Self {
        self.commands.push(CommandSpec::Segment(SegmentSpec {
            name: name.to_string(),
            vmaddr,
            sections,
        }));
        self
    }

    pub fn symtab(mut self) -> Self {
        self.commands.push(CommandSpec::Symtab);
        self
    }

    pub fn dysymtab(mut self) -> Self {
        self.commands.push(CommandSpec::Dysymtab);
        self
    }

    /// Append an arbitrary command; `bytes` must start with `cmd` and `cmdsize`
    pub fn raw_command(mut self, bytes: Vec<u8>) -> Self {
        self.commands.push(CommandSpec::Raw(bytes));
        self
    }

    /// Add symbols by name; an empty name gets `n_strx == 0`
    pub fn symbols(mut self, names: &[&str]) -> Self {
        self.symbols
            .extend(names.iter().map(|n| SymbolSpec::Named(n.to_string())));
        self
    }

    /// Add a symbol with an explicit string table offset
    pub fn raw_symbol(mut self, strx: u32) -> Self {
        self.symbols.push(SymbolSpec::Raw(strx));
        self
    }

    pub fn indirect(mut self, entries: &[u32]) -> Self {
        self.indirect.extend_from_slice(entries);
        self
    }

    pub fn ncmds(mut self, ncmds: u32) -> Self {
        self.ncmds_override = Some(ncmds);
        self
    }

    pub fn sizeofcmds(mut self, sizeofcmds: u32) -> Self {
        self.sizeofcmds_override = Some(sizeofcmds);
        self
    }

    fn string_table(&self) -> (Vec<u8>, Vec<u32>) {
        let mut strings = vec![0u8];
        let mut offsets = Vec::with_capacity(self.symbols.len());
        for sym in &self.symbols {
            match sym {
                SymbolSpec::Named(name) if name.is_empty() => offsets.push(0),
                SymbolSpec::Named(name) => {
                    offsets.push(strings.len() as u32);
                    strings.extend_from_slice(name.as_bytes());
                    strings.push(0);
                }
                SymbolSpec::Raw(strx) => offsets.push(*strx),
            }
        }
        (strings, offsets)
    }

    fn command_size(cmd: &CommandSpec) -> usize {
        match cmd {
            CommandSpec::Segment(seg) => {
                SEGMENT_COMMAND_64_SIZE + seg.sections.len() * SECTION_64_SIZE
            }
            CommandSpec::Symtab => SYMTAB_COMMAND_SIZE,
            CommandSpec::Dysymtab => DYSYMTAB_COMMAND_SIZE,
            CommandSpec::Raw(bytes) => bytes.len(),
        }
    }

    pub fn build(&self) -> Vec<u8> {
        let (strings, strx) = self.string_table();
        let sizeofcmds: usize = self.commands.iter().map(Self::command_size).sum();

        let symoff = align(MACH_HEADER_64_SIZE + sizeofcmds, 8);
        let nsyms = self.symbols.len();
        let stroff = symoff + nsyms * NLIST_64_SIZE;
        let strsize = strings.len();
        let indirectsymoff = align(stroff + strsize, 4);
        let total = indirectsymoff + self.indirect.len() * INDIRECT_ENTRY_SIZE;

        let mut out = Vec::with_capacity(total);
        put_u32(&mut out, MH_MAGIC_64);
        put_u32(&mut out, CPU_TYPE_X86_64);
        put_u32(&mut out, 3);
        put_u32(&mut out, 2);
        put_u32(
            &mut out,
            self.ncmds_override.unwrap_or(self.commands.len() as u32),
        );
        put_u32(
            &mut out,
            self.sizeofcmds_override.unwrap_or(sizeofcmds as u32),
        );
        put_u32(&mut out, 0x0020_0085);
        put_u32(&mut out, 0);

        for cmd in &self.commands {
            match cmd {
                CommandSpec::Segment(seg) => write_segment(&mut out, seg),
                CommandSpec::Symtab => {
                    put_u32(&mut out, LC_SYMTAB);
                    put_u32(&mut out, SYMTAB_COMMAND_SIZE as u32);
                    put_u32(&mut out, symoff as u32);
                    put_u32(&mut out, nsyms as u32);
                    put_u32(&mut out, stroff as u32);
                    put_u32(&mut out, strsize as u32);
                }
                CommandSpec::Dysymtab => {
                    put_u32(&mut out, LC_DYSYMTAB);
                    put_u32(&mut out, DYSYMTAB_COMMAND_SIZE as u32);
                    let mut fields = [0u32; 18];
                    // every symbol is an undefined external
                    fields[4] = 0;
                    fields[5] = nsyms as u32;
                    fields[12] = indirectsymoff as u32;
                    fields[13] = self.indirect.len() as u32;
                    for f in fields {
                        put_u32(&mut out, f);
                    }
                }
                CommandSpec::Raw(bytes) => out.extend_from_slice(bytes),
            }
        }

        out.resize(symoff, 0);
        for offset in &strx {
            put_u32(&mut out, *offset);
            out.push(N_EXT);
            out.push(0);
            out.extend_from_slice(&0u16.to_le_bytes());
            out.extend_from_slice(&0u64.to_le_bytes());
        }
        out.extend_from_slice(&strings);
        out.resize(indirectsymoff, 0);
        for entry in &self.indirect {
            put_u32(&mut out, *entry);
        }
        out
    }
}

fn write_segment(out: &mut Vec<u8>, seg: &SegmentSpec) {
    let cmdsize = SEGMENT_COMMAND_64_SIZE + seg.sections.len() * SECTION_64_SIZE;
    let vmsize: u64 = seg.sections.iter().map(|s| s.size).sum::<u64>().max(0x1000);

    put_u32(out, LC_SEGMENT_64);
    put_u32(out, cmdsize as u32);
    put_name(out, &seg.name);
    put_u64(out, seg.vmaddr);
    put_u64(out, vmsize);
    put_u64(out, 0);
    put_u64(out, 0);
    put_u32(out, 7);
    put_u32(out, if seg.name == "__TEXT" { 5 } else { 3 });
    put_u32(out, seg.sections.len() as u32);
    put_u32(out, 0);

    let mut addr = seg.vmaddr;
    for sect in &seg.sections {
        put_name(out, &sect.name);
        put_name(out, &seg.name);
        put_u64(out, addr);
        put_u64(out, sect.size);
        put_u32(out, 0);
        put_u32(out, 3);
        put_u32(out, 0);
        put_u32(out, 0);
        put_u32(out, sect.flags);
        put_u32(out, sect.reserved1);
        put_u32(out, 0);
        put_u32(out, 0);
        addr += sect.size;
    }
}

fn align(value: usize, to: usize) -> usize {
    value.div_ceil(to) * to
}

pub fn put_u32(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_le_bytes());
}

pub fn put_u64(out: &mut Vec<u8>, v: u64) {
    out.extend_from_slice(&v.to_le_bytes());
}

fn put_name(out: &mut Vec<u8>, name: &str) {
    let mut field = [0u8; 16];
    let n = name.len().min(16);
    field[..n].copy_from_slice(&name.as_bytes()[..n]);
    out.extend_from_slice(&field);
}

/// A raw command of `cmdsize` bytes with the header filled in
pub fn raw_command(cmd: u32, cmdsize: u32, len: usize) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(len);
    put_u32(&mut bytes, cmd);
    put_u32(&mut bytes, cmdsize);
    bytes.resize(len, 0);
    bytes
}

pub const TEXT_VMADDR: u64 = 0x1_0000_0000;
pub const DATA_VMADDR: u64 = 0x1_0000_4000;

/// `__TEXT` without sections, `__DATA` with a two-slot non-lazy pointer
/// section, a symbol table naming `_foo` and `_bar` and the indirect table
/// `[1, 2]`.
pub fn two_import_image() -> MachoBuilder {
    MachoBuilder::new()
        .segment("__TEXT", TEXT_VMADDR, vec![])
        .segment("__DATA", DATA_VMADDR, vec![SectionSpec::non_lazy(2, 0)])
        .symtab()
        .dysymtab()
        .symbols(&["", "_foo", "_bar"])
        .indirect(&[1, 2])
}

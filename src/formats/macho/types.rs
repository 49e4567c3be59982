//! Core Mach-O types and constants

use bitflags::bitflags;
use serde::Serialize;
use thiserror::Error;

/// Mach-O parsing errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MachoError {
    #[error("Not a 64-bit Mach-O image (magic {magic:#010x})")]
    NotMachO { magic: u32 },

    #[error("Truncated at {offset:#x}, needed {needed} bytes")]
    Truncated { offset: usize, needed: usize },

    #[error("Load command {index} at {offset:#x} has invalid size {cmdsize}")]
    TruncatedCommand {
        index: usize,
        offset: usize,
        cmdsize: u32,
    },

    #[error("Load command {index} declares {nsects} sections, which do not fit in {cmdsize} bytes")]
    SectionsOverflow {
        index: usize,
        nsects: u32,
        cmdsize: u32,
    },

    #[error("{table} at {offset:#x} ({size} bytes) lies outside the image")]
    TableOutOfBounds {
        table: &'static str,
        offset: u64,
        size: u64,
    },

    #[error("String table offset {strx} is out of bounds (strsize {strsize})")]
    NameOutOfBounds { strx: u32, strsize: u32 },

    #[error("Indirect symbol index {index} is out of bounds (nindirectsyms {count})")]
    IndirectIndexOutOfBounds { index: u64, count: u32 },

    #[error("Symbol index {index} is out of bounds (nsyms {nsyms})")]
    SymbolIndexOutOfBounds { index: u32, nsyms: u32 },
}

impl MachoError {
    /// Whether the error invalidates every offset that follows it.
    ///
    /// Local errors only cost a single symbol name or pointer slot.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Self::NameOutOfBounds { .. }
                | Self::IndirectIndexOutOfBounds { .. }
                | Self::SymbolIndexOutOfBounds { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, MachoError>;

/// 64-bit Mach-O magic, little endian on disk
pub const MH_MAGIC_64: u32 = 0xfeed_facf;
/// Byte-swapped 64-bit magic (big-endian image)
pub const MH_CIGAM_64: u32 = 0xcffa_edfe;

/// Fixed structure sizes
pub const MACH_HEADER_64_SIZE: usize = 32;
pub const LOAD_COMMAND_SIZE: usize = 8;
pub const SEGMENT_COMMAND_64_SIZE: usize = 72;
pub const SECTION_64_SIZE: usize = 80;
pub const SYMTAB_COMMAND_SIZE: usize = 24;
pub const DYSYMTAB_COMMAND_SIZE: usize = 80;
pub const NLIST_64_SIZE: usize = 16;
pub const INDIRECT_ENTRY_SIZE: usize = 4;
pub const POINTER_SIZE: u64 = 8;

/// Load command identifiers
pub const LC_REQ_DYLD: u32 = 0x8000_0000;
pub const LC_SEGMENT: u32 = 0x1;
pub const LC_SYMTAB: u32 = 0x2;
pub const LC_THREAD: u32 = 0x4;
pub const LC_UNIXTHREAD: u32 = 0x5;
pub const LC_DYSYMTAB: u32 = 0xb;
pub const LC_LOAD_DYLIB: u32 = 0xc;
pub const LC_ID_DYLIB: u32 = 0xd;
pub const LC_LOAD_DYLINKER: u32 = 0xe;
pub const LC_ID_DYLINKER: u32 = 0xf;
pub const LC_LOAD_WEAK_DYLIB: u32 = 0x18 | LC_REQ_DYLD;
pub const LC_SEGMENT_64: u32 = 0x19;
pub const LC_ROUTINES_64: u32 = 0x1a;
pub const LC_UUID: u32 = 0x1b;
pub const LC_RPATH: u32 = 0x1c | LC_REQ_DYLD;
pub const LC_CODE_SIGNATURE: u32 = 0x1d;
pub const LC_SEGMENT_SPLIT_INFO: u32 = 0x1e;
pub const LC_REEXPORT_DYLIB: u32 = 0x1f | LC_REQ_DYLD;
pub const LC_LAZY_LOAD_DYLIB: u32 = 0x20;
pub const LC_ENCRYPTION_INFO: u32 = 0x21;
pub const LC_DYLD_INFO: u32 = 0x22;
pub const LC_DYLD_INFO_ONLY: u32 = 0x22 | LC_REQ_DYLD;
pub const LC_LOAD_UPWARD_DYLIB: u32 = 0x23 | LC_REQ_DYLD;
pub const LC_VERSION_MIN_MACOSX: u32 = 0x24;
pub const LC_VERSION_MIN_IPHONEOS: u32 = 0x25;
pub const LC_FUNCTION_STARTS: u32 = 0x26;
pub const LC_DYLD_ENVIRONMENT: u32 = 0x27;
pub const LC_MAIN: u32 = 0x28 | LC_REQ_DYLD;
pub const LC_DATA_IN_CODE: u32 = 0x29;
pub const LC_SOURCE_VERSION: u32 = 0x2a;
pub const LC_DYLIB_CODE_SIGN_DRS: u32 = 0x2b;
pub const LC_ENCRYPTION_INFO_64: u32 = 0x2c;
pub const LC_LINKER_OPTION: u32 = 0x2d;
pub const LC_LINKER_OPTIMIZATION_HINT: u32 = 0x2e;
pub const LC_VERSION_MIN_TVOS: u32 = 0x2f;
pub const LC_VERSION_MIN_WATCHOS: u32 = 0x30;
pub const LC_NOTE: u32 = 0x31;
pub const LC_BUILD_VERSION: u32 = 0x32;
pub const LC_DYLD_EXPORTS_TRIE: u32 = 0x33 | LC_REQ_DYLD;
pub const LC_DYLD_CHAINED_FIXUPS: u32 = 0x34 | LC_REQ_DYLD;
pub const LC_FILESET_ENTRY: u32 = 0x35 | LC_REQ_DYLD;

/// Symbolic name for a load command identifier
pub fn load_command_name(cmd: u32) -> Option<&'static str> {
    let name = match cmd {
        LC_SEGMENT => "LC_SEGMENT",
        LC_SYMTAB => "LC_SYMTAB",
        LC_THREAD => "LC_THREAD",
        LC_UNIXTHREAD => "LC_UNIXTHREAD",
        LC_DYSYMTAB => "LC_DYSYMTAB",
        LC_LOAD_DYLIB => "LC_LOAD_DYLIB",
        LC_ID_DYLIB => "LC_ID_DYLIB",
        LC_LOAD_DYLINKER => "LC_LOAD_DYLINKER",
        LC_ID_DYLINKER => "LC_ID_DYLINKER",
        LC_LOAD_WEAK_DYLIB => "LC_LOAD_WEAK_DYLIB",
        LC_SEGMENT_64 => "LC_SEGMENT_64",
        LC_ROUTINES_64 => "LC_ROUTINES_64",
        LC_UUID => "LC_UUID",
        LC_RPATH => "LC_RPATH",
        LC_CODE_SIGNATURE => "LC_CODE_SIGNATURE",
        LC_SEGMENT_SPLIT_INFO => "LC_SEGMENT_SPLIT_INFO",
        LC_REEXPORT_DYLIB => "LC_REEXPORT_DYLIB",
        LC_LAZY_LOAD_DYLIB => "LC_LAZY_LOAD_DYLIB",
        LC_ENCRYPTION_INFO => "LC_ENCRYPTION_INFO",
        LC_DYLD_INFO => "LC_DYLD_INFO",
        LC_DYLD_INFO_ONLY => "LC_DYLD_INFO_ONLY",
        LC_LOAD_UPWARD_DYLIB => "LC_LOAD_UPWARD_DYLIB",
        LC_VERSION_MIN_MACOSX => "LC_VERSION_MIN_MACOSX",
        LC_VERSION_MIN_IPHONEOS => "LC_VERSION_MIN_IPHONEOS",
        LC_FUNCTION_STARTS => "LC_FUNCTION_STARTS",
        LC_DYLD_ENVIRONMENT => "LC_DYLD_ENVIRONMENT",
        LC_MAIN => "LC_MAIN",
        LC_DATA_IN_CODE => "LC_DATA_IN_CODE",
        LC_SOURCE_VERSION => "LC_SOURCE_VERSION",
        LC_DYLIB_CODE_SIGN_DRS => "LC_DYLIB_CODE_SIGN_DRS",
        LC_ENCRYPTION_INFO_64 => "LC_ENCRYPTION_INFO_64",
        LC_LINKER_OPTION => "LC_LINKER_OPTION",
        LC_LINKER_OPTIMIZATION_HINT => "LC_LINKER_OPTIMIZATION_HINT",
        LC_VERSION_MIN_TVOS => "LC_VERSION_MIN_TVOS",
        LC_VERSION_MIN_WATCHOS => "LC_VERSION_MIN_WATCHOS",
        LC_NOTE => "LC_NOTE",
        LC_BUILD_VERSION => "LC_BUILD_VERSION",
        LC_DYLD_EXPORTS_TRIE => "LC_DYLD_EXPORTS_TRIE",
        LC_DYLD_CHAINED_FIXUPS => "LC_DYLD_CHAINED_FIXUPS",
        LC_FILESET_ENTRY => "LC_FILESET_ENTRY",
        _ => return None,
    };
    Some(name)
}

/// Section type and attribute masks
pub const SECTION_TYPE: u32 = 0x0000_00ff;
pub const SECTION_ATTRIBUTES: u32 = 0xffff_ff00;

/// Section types
pub const S_REGULAR: u32 = 0x0;
pub const S_ZEROFILL: u32 = 0x1;
pub const S_CSTRING_LITERALS: u32 = 0x2;
pub const S_4BYTE_LITERALS: u32 = 0x3;
pub const S_8BYTE_LITERALS: u32 = 0x4;
pub const S_LITERAL_POINTERS: u32 = 0x5;
pub const S_NON_LAZY_SYMBOL_POINTERS: u32 = 0x6;
pub const S_LAZY_SYMBOL_POINTERS: u32 = 0x7;
pub const S_SYMBOL_STUBS: u32 = 0x8;
pub const S_MOD_INIT_FUNC_POINTERS: u32 = 0x9;
pub const S_MOD_TERM_FUNC_POINTERS: u32 = 0xa;
pub const S_COALESCED: u32 = 0xb;
pub const S_GB_ZEROFILL: u32 = 0xc;
pub const S_INTERPOSING: u32 = 0xd;
pub const S_16BYTE_LITERALS: u32 = 0xe;
pub const S_DTRACE_DOF: u32 = 0xf;
pub const S_LAZY_DYLIB_SYMBOL_POINTERS: u32 = 0x10;
pub const S_THREAD_LOCAL_REGULAR: u32 = 0x11;
pub const S_THREAD_LOCAL_ZEROFILL: u32 = 0x12;
pub const S_THREAD_LOCAL_VARIABLES: u32 = 0x13;
pub const S_THREAD_LOCAL_VARIABLE_POINTERS: u32 = 0x14;
pub const S_THREAD_LOCAL_INIT_FUNCTION_POINTERS: u32 = 0x15;

/// Indirect symbol table sentinels
pub const INDIRECT_SYMBOL_LOCAL: u32 = 0x8000_0000;
pub const INDIRECT_SYMBOL_ABS: u32 = 0x4000_0000;

/// nlist `n_type` masks
pub const N_STAB: u8 = 0xe0;
pub const N_PEXT: u8 = 0x10;
pub const N_TYPE: u8 = 0x0e;
pub const N_EXT: u8 = 0x01;

/// nlist `n_type & N_TYPE` values
pub const N_UNDF: u8 = 0x0;
pub const N_ABS: u8 = 0x2;
pub const N_INDR: u8 = 0xa;
pub const N_PBUD: u8 = 0xc;
pub const N_SECT: u8 = 0xe;

/// CPU types
pub const CPU_ARCH_ABI64: u32 = 0x0100_0000;
pub const CPU_TYPE_X86: u32 = 7;
pub const CPU_TYPE_ARM: u32 = 12;
pub const CPU_TYPE_POWERPC: u32 = 18;
pub const CPU_TYPE_X86_64: u32 = CPU_TYPE_X86 | CPU_ARCH_ABI64;
pub const CPU_TYPE_ARM64: u32 = CPU_TYPE_ARM | CPU_ARCH_ABI64;
pub const CPU_TYPE_POWERPC64: u32 = CPU_TYPE_POWERPC | CPU_ARCH_ABI64;

/// Mach-O CPU type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CpuType {
    X86_64,
    Arm64,
    PowerPC64,
    Other(u32),
}

impl From<u32> for CpuType {
    fn from(val: u32) -> Self {
        match val {
            CPU_TYPE_X86_64 => CpuType::X86_64,
            CPU_TYPE_ARM64 => CpuType::Arm64,
            CPU_TYPE_POWERPC64 => CpuType::PowerPC64,
            other => CpuType::Other(other),
        }
    }
}

/// Mach-O file type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FileType {
    Object,
    Execute,
    FixedVmLibrary,
    Core,
    Preload,
    Dylib,
    Dylinker,
    Bundle,
    DylibStub,
    Dsym,
    KextBundle,
    Fileset,
    Other(u32),
}

impl From<u32> for FileType {
    fn from(val: u32) -> Self {
        match val {
            0x1 => FileType::Object,
            0x2 => FileType::Execute,
            0x3 => FileType::FixedVmLibrary,
            0x4 => FileType::Core,
            0x5 => FileType::Preload,
            0x6 => FileType::Dylib,
            0x7 => FileType::Dylinker,
            0x8 => FileType::Bundle,
            0x9 => FileType::DylibStub,
            0xa => FileType::Dsym,
            0xb => FileType::KextBundle,
            0xc => FileType::Fileset,
            other => FileType::Other(other),
        }
    }
}

bitflags! {
    /// `mach_header_64.flags`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
    pub struct HeaderFlags: u32 {
        const NOUNDEFS = 0x1;
        const INCRLINK = 0x2;
        const DYLDLINK = 0x4;
        const BINDATLOAD = 0x8;
        const PREBOUND = 0x10;
        const SPLIT_SEGS = 0x20;
        const TWOLEVEL = 0x80;
        const FORCE_FLAT = 0x100;
        const NOMULTIDEFS = 0x200;
        const SUBSECTIONS_VIA_SYMBOLS = 0x2000;
        const CANONICAL = 0x4000;
        const WEAK_DEFINES = 0x8000;
        const BINDS_TO_WEAK = 0x1_0000;
        const ALLOW_STACK_EXECUTION = 0x2_0000;
        const ROOT_SAFE = 0x4_0000;
        const SETUID_SAFE = 0x8_0000;
        const NO_REEXPORTED_DYLIBS = 0x10_0000;
        const PIE = 0x20_0000;
        const DEAD_STRIPPABLE_DYLIB = 0x40_0000;
        const HAS_TLV_DESCRIPTORS = 0x80_0000;
        const NO_HEAP_EXECUTION = 0x100_0000;
        const APP_EXTENSION_SAFE = 0x200_0000;
        const DYLIB_IN_CACHE = 0x8000_0000;

        const _ = !0;
    }
}

bitflags! {
    /// Virtual memory protection of a segment
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
    pub struct VmProt: u32 {
        const READ = 0x1;
        const WRITE = 0x2;
        const EXECUTE = 0x4;

        const _ = !0;
    }
}

/// Mach-O header (`mach_header_64`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MachHeader {
    pub magic: u32,
    pub cputype: u32,
    pub cpusubtype: u32,
    pub filetype: u32,
    pub ncmds: u32,
    pub sizeofcmds: u32,
    pub flags: u32,
    pub reserved: u32,
}

impl MachHeader {
    pub fn cpu_type(&self) -> CpuType {
        CpuType::from(self.cputype)
    }

    pub fn file_type(&self) -> FileType {
        FileType::from(self.filetype)
    }

    pub fn header_flags(&self) -> HeaderFlags {
        HeaderFlags::from_bits_retain(self.flags)
    }

    pub fn is_pie(&self) -> bool {
        self.header_flags().contains(HeaderFlags::PIE)
    }

    /// File offset one past the declared command area
    pub fn commands_end(&self) -> usize {
        MACH_HEADER_64_SIZE + self.sizeofcmds as usize
    }
}

/// One walked load command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadCommand {
    /// Position in the command list
    pub index: usize,
    /// File offset of the command
    pub offset: usize,
    pub cmd: u32,
    pub cmdsize: u32,
    pub kind: LoadCommandKind,
}

impl LoadCommand {
    pub fn name(&self) -> Option<&'static str> {
        load_command_name(self.cmd)
    }
}

/// The command kinds the analyzer understands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadCommandKind {
    Segment(Segment),
    Symtab(SymtabCommand),
    Dysymtab(DysymtabCommand),
    Other(u32),
}

/// `LC_SEGMENT_64` with its trailing sections
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub cmdsize: u32,
    pub name: String,
    pub vmaddr: u64,
    pub vmsize: u64,
    pub fileoff: u64,
    pub filesize: u64,
    pub maxprot: u32,
    pub initprot: u32,
    pub nsects: u32,
    pub flags: u32,
    pub sections: Vec<Section>,
}

impl Segment {
    pub fn max_protection(&self) -> VmProt {
        VmProt::from_bits_retain(self.maxprot)
    }

    pub fn initial_protection(&self) -> VmProt {
        VmProt::from_bits_retain(self.initprot)
    }

    pub fn is_writable(&self) -> bool {
        self.initial_protection().contains(VmProt::WRITE)
    }

    pub fn is_executable(&self) -> bool {
        self.initial_protection().contains(VmProt::EXECUTE)
    }
}

/// `section_64`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub name: String,
    pub segment_name: String,
    pub addr: u64,
    pub size: u64,
    pub offset: u32,
    pub align: u32,
    pub reloff: u32,
    pub nreloc: u32,
    pub flags: u32,
    pub reserved1: u32,
    pub reserved2: u32,
    pub reserved3: u32,
}

impl Section {
    pub fn section_type(&self) -> SectionType {
        SectionType::from(self.flags & SECTION_TYPE)
    }

    pub fn attributes(&self) -> u32 {
        self.flags & SECTION_ATTRIBUTES
    }

    /// Lazy or non-lazy symbol pointer section
    pub fn is_symbol_pointers(&self) -> bool {
        matches!(
            self.section_type(),
            SectionType::LazySymbolPointers | SectionType::NonLazySymbolPointers
        )
    }

    /// Number of pointer-sized slots in the section
    pub fn pointer_slots(&self) -> u64 {
        self.size / POINTER_SIZE
    }
}

/// Decoded `flags & SECTION_TYPE`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SectionType {
    Regular,
    Zerofill,
    CStringLiterals,
    FourByteLiterals,
    EightByteLiterals,
    LiteralPointers,
    NonLazySymbolPointers,
    LazySymbolPointers,
    SymbolStubs,
    ModInitFuncPointers,
    ModTermFuncPointers,
    Coalesced,
    GbZerofill,
    Interposing,
    SixteenByteLiterals,
    DtraceDof,
    LazyDylibSymbolPointers,
    ThreadLocalRegular,
    ThreadLocalZerofill,
    ThreadLocalVariables,
    ThreadLocalVariablePointers,
    ThreadLocalInitFunctionPointers,
    Other(u32),
}

impl From<u32> for SectionType {
    fn from(val: u32) -> Self {
        match val {
            S_REGULAR => SectionType::Regular,
            S_ZEROFILL => SectionType::Zerofill,
            S_CSTRING_LITERALS => SectionType::CStringLiterals,
            S_4BYTE_LITERALS => SectionType::FourByteLiterals,
            S_8BYTE_LITERALS => SectionType::EightByteLiterals,
            S_LITERAL_POINTERS => SectionType::LiteralPointers,
            S_NON_LAZY_SYMBOL_POINTERS => SectionType::NonLazySymbolPointers,
            S_LAZY_SYMBOL_POINTERS => SectionType::LazySymbolPointers,
            S_SYMBOL_STUBS => SectionType::SymbolStubs,
            S_MOD_INIT_FUNC_POINTERS => SectionType::ModInitFuncPointers,
            S_MOD_TERM_FUNC_POINTERS => SectionType::ModTermFuncPointers,
            S_COALESCED => SectionType::Coalesced,
            S_GB_ZEROFILL => SectionType::GbZerofill,
            S_INTERPOSING => SectionType::Interposing,
            S_16BYTE_LITERALS => SectionType::SixteenByteLiterals,
            S_DTRACE_DOF => SectionType::DtraceDof,
            S_LAZY_DYLIB_SYMBOL_POINTERS => SectionType::LazyDylibSymbolPointers,
            S_THREAD_LOCAL_REGULAR => SectionType::ThreadLocalRegular,
            S_THREAD_LOCAL_ZEROFILL => SectionType::ThreadLocalZerofill,
            S_THREAD_LOCAL_VARIABLES => SectionType::ThreadLocalVariables,
            S_THREAD_LOCAL_VARIABLE_POINTERS => SectionType::ThreadLocalVariablePointers,
            S_THREAD_LOCAL_INIT_FUNCTION_POINTERS => SectionType::ThreadLocalInitFunctionPointers,
            other => SectionType::Other(other),
        }
    }
}

/// `LC_SYMTAB`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SymtabCommand {
    pub symoff: u32,
    pub nsyms: u32,
    pub stroff: u32,
    pub strsize: u32,
}

/// `LC_DYSYMTAB`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DysymtabCommand {
    pub ilocalsym: u32,
    pub nlocalsym: u32,
    pub iextdefsym: u32,
    pub nextdefsym: u32,
    pub iundefsym: u32,
    pub nundefsym: u32,
    pub tocoff: u32,
    pub ntoc: u32,
    pub modtaboff: u32,
    pub nmodtab: u32,
    pub extrefsymoff: u32,
    pub nextrefsyms: u32,
    pub indirectsymoff: u32,
    pub nindirectsyms: u32,
    pub extreloff: u32,
    pub nextrel: u32,
    pub locreloff: u32,
    pub nlocrel: u32,
}

impl DysymtabCommand {
    /// Symbol-table index range of local symbols
    pub fn local_range(&self) -> std::ops::Range<u32> {
        self.ilocalsym..self.ilocalsym.saturating_add(self.nlocalsym)
    }

    /// Symbol-table index range of externally defined symbols
    pub fn external_defined_range(&self) -> std::ops::Range<u32> {
        self.iextdefsym..self.iextdefsym.saturating_add(self.nextdefsym)
    }

    /// Symbol-table index range of undefined (imported) symbols
    pub fn undefined_range(&self) -> std::ops::Range<u32> {
        self.iundefsym..self.iundefsym.saturating_add(self.nundefsym)
    }
}

/// `nlist_64`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Nlist {
    pub n_strx: u32,
    pub n_type: u8,
    pub n_sect: u8,
    pub n_desc: u16,
    pub n_value: u64,
}

/// Decoded `n_type & N_TYPE`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SymbolType {
    Undefined,
    Absolute,
    Section,
    Prebound,
    Indirect,
    Other(u8),
}

impl Nlist {
    pub fn is_stab(&self) -> bool {
        (self.n_type & N_STAB) != 0
    }

    pub fn is_external(&self) -> bool {
        (self.n_type & N_EXT) != 0
    }

    pub fn is_private_external(&self) -> bool {
        (self.n_type & N_PEXT) != 0
    }

    pub fn symbol_type(&self) -> SymbolType {
        match self.n_type & N_TYPE {
            N_UNDF => SymbolType::Undefined,
            N_ABS => SymbolType::Absolute,
            N_SECT => SymbolType::Section,
            N_PBUD => SymbolType::Prebound,
            N_INDR => SymbolType::Indirect,
            other => SymbolType::Other(other),
        }
    }

    pub fn is_undefined(&self) -> bool {
        !self.is_stab() && self.symbol_type() == SymbolType::Undefined
    }

    /// Two-level namespace library ordinal (high byte of `n_desc`)
    pub fn library_ordinal(&self) -> u8 {
        (self.n_desc >> 8) as u8
    }
}

//! Structured analysis report.
//!
//! The report is plain data: everything a presentation layer needs, with no
//! formatting decisions baked in. Building it twice from the same buffer
//! yields identical values.

use crate::config::AnalysisConfig;
use crate::demangle::{demangle_one, DemangleResult};
use crate::formats::macho::bindings::{BindingSet, ResolvedBinding, UnresolvedSlot};
use crate::formats::macho::symbols::SymbolEntry;
use crate::formats::macho::{
    CpuType, DysymtabCommand, FileType, HeaderFlags, LoadCommand, MachHeader, MachoParser,
    Result, Segment, SymbolType, SymtabCommand,
};
use serde::Serialize;
use tracing::{debug, warn};

/// Decoded header with its raw fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderReport {
    #[serde(flatten)]
    pub raw: MachHeader,
    pub cpu: CpuType,
    pub file_type: FileType,
    pub flag_names: HeaderFlags,
}

impl From<&MachHeader> for HeaderReport {
    fn from(header: &MachHeader) -> Self {
        Self {
            raw: *header,
            cpu: header.cpu_type(),
            file_type: header.file_type(),
            flag_names: header.header_flags(),
        }
    }
}

/// One line of the load command listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadCommandSummary {
    pub index: usize,
    pub offset: usize,
    pub cmd: u32,
    pub cmdsize: u32,
    pub name: String,
}

impl From<&LoadCommand> for LoadCommandSummary {
    fn from(command: &LoadCommand) -> Self {
        Self {
            index: command.index,
            offset: command.offset,
            cmd: command.cmd,
            cmdsize: command.cmdsize,
            name: command
                .name()
                .map(str::to_string)
                .unwrap_or_else(|| format!("{:#x}", command.cmd)),
        }
    }
}

/// Symbol table entry as listed in the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymbolReport {
    #[serde(flatten)]
    pub entry: SymbolEntry,
    pub symbol_type: SymbolType,
    pub external: bool,
    pub private_external: bool,
    pub stab: bool,
    /// Library ordinal of an undefined symbol
    #[serde(skip_serializing_if = "Option::is_none")]
    pub library_ordinal: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub demangled: Option<DemangleResult>,
}

impl SymbolReport {
    fn new(entry: SymbolEntry, demangle: bool) -> Self {
        let demangled = if demangle && entry.name.is_resolved() {
            demangle_one(entry.name())
        } else {
            None
        };
        Self {
            symbol_type: entry.nlist.symbol_type(),
            external: entry.nlist.is_external(),
            private_external: entry.nlist.is_private_external(),
            stab: entry.nlist.is_stab(),
            library_ordinal: entry
                .nlist
                .is_undefined()
                .then(|| entry.nlist.library_ordinal()),
            entry,
            demangled,
        }
    }

    pub fn name(&self) -> &str {
        self.entry.name()
    }
}

/// Symbol table metadata and its entries
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymbolTableReport {
    #[serde(flatten)]
    pub meta: SymtabCommand,
    pub symbols: Vec<SymbolReport>,
    /// Entries left out because of `symbols.max_symbols`
    pub omitted: usize,
}

/// Everything the analyzer found in one image
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MachoReport {
    pub size: usize,
    pub header: HeaderReport,
    pub load_commands: Vec<LoadCommandSummary>,
    pub segments: Vec<Segment>,
    pub symtab: Option<SymbolTableReport>,
    pub dysymtab: Option<DysymtabCommand>,
    pub bindings: Vec<ResolvedBinding>,
    pub unresolved_slots: Vec<UnresolvedSlot>,
    /// Pointer slots whose indirect entry is a local or absolute sentinel
    pub not_external: u64,
    /// Pointer slots left out because of `bindings.max_bindings`
    pub bindings_omitted: u64,
    pub warnings: Vec<String>,
}

impl MachoReport {
    /// Assemble the report from a parsed image.
    ///
    /// Fails only on fatal errors: symbol, string or indirect tables that
    /// lie outside the image.
    pub fn build(parser: &MachoParser<'_>, config: &AnalysisConfig) -> Result<Self> {
        let mut warnings = parser.validate();
        for w in &warnings {
            warn!(issue = %w, "Structural issue");
        }

        let symtab = match parser.symbols()? {
            Some(table) => {
                let mut entries = table.entries();
                let total = entries.len();
                if let Some(max) = config.symbols.max_symbols {
                    entries.truncate(max);
                }
                let omitted = total - entries.len();
                let symbols = entries
                    .into_iter()
                    .map(|e| SymbolReport::new(e, config.symbols.demangle))
                    .collect();
                parser.symtab_command().map(|meta| SymbolTableReport {
                    meta: *meta,
                    symbols,
                    omitted,
                })
            }
            None => None,
        };

        let set = match parser.bindings(
            &config.bindings.pointer_segments,
            config.bindings.max_bindings,
        )? {
            Some(set) => set,
            None => {
                debug!("Symbol or dynamic symbol table missing, skipping bindings");
                BindingSet::default()
            }
        };
        let BindingSet {
            bindings,
            unresolved: unresolved_slots,
            not_external,
            omitted: bindings_omitted,
        } = set;

        for slot in &unresolved_slots {
            warnings.push(format!(
                "{},{} slot {}: {}",
                slot.segment, slot.section, slot.slot, slot.reason
            ));
        }
        if bindings_omitted > 0 {
            warnings.push(format!(
                "binding limit of {} reached, {} pointer slots not resolved",
                config.bindings.max_bindings.unwrap_or_default(),
                bindings_omitted
            ));
        }

        Ok(Self {
            size: parser.data().len(),
            header: HeaderReport::from(parser.header()),
            load_commands: parser
                .load_commands()
                .iter()
                .map(LoadCommandSummary::from)
                .collect(),
            segments: parser.segments().cloned().collect(),
            symtab,
            dysymtab: parser.dysymtab_command().copied(),
            bindings,
            unresolved_slots,
            not_external,
            bindings_omitted,
            warnings,
        })
    }

    /// Binding names in slot order
    pub fn binding_names(&self) -> Vec<&str> {
        self.bindings.iter().map(|b| b.name()).collect()
    }

    /// Bindings of one section
    pub fn bindings_for<'a>(
        &'a self,
        segment: &'a str,
        section: &'a str,
    ) -> impl Iterator<Item = &'a ResolvedBinding> + 'a {
        self.bindings
            .iter()
            .filter(move |b| b.segment == segment && b.section == section)
    }
}

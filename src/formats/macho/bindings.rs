//! Indirect symbol binding resolution
//!
//! Every slot of a lazy or non-lazy symbol pointer section is bound by dyld
//! to the symbol named by `indirect_symtab[reserved1 + slot]`. This module
//! performs the same lookup statically: slot → indirect entry → `nlist_64`
//! → string table.

use crate::formats::macho::dysymtab::{IndirectEntry, IndirectSymbolTable};
use crate::formats::macho::symbols::{SymbolName, SymbolTable};
use crate::formats::macho::types::*;
use serde::Serialize;
use tracing::{debug, warn};

/// Pointer slot bound to an imported symbol
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedBinding {
    pub segment: String,
    pub section: String,
    /// Slot position within the section, 0-based
    pub slot: u64,
    /// Virtual address of the slot
    pub address: u64,
    /// Index into the indirect symbol table
    pub indirect_index: u64,
    /// Index into the symbol table
    pub symbol_index: u32,
    pub name: SymbolName,
}

impl ResolvedBinding {
    pub fn name(&self) -> &str {
        self.name.as_str()
    }
}

/// Slot (or run of slots) whose binding could not be looked up
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnresolvedSlot {
    pub segment: String,
    pub section: String,
    /// First affected slot
    pub slot: u64,
    /// Number of consecutive slots affected
    pub count: u64,
    pub reason: String,
    #[serde(skip)]
    pub error: MachoError,
}

/// What happened to one slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotOutcome {
    Bound(ResolvedBinding),
    /// Local or absolute entry, resolved at static link time
    NotExternal { slot: u64, entry: IndirectEntry },
    Failed(UnresolvedSlot),
}

/// Bindings for a whole image, in walk order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BindingSet {
    pub bindings: Vec<ResolvedBinding>,
    pub unresolved: Vec<UnresolvedSlot>,
    /// Slots skipped because their entry is a local/absolute sentinel
    pub not_external: u64,
    /// Slots left unresolved once the binding limit was reached
    pub omitted: u64,
}

impl BindingSet {
    /// Binding names in order
    pub fn names(&self) -> Vec<&str> {
        self.bindings.iter().map(|b| b.name()).collect()
    }

    fn push(&mut self, outcome: SlotOutcome) {
        match outcome {
            SlotOutcome::Bound(binding) => self.bindings.push(binding),
            SlotOutcome::NotExternal { .. } => self.not_external += 1,
            SlotOutcome::Failed(slot) => self.unresolved.push(slot),
        }
    }
}

/// Resolves symbol pointer slots against the symbol and indirect tables
pub struct BindingResolver<'a, 'data> {
    symbols: &'a SymbolTable<'data>,
    indirect: &'a IndirectSymbolTable<'data>,
    pointer_segments: &'a [String],
    max_bindings: Option<usize>,
}

impl<'a, 'data> BindingResolver<'a, 'data> {
    /// `pointer_segments` lists the data segments whose pointer sections are
    /// resolved, usually `__DATA` and `__DATA_CONST`.
    pub fn new(
        symbols: &'a SymbolTable<'data>,
        indirect: &'a IndirectSymbolTable<'data>,
        pointer_segments: &'a [String],
    ) -> Self {
        Self {
            symbols,
            indirect,
            pointer_segments,
            max_bindings: None,
        }
    }

    /// Stop resolving once `max_bindings` bindings and unresolved slots were
    /// produced; `None` resolves everything.
    pub fn with_limit(mut self, max_bindings: Option<usize>) -> Self {
        self.max_bindings = max_bindings;
        self
    }

    /// Whether `section` of `segment` holds symbol pointers to resolve
    pub fn qualifies(&self, segment: &Segment, section: &Section) -> bool {
        section.is_symbol_pointers() && self.pointer_segments.iter().any(|s| *s == segment.name)
    }

    /// Resolve all qualifying sections, preserving segment, section and slot order
    pub fn resolve<'s, I>(&self, segments: I) -> BindingSet
    where
        I: IntoIterator<Item = &'s Segment>,
    {
        let mut set = BindingSet::default();
        for segment in segments {
            for section in &segment.sections {
                if !self.qualifies(segment, section) {
                    continue;
                }
                let produced = set.bindings.len() + set.unresolved.len();
                let remaining = self.max_bindings.map(|max| max.saturating_sub(produced));
                let (outcomes, omitted) = self.resolve_slots(segment, section, remaining);
                for outcome in outcomes {
                    set.push(outcome);
                }
                set.omitted += omitted;
            }
        }

        if set.omitted > 0 {
            warn!(
                max_bindings = ?self.max_bindings,
                omitted = set.omitted,
                "Binding limit reached"
            );
        }
        debug!(
            bindings = set.bindings.len(),
            unresolved = set.unresolved.len(),
            not_external = set.not_external,
            omitted = set.omitted,
            "Resolved indirect bindings"
        );
        set
    }

    /// Resolve every slot of one section.
    ///
    /// Returns nothing for sections that do not qualify. The binding limit
    /// does not apply here.
    pub fn resolve_section(&self, segment: &Segment, section: &Section) -> Vec<SlotOutcome> {
        if !self.qualifies(segment, section) {
            return Vec::new();
        }
        self.resolve_slots(segment, section, None).0
    }

    /// Resolve slots until `remaining` bindings or failures were produced.
    /// Returns the outcomes and the number of slots left untouched.
    fn resolve_slots(
        &self,
        segment: &Segment,
        section: &Section,
        mut remaining: Option<usize>,
    ) -> (Vec<SlotOutcome>, u64) {
        let slots = section.pointer_slots();
        let start = section.reserved1 as u64;
        let count = self.indirect.count() as u64;
        let mut out = Vec::new();

        debug!(
            segment = %segment.name,
            section = %section.name,
            slots,
            reserved1 = section.reserved1,
            "Resolving symbol pointer section"
        );

        for slot in 0..slots {
            if remaining == Some(0) {
                return (out, slots - slot);
            }
            let index = start + slot;
            if index >= count {
                // Every later slot indexes further past the end
                let error = MachoError::IndirectIndexOutOfBounds {
                    index,
                    count: self.indirect.count(),
                };
                warn!(
                    section = %section.name,
                    slot,
                    remaining = slots - slot,
                    error = %error,
                    "Indirect index out of bounds"
                );
                out.push(SlotOutcome::Failed(self.unresolved(
                    segment,
                    section,
                    slot,
                    slots - slot,
                    error,
                )));
                break;
            }
            let outcome = self.resolve_slot(segment, section, slot, index);
            if let Some(left) = remaining.as_mut() {
                if !matches!(outcome, SlotOutcome::NotExternal { .. }) {
                    *left -= 1;
                }
            }
            out.push(outcome);
        }

        (out, 0)
    }

    fn resolve_slot(
        &self,
        segment: &Segment,
        section: &Section,
        slot: u64,
        index: u64,
    ) -> SlotOutcome {
        let entry = match self.indirect.entry(index) {
            Ok(entry) => entry,
            Err(error) => {
                return SlotOutcome::Failed(self.unresolved(segment, section, slot, 1, error))
            }
        };

        let symbol_index = match entry.symbol_index() {
            Some(i) => i,
            None => return SlotOutcome::NotExternal { slot, entry },
        };

        let symbol = match self.symbols.get(symbol_index) {
            Ok(symbol) => symbol,
            Err(error) => {
                warn!(section = %section.name, slot, error = %error, "Bad symbol index");
                return SlotOutcome::Failed(self.unresolved(segment, section, slot, 1, error));
            }
        };

        let name = match self.symbols.name_of(&symbol) {
            Ok(name) => SymbolName::Resolved {
                name: name.into_owned(),
            },
            Err(error) => {
                warn!(section = %section.name, slot, error = %error, "Bad symbol name");
                SymbolName::Unresolved {
                    strx: symbol.n_strx,
                    reason: error.to_string(),
                }
            }
        };

        SlotOutcome::Bound(ResolvedBinding {
            segment: segment.name.clone(),
            section: section.name.clone(),
            slot,
            address: section.addr.wrapping_add(slot * POINTER_SIZE),
            indirect_index: index,
            symbol_index,
            name,
        })
    }

    fn unresolved(
        &self,
        segment: &Segment,
        section: &Section,
        slot: u64,
        count: u64,
        error: MachoError,
    ) -> UnresolvedSlot {
        UnresolvedSlot {
            segment: segment.name.clone(),
            section: section.name.clone(),
            slot,
            count,
            reason: error.to_string(),
            error,
        }
    }
}

//! Demangler helpers for Rust and C++ (Itanium) symbols.
//!
//! Mach-O prefixes every C-level name with an extra underscore, so `__Z...`
//! on disk is the Itanium name `_Z...`.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolFlavor {
    Rust,
    Itanium,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DemangleResult {
    pub demangled: String,
    pub flavor: SymbolFlavor,
}

fn strip_macho_prefix(s: &str) -> &str {
    s.strip_prefix('_').unwrap_or(s)
}

pub fn detect_flavor(s: &str) -> SymbolFlavor {
    let name = strip_macho_prefix(s);
    if rustc_demangle::try_demangle(name).is_ok() {
        return SymbolFlavor::Rust;
    }
    if name.starts_with("_Z") {
        return SymbolFlavor::Itanium;
    }
    SymbolFlavor::Unknown
}

/// Attempt to demangle a single Mach-O symbol name. Returns None when not recognized.
pub fn demangle_one(s: &str) -> Option<DemangleResult> {
    let name = strip_macho_prefix(s);

    // Rust (v0 + legacy) demangler
    if let Ok(dm) = rustc_demangle::try_demangle(name) {
        return Some(DemangleResult {
            demangled: format!("{:#}", dm),
            flavor: SymbolFlavor::Rust,
        });
    }

    // C++ (Itanium) demangler
    if name.starts_with("_Z") {
        if let Ok(sym) = cpp_demangle::Symbol::new(name) {
            return Some(DemangleResult {
                demangled: sym.to_string(),
                flavor: SymbolFlavor::Itanium,
            });
        }
    }

    None
}

//! Text and JSON rendering of a [`MachoReport`].

use crate::formats::macho::VmProt;
use crate::report::MachoReport;
use std::io::{self, Write};

fn prot_string(prot: VmProt) -> String {
    let mut s = String::with_capacity(3);
    s.push(if prot.contains(VmProt::READ) { 'r' } else { '-' });
    s.push(if prot.contains(VmProt::WRITE) { 'w' } else { '-' });
    s.push(if prot.contains(VmProt::EXECUTE) { 'x' } else { '-' });
    s
}

/// Write the human readable report.
pub fn render_text<W: Write>(report: &MachoReport, out: &mut W) -> io::Result<()> {
    let h = &report.header;
    writeln!(out, "Mach-O 64-bit image, {} bytes", report.size)?;
    writeln!(out, "  cpu:        {:?} (subtype {:#x})", h.cpu, h.raw.cpusubtype)?;
    writeln!(out, "  filetype:   {:?}", h.file_type)?;
    writeln!(out, "  flags:      {:#010x}", h.raw.flags)?;
    writeln!(
        out,
        "  commands:   {} ({} bytes)",
        h.raw.ncmds, h.raw.sizeofcmds
    )?;

    writeln!(out)?;
    writeln!(out, "Load commands:")?;
    for cmd in &report.load_commands {
        writeln!(
            out,
            "  [{:>3}] {:#08x} {:<24} size {}",
            cmd.index, cmd.offset, cmd.name, cmd.cmdsize
        )?;
    }

    writeln!(out)?;
    writeln!(out, "Segments:")?;
    for seg in &report.segments {
        writeln!(
            out,
            "  {:<16} cmdsize {} vm {:#018x}+{:#x} file {:#x}+{:#x} {}/{} nsects {} flags {:#x}",
            seg.name,
            seg.cmdsize,
            seg.vmaddr,
            seg.vmsize,
            seg.fileoff,
            seg.filesize,
            prot_string(seg.initial_protection()),
            prot_string(seg.max_protection()),
            seg.nsects,
            seg.flags,
        )?;
        for sect in &seg.sections {
            writeln!(
                out,
                "    {:<16} {:#018x}+{:#x} {:?}",
                sect.name,
                sect.addr,
                sect.size,
                sect.section_type()
            )?;
            writeln!(
                out,
                "      offset {:#x} align 2^{} reloff {:#x} nreloc {} flags {:#010x} \
                 reserved1 {} reserved2 {} reserved3 {}",
                sect.offset,
                sect.align,
                sect.reloff,
                sect.nreloc,
                sect.flags,
                sect.reserved1,
                sect.reserved2,
                sect.reserved3
            )?;
        }
    }

    writeln!(out)?;
    match &report.symtab {
        Some(symtab) => {
            writeln!(
                out,
                "Symbols ({}): symoff {:#x}, stroff {:#x}, strsize {}",
                symtab.meta.nsyms,
                symtab.meta.symoff,
                symtab.meta.stroff,
                symtab.meta.strsize
            )?;
            for sym in &symtab.symbols {
                let display = sym
                    .demangled
                    .as_ref()
                    .map(|d| d.demangled.as_str())
                    .unwrap_or_else(|| sym.name());
                writeln!(
                    out,
                    "  {:>6} {:#018x} {:<10} {}{}",
                    sym.entry.index,
                    sym.entry.nlist.n_value,
                    format!("{:?}", sym.symbol_type),
                    if sym.external { "[ext] " } else { "" },
                    display
                )?;
            }
            if symtab.omitted > 0 {
                writeln!(out, "  ... {} more", symtab.omitted)?;
            }
        }
        None => writeln!(out, "Symbols: none")?,
    }

    writeln!(out)?;
    if let Some(dy) = &report.dysymtab {
        writeln!(out, "Dynamic symbol table:")?;
        writeln!(out, "  local      {:?}", dy.local_range())?;
        writeln!(out, "  extdef     {:?}", dy.external_defined_range())?;
        writeln!(out, "  undef      {:?}", dy.undefined_range())?;
        let tables = [
            ("toc", dy.ntoc, dy.tocoff),
            ("modtab", dy.nmodtab, dy.modtaboff),
            ("extrefsyms", dy.nextrefsyms, dy.extrefsymoff),
            ("indirect", dy.nindirectsyms, dy.indirectsymoff),
            ("extrel", dy.nextrel, dy.extreloff),
            ("locrel", dy.nlocrel, dy.locreloff),
        ];
        for (name, count, offset) in tables {
            writeln!(out, "  {:<10} {} entries at {:#x}", name, count, offset)?;
        }
        writeln!(out)?;
    }

    if report.dysymtab.is_none() {
        writeln!(out, "Bindings: no dynamic symbol table")?;
    } else {
        writeln!(out, "Bindings ({}):", report.bindings.len())?;
        for b in &report.bindings {
            writeln!(
                out,
                "  {},{}[{}] {:#018x} -> {}",
                b.segment,
                b.section,
                b.slot,
                b.address,
                b.name()
            )?;
        }
        if report.not_external > 0 {
            writeln!(out, "  {} local/absolute slots", report.not_external)?;
        }
        if report.bindings_omitted > 0 {
            writeln!(out, "  ... {} slots past the binding limit", report.bindings_omitted)?;
        }
    }

    if !report.warnings.is_empty() {
        writeln!(out)?;
        writeln!(out, "Warnings:")?;
        for w in &report.warnings {
            writeln!(out, "  {}", w)?;
        }
    }

    Ok(())
}

/// Serialize the report as pretty-printed JSON.
pub fn render_json(report: &MachoReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

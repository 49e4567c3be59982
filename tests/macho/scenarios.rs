use crate::common::{raw_command, two_import_image, MachoBuilder, SectionSpec, DATA_VMADDR};
use machscope::analyze;
use machscope::config::AnalysisConfig;
use machscope::error::MachscopeError;
use machscope::formats::macho::commands::walk_load_commands;
use machscope::formats::macho::headers::parse_header;
use machscope::formats::macho::symbols::{SymbolName, INVALID_NAME};
use machscope::formats::macho::*;

#[test]
fn two_imports_resolve_in_slot_order() {
    let data = two_import_image().build();
    let report = analyze(&data, &AnalysisConfig::default()).expect("analyze");

    assert_eq!(report.binding_names(), vec!["_foo", "_bar"]);
    assert!(report.unresolved_slots.is_empty());
    assert!(report.warnings.is_empty(), "{:?}", report.warnings);

    let first = &report.bindings[0];
    assert_eq!(first.segment, "__DATA");
    assert_eq!(first.section, "__nl_symbol_ptr");
    assert_eq!(first.slot, 0);
    assert_eq!(first.address, DATA_VMADDR);
    assert_eq!(first.indirect_index, 0);
    assert_eq!(first.symbol_index, 1);

    let second = &report.bindings[1];
    assert_eq!(second.slot, 1);
    assert_eq!(second.address, DATA_VMADDR + 8);
    assert_eq!(second.symbol_index, 2);
}

#[test]
fn two_imports_model_every_command() {
    let data = two_import_image().build();
    let report = analyze(&data, &AnalysisConfig::default()).expect("analyze");

    let names: Vec<_> = report
        .load_commands
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(
        names,
        vec!["LC_SEGMENT_64", "LC_SEGMENT_64", "LC_SYMTAB", "LC_DYSYMTAB"]
    );
    assert_eq!(report.header.raw.ncmds, 4);

    let segments: Vec<_> = report.segments.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(segments, vec!["__TEXT", "__DATA"]);
    assert!(report.segments[0].sections.is_empty());
    assert_eq!(report.segments[1].sections.len(), 1);
    assert_eq!(report.segments[1].sections[0].segment_name, "__DATA");

    let symtab = report.symtab.as_ref().expect("symtab");
    assert_eq!(symtab.meta.nsyms, 3);
    assert_eq!(symtab.meta.strsize, 11);
    let start = symtab.meta.stroff as usize;
    assert_eq!(&data[start..start + 11], b"\0_foo\0_bar\0");

    let dysymtab = report.dysymtab.expect("dysymtab");
    assert_eq!(dysymtab.nindirectsyms, 2);
}

#[test]
fn local_sentinel_slot_is_skipped() {
    let data = MachoBuilder::new()
        .segment("__TEXT", 0x1_0000_0000, vec![])
        .segment("__DATA", DATA_VMADDR, vec![SectionSpec::non_lazy(2, 0)])
        .symtab()
        .dysymtab()
        .symbols(&["", "_foo", "_bar"])
        .indirect(&[INDIRECT_SYMBOL_LOCAL, 2])
        .build();
    let report = analyze(&data, &AnalysisConfig::default()).expect("analyze");

    assert_eq!(report.binding_names(), vec!["_bar"]);
    assert_eq!(report.bindings[0].slot, 1);
    assert_eq!(report.bindings[0].address, DATA_VMADDR + 8);
    assert_eq!(report.not_external, 1);
    assert!(report.unresolved_slots.is_empty());
}

#[test]
fn name_offset_at_strsize_is_out_of_bounds() {
    // "\0_foo\0_bar\0" is 11 bytes, so offset 11 is one past the end
    let data = MachoBuilder::new()
        .segment("__DATA", DATA_VMADDR, vec![])
        .symtab()
        .symbols(&["", "_foo", "_bar"])
        .raw_symbol(11)
        .build();

    let parser = MachoParser::parse(&data).expect("parse");
    let symbols = parser.symbols().expect("tables").expect("symtab");
    assert_eq!(
        symbols.name_at(3).unwrap_err(),
        MachoError::NameOutOfBounds {
            strx: 11,
            strsize: 11
        }
    );

    let entries = symbols.entries();
    assert_eq!(entries.len(), 4);
    assert_eq!(entries[1].name(), "_foo");
    assert_eq!(entries[2].name(), "_bar");
    assert!(matches!(
        entries[3].name,
        SymbolName::Unresolved { strx: 11, .. }
    ));
    assert_eq!(entries[3].name(), INVALID_NAME);

    let report = analyze(&data, &AnalysisConfig::default()).expect("analyze");
    let listed = &report.symtab.as_ref().expect("symtab").symbols;
    assert_eq!(listed.len(), 4);
    assert!(!listed[3].entry.name.is_resolved());
}

#[test]
fn walk_stops_at_oversized_command() {
    let data = MachoBuilder::new()
        .segment("__TEXT", 0x1_0000_0000, vec![])
        .segment("__DATA", DATA_VMADDR, vec![])
        .raw_command(raw_command(LC_UUID, 0x1000, 24))
        .build();

    let header = parse_header(&data).expect("header");
    let walk = walk_load_commands(&data, &header);
    assert_eq!(walk.commands.len(), 2);
    assert_eq!(walk.commands[0].index, 0);
    assert_eq!(walk.commands[1].index, 1);
    assert_eq!(
        walk.error,
        Some(MachoError::TruncatedCommand {
            index: 2,
            offset: 32 + 72 + 72,
            cmdsize: 0x1000
        })
    );

    let err = analyze(&data, &AnalysisConfig::default()).unwrap_err();
    assert!(matches!(
        err,
        MachscopeError::Macho(MachoError::TruncatedCommand { index: 2, .. })
    ));
    assert!(err.is_fatal());
}

#[test]
fn zero_cmdsize_is_truncated() {
    let data = MachoBuilder::new()
        .segment("__TEXT", 0x1_0000_0000, vec![])
        .raw_command(raw_command(LC_UUID, 0, 24))
        .build();
    let header = parse_header(&data).expect("header");
    let walk = walk_load_commands(&data, &header);
    assert_eq!(walk.commands.len(), 1);
    assert!(matches!(
        walk.error,
        Some(MachoError::TruncatedCommand {
            index: 1,
            cmdsize: 0,
            ..
        })
    ));
}

#[test]
fn overstated_ncmds_never_walks_past_command_area() {
    let data = two_import_image().ncmds(6).build();
    let header = parse_header(&data).expect("header");
    let walk = walk_load_commands(&data, &header);
    assert_eq!(walk.commands.len(), 4);
    assert!(matches!(
        walk.error,
        Some(MachoError::TruncatedCommand { index: 4, .. })
    ));
}

#[test]
fn unknown_commands_are_carried_through() {
    let data = MachoBuilder::new()
        .segment("__TEXT", 0x1_0000_0000, vec![SectionSpec::text(0x40)])
        .raw_command(raw_command(LC_UUID, 24, 24))
        .raw_command(raw_command(0x7777, 16, 16))
        .build();
    let report = analyze(&data, &AnalysisConfig::default()).expect("analyze");

    assert_eq!(report.load_commands.len(), 3);
    assert_eq!(report.load_commands[1].name, "LC_UUID");
    assert_eq!(report.load_commands[2].name, "0x7777");
    assert_eq!(report.load_commands[2].offset, 32 + 72 + 80 + 24);
    assert!(report.symtab.is_none());
    assert!(report.bindings.is_empty());
    assert!(report
        .warnings
        .iter()
        .any(|w| w.contains("No LC_SYMTAB")));
}

#![no_main]
use libfuzzer_sys::fuzz_target;
use machscope::formats::macho::commands::walk_load_commands;
use machscope::formats::macho::headers::parse_header;

fuzz_target!(|data: &[u8]| {
    if let Ok(header) = parse_header(data) {
        let walk = walk_load_commands(data, &header);
        assert!(walk.bytes_walked <= header.sizeofcmds as usize);
    }
});

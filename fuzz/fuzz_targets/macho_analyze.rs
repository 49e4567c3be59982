#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let cfg = machscope::config::AnalysisConfig::default();
    if let Ok(report) = machscope::analyze(data, &cfg) {
        let _ = machscope::render::render_json(&report);
    }
});

//! machscope: a static analyzer for 64-bit little-endian Mach-O images.
//!
//! The analysis is read-only over an in-memory buffer. [`analyze`] parses the
//! header and load commands, models segments and sections, reads the symbol
//! and dynamic symbol tables, and resolves the imported symbol bound to every
//! lazy and non-lazy pointer slot.
//!
//! ```no_run
//! use machscope::{analyze_path, config::AnalysisConfig};
//!
//! let report = analyze_path("/usr/bin/true", &AnalysisConfig::default())?;
//! for name in report.binding_names() {
//!     println!("{name}");
//! }
//! # Ok::<(), machscope::error::MachscopeError>(())
//! ```

pub mod config;
pub mod demangle;
pub mod error;
pub mod formats;
pub mod io;
pub mod logging;
pub mod render;
pub mod report;

use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::formats::macho::MachoParser;
use crate::io::MappedImage;
use crate::report::MachoReport;
use std::path::Path;
use tracing::{debug, info_span};

/// Analyze an image held in memory.
pub fn analyze(data: &[u8], config: &AnalysisConfig) -> Result<MachoReport> {
    let span = info_span!("macho_analyze", len = data.len());
    let _guard = span.enter();

    let parser = MachoParser::parse(data).map_err(|e| crate::log_error!(e))?;
    let report = MachoReport::build(&parser, config).map_err(|e| crate::log_error!(e))?;
    debug!(
        commands = report.load_commands.len(),
        segments = report.segments.len(),
        bindings = report.bindings.len(),
        "Analysis complete"
    );
    Ok(report)
}

/// Map a file and analyze it.
pub fn analyze_path<P: AsRef<Path>>(path: P, config: &AnalysisConfig) -> Result<MachoReport> {
    let image = MappedImage::open(path, &config.io)?;
    analyze(image.bytes(), config)
}

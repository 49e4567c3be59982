use crate::common::test_utils::{create_temp_file, open_image};
use crate::common::two_import_image;
use machscope::config::AnalysisConfig;
use machscope::error::MachscopeError;
use machscope::io::error::IoError;
use machscope::{analyze, analyze_path};

#[test]
fn analyze_path_matches_in_memory_analysis() {
    let data = two_import_image().build();
    let file = create_temp_file(&data);

    let from_file = analyze_path(file.path(), &AnalysisConfig::default()).expect("analyze_path");
    let in_memory = analyze(&data, &AnalysisConfig::default()).expect("analyze");
    assert_eq!(from_file, in_memory);
    assert_eq!(from_file.binding_names(), vec!["_foo", "_bar"]);
}

#[test]
fn mapped_image_exposes_file_bytes() {
    let data = two_import_image().build();
    let file = create_temp_file(&data);
    let image = open_image(file.path());
    assert_eq!(image.bytes(), data.as_slice());
}

#[test]
fn oversized_file_is_refused() {
    let data = two_import_image().build();
    let file = create_temp_file(&data);
    let mut config = AnalysisConfig::default();
    config.io.max_file_size = 64;

    let err = analyze_path(file.path(), &config).unwrap_err();
    assert!(matches!(
        err,
        MachscopeError::Io(IoError::FileTooLarge { limit: 64, .. })
    ));
}

#[test]
fn missing_file_is_an_open_error() {
    let err = analyze_path("/nonexistent/machscope/a.out", &AnalysisConfig::default())
        .unwrap_err();
    assert!(matches!(err, MachscopeError::Io(IoError::Open { .. })));
    assert!(err.to_string().contains("/nonexistent/machscope/a.out"));
}

#[test]
fn empty_file_is_not_macho() {
    let file = create_temp_file(b"");
    let err = analyze_path(file.path(), &AnalysisConfig::default()).unwrap_err();
    assert!(matches!(err, MachscopeError::Macho(_)));
}

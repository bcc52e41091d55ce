//! End-to-end behaviour of the library against real directories

use selective_copier::{
    run_selective_copy_with_output, ParseErrorReason, SelectiveCopyConfig, SelectiveCopyError,
};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn setup(files: &[(&str, &[u8])]) -> (TempDir, SelectiveCopyConfig) {
    let root = TempDir::new().unwrap();
    let source = root.path().join("images");
    let dest = root.path().join("subset");
    fs::create_dir(&source).unwrap();
    fs::create_dir(&dest).unwrap();

    for (name, content) in files {
        fs::write(source.join(name), content).unwrap();
    }

    let config = SelectiveCopyConfig {
        source_dir: source,
        dest_dir: dest,
        extension: "*.jpg".to_string(),
        threshold: 10,
        ..SelectiveCopyConfig::default()
    };
    (root, config)
}

fn snapshot(dir: &Path) -> BTreeMap<String, Vec<u8>> {
    fs::read_dir(dir)
        .unwrap()
        .map(|entry| {
            let entry = entry.unwrap();
            (
                entry.file_name().to_string_lossy().to_string(),
                fs::read(entry.path()).unwrap(),
            )
        })
        .collect()
}

/// Scenario: ids 3, 10 and 11 with the default threshold
#[test]
fn test_copies_only_identifiers_within_threshold() {
    let (_root, config) = setup(&[
        ("img0003.jpg", b"three"),
        ("img0010.jpg", b"ten"),
        ("img0011.jpg", b"eleven"),
    ]);

    run_selective_copy_with_output(&config, &mut Vec::new()).unwrap();

    let copied = snapshot(&config.dest_dir);
    assert_eq!(copied.len(), 2);
    assert_eq!(copied["img0003.jpg"], b"three");
    assert_eq!(copied["img0010.jpg"], b"ten");
    assert!(!copied.contains_key("img0011.jpg"));
}

#[test]
fn test_second_run_leaves_same_files() {
    let (_root, config) = setup(&[("img0001.jpg", b"one"), ("img0099.jpg", b"many")]);

    run_selective_copy_with_output(&config, &mut Vec::new()).unwrap();
    let first = snapshot(&config.dest_dir);

    run_selective_copy_with_output(&config, &mut Vec::new()).unwrap();
    let second = snapshot(&config.dest_dir);

    assert_eq!(first, second);
}

#[test]
fn test_existing_destination_file_is_overwritten() {
    let (_root, config) = setup(&[("img0001.jpg", b"fresh")]);
    fs::write(config.dest_dir.join("img0001.jpg"), b"stale").unwrap();

    run_selective_copy_with_output(&config, &mut Vec::new()).unwrap();

    assert_eq!(fs::read(config.dest_dir.join("img0001.jpg")).unwrap(), b"fresh");
}

#[test]
fn test_unrelated_destination_files_are_untouched() {
    let (_root, config) = setup(&[("img0050.jpg", b"fifty")]);
    fs::write(config.dest_dir.join("img0050.jpg"), b"kept").unwrap();

    run_selective_copy_with_output(&config, &mut Vec::new()).unwrap();

    assert_eq!(fs::read(config.dest_dir.join("img0050.jpg")).unwrap(), b"kept");
}

/// Scenario: a non-numeric name aborts the run
#[test]
fn test_non_numeric_name_fails_with_parse_error() {
    let (_root, config) = setup(&[("abcd.jpg", b"?"), ("img0002.jpg", b"two")]);

    let err = run_selective_copy_with_output(&config, &mut Vec::new()).unwrap_err();

    let SelectiveCopyError::Parse(parse) = err else {
        panic!("expected a parse error");
    };
    assert_eq!(parse.reason, ParseErrorReason::NonDigit);
    assert!(snapshot(&config.dest_dir).is_empty());
}

#[test]
fn test_short_name_fails_with_parse_error() {
    let (_root, config) = setup(&[("x1.jpg", b"?")]);

    let err = run_selective_copy_with_output(&config, &mut Vec::new()).unwrap_err();

    assert!(matches!(
        err,
        SelectiveCopyError::Parse(ref parse) if parse.reason == ParseErrorReason::TooShort
    ));
}

/// Scenario: the destination must already exist
#[test]
fn test_missing_destination_is_not_found() {
    let (root, mut config) = setup(&[("img0001.jpg", b"one")]);
    config.dest_dir = root.path().join("does-not-exist");

    let err = run_selective_copy_with_output(&config, &mut Vec::new()).unwrap_err();

    assert!(matches!(err, SelectiveCopyError::NotFound { .. }));
    assert!(!config.dest_dir.exists());
}

#[test]
fn test_extension_forms_are_equivalent() {
    for extension in ["jpg", ".jpg", "*.jpg"] {
        let (_root, mut config) = setup(&[("img0001.jpg", b"one"), ("img0002.png", b"two")]);
        config.extension = extension.to_string();

        let report = run_selective_copy_with_output(&config, &mut Vec::new()).unwrap();

        assert_eq!(report.copied.len(), 1, "extension {extension}");
        assert_eq!(report.copied[0].file_name, "img0001.jpg");
    }
}

#[test]
fn test_ignore_case_matches_upper_case_extensions() {
    let (_root, mut config) = setup(&[("img0001.JPG", b"upper")]);

    let report = run_selective_copy_with_output(&config, &mut Vec::new()).unwrap();
    assert_eq!(report.candidates_found, 0);

    config.ignore_case = true;
    let report = run_selective_copy_with_output(&config, &mut Vec::new()).unwrap();
    assert_eq!(report.copied.len(), 1);
}

use std::path::PathBuf;

use notedown::config::{load_config_flags, parse_flag_tokens, ConfigFlags};

#[test]
fn test_config_file_parsing_ignores_comments_and_blank_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".notedownrc");
    let content = r#"
# comment
--watch

--save-url http://localhost:5000/notes/new

--out=preview.html
"#;
    std::fs::write(&path, content).unwrap();

    let flags = load_config_flags(&path).unwrap();
    assert!(flags.watch);
    assert_eq!(
        flags.save_url,
        Some("http://localhost:5000/notes/new".to_string())
    );
    assert_eq!(flags.out, Some(PathBuf::from("preview.html")));
}

#[test]
fn test_cli_flags_override_file_flags() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".notedownrc");
    let content = "--watch\n--save-url http://localhost:5000/notes/1/edit\n--quiet-ms 1000\n";
    std::fs::write(&path, content).unwrap();

    let file_flags = load_config_flags(&path).unwrap();
    let cli_args = vec![
        "notedown".to_string(),
        "--quiet-ms".to_string(),
        "2500".to_string(),
        "--no-autosave".to_string(),
    ];
    let cli_flags = parse_flag_tokens(&cli_args);

    let effective = file_flags.union(&cli_flags);
    assert!(effective.watch, "file flags should remain enabled");
    assert!(effective.no_autosave, "cli flags should be applied");
    assert_eq!(effective.quiet_ms, Some(2500), "cli should override the interval");
    assert_eq!(
        effective.save_url,
        Some("http://localhost:5000/notes/1/edit".to_string()),
        "file config should be preserved when CLI does not override"
    );
}

#[test]
fn test_parse_flag_tokens_handles_equals_syntax() {
    let args = vec![
        "notedown".to_string(),
        "--save-url=http://localhost:5000/notes/new".to_string(),
        "--title=journal".to_string(),
        "--quiet-ms=500".to_string(),
    ];
    let flags = parse_flag_tokens(&args);
    assert_eq!(
        flags,
        ConfigFlags {
            save_url: Some("http://localhost:5000/notes/new".to_string()),
            title: Some("journal".to_string()),
            quiet_ms: Some(500),
            ..ConfigFlags::default()
        }
    );
}

use dirtemplate::error::Error;
use dirtemplate::paths::{apply_renames, resolve_rename_rules, RenamePair};
use dirtemplate::renderer::MiniJinjaRenderer;
use serde_json::json;
use std::collections::HashMap;
use std::fs;
use tempfile::TempDir;

fn pair(from: &str, to: &str) -> RenamePair {
    RenamePair { rule: from.to_string(), from: from.to_string(), to: to.to_string() }
}

#[test]
fn test_resolve_rename_rules() {
    let renderer = MiniJinjaRenderer::new();
    let mut rules = HashMap::new();
    rules.insert("app/{{ Name }}.go".to_string(), "app/{{ Name }}_main.go".to_string());
    rules.insert("README.md".to_string(), "docs/README.md".to_string());

    let pairs = resolve_rename_rules(&renderer, &rules, &json!({"Name": "billing"})).unwrap();

    assert_eq!(
        pairs,
        vec![
            RenamePair {
                rule: "README.md".to_string(),
                from: "README.md".to_string(),
                to: "docs/README.md".to_string(),
            },
            RenamePair {
                rule: "app/{{ Name }}.go".to_string(),
                from: "app/billing.go".to_string(),
                to: "app/billing_main.go".to_string(),
            },
        ]
    );
}

#[test]
fn test_resolve_rename_rules_reports_rule() {
    let renderer = MiniJinjaRenderer::new();
    let mut rules = HashMap::new();
    rules.insert("{{ Missing }}.go".to_string(), "main.go".to_string());

    match resolve_rename_rules(&renderer, &rules, &json!({})) {
        Err(Error::RenameRuleError { rule, .. }) => assert_eq!(rule, "{{ Missing }}.go"),
        other => panic!("Expected RenameRuleError, got {other:?}"),
    }
}

#[test]
fn test_apply_renames_moves_existing_paths() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::create_dir_all(root.join("app")).unwrap();
    fs::write(root.join("app/billing.go"), "package billing").unwrap();

    let moved = apply_renames(root, &[pair("app/billing.go", "cmd/billing/main.go")]).unwrap();

    assert_eq!(moved, vec![("app/billing.go".to_string(), "cmd/billing/main.go".to_string())]);
    assert!(!root.join("app/billing.go").exists());
    assert_eq!(fs::read_to_string(root.join("cmd/billing/main.go")).unwrap(), "package billing");
}

#[test]
fn test_apply_renames_skips_missing_source() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::write(root.join("keep.txt"), "keep").unwrap();

    let moved = apply_renames(root, &[pair("optional/feature.go", "feature.go"), pair("", "x")])
        .unwrap();

    assert!(moved.is_empty());
    assert!(!root.join("feature.go").exists());
    assert_eq!(fs::read_to_string(root.join("keep.txt")).unwrap(), "keep");
}

#[test]
fn test_apply_renames_refuses_occupied_target() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::write(root.join("a.txt"), "a").unwrap();
    fs::write(root.join("b.txt"), "b").unwrap();

    let err = apply_renames(root, &[pair("a.txt", "b.txt")]).unwrap_err();

    assert!(matches!(err, Error::RenameError { .. }));
    assert_eq!(fs::read_to_string(root.join("a.txt")).unwrap(), "a");
    assert_eq!(fs::read_to_string(root.join("b.txt")).unwrap(), "b");
}

#[test]
fn test_apply_renames_rejects_escaping_paths() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::write(root.join("a.txt"), "a").unwrap();

    let err = apply_renames(root, &[pair("a.txt", "../a.txt")]).unwrap_err();
    assert!(matches!(err, Error::InvalidRenderedPath { .. }));
}

#[test]
fn test_apply_renames_reports_literal_source() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::write(root.join("{{ Name }}.go"), "package billing").unwrap();

    let rendered = RenamePair {
        rule: "{{ Name }}.go".to_string(),
        from: "billing.go".to_string(),
        to: "billing_main.go".to_string(),
    };
    let moved = apply_renames(root, &[rendered]).unwrap();

    assert_eq!(moved, vec![("{{ Name }}.go".to_string(), "billing_main.go".to_string())]);
    assert!(root.join("billing_main.go").exists());
}

use std::{fs, path::Path};

use tempfile::TempDir;
use tokensource_core::{
    consolidate, split,
    store::{METADATA_FILE, THEMES_FILE},
    OrderIndex, SplitOptions, ThemesPolicy, WriteKind,
};

const CONSOLIDATED: &str = r##"{"core":{"color":{"primary":{"$type":"color","$value":"#007bff"}}},"global":{"colors":{"text":{"$type":"color","$value":"{core.color.primary}"}}}}"##;

fn write_store(dir: &Path) {
    fs::create_dir_all(dir).unwrap();
    fs::write(
        dir.join(METADATA_FILE),
        r#"{"tokenSetOrder":["core","global"]}"#,
    )
    .unwrap();
    fs::write(dir.join(THEMES_FILE), "{}").unwrap();
    fs::write(
        dir.join("core.json"),
        r##"{"color":{"primary":{"$type":"color","$value":"#007bff"}}}"##,
    )
    .unwrap();
    fs::write(
        dir.join("global.json"),
        r#"{"colors":{"text":{"$type":"color","$value":"{core.color.primary}"}}}"#,
    )
    .unwrap();
}

fn read_value(path: &Path) -> serde_json::Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

fn no_backup() -> SplitOptions {
    SplitOptions {
        backup: false,
        ..SplitOptions::default()
    }
}

#[test]
fn consolidates_scenario_store() {
    let dir = TempDir::new().unwrap();
    let tokens = dir.path().join("tokens");
    write_store(&tokens);
    let output = dir.path().join("tokensource.json");

    let report = consolidate(&tokens, &output).unwrap();
    assert_eq!(report.token_sets_written, 2);
    assert!(report.warnings.is_empty());

    let written = fs::read_to_string(&output).unwrap();
    let compact = serde_json::to_string(&read_value(&output)).unwrap();
    assert_eq!(compact, CONSOLIDATED);
    assert!(written.starts_with("{\n  \"core\": {\n    \"color\""));
}

#[test]
fn splits_scenario_document() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("tokensource.json");
    fs::write(&source, CONSOLIDATED).unwrap();
    let tokens = dir.path().join("tokens");

    split(&source, &tokens, &no_backup()).unwrap();
    let index: OrderIndex = serde_json::from_value(read_value(&tokens.join(METADATA_FILE))).unwrap();
    assert_eq!(index.token_set_order, ["core", "global"]);
    assert_eq!(
        serde_json::to_string(&read_value(&tokens.join("core.json"))).unwrap(),
        r##"{"color":{"primary":{"$type":"color","$value":"#007bff"}}}"##
    );
    assert!(tokens.join("global.json").is_file());
    assert!(tokens.join(THEMES_FILE).is_file());
}

#[test]
fn consolidate_of_split_reproduces_document() {
    let dir = TempDir::new().unwrap();
    let document = r##"{
  "zeta": {
    "$description": "declared first, sorts last",
    "space": { "1.5": { "$value": 6, "$type": "spacing" } }
  },
  "alpha": {
    "shadow": {
      "$type": "boxShadow",
      "$value": { "x": 0, "y": 2, "color": "{zeta.space.1.5}" },
      "$extensions": { "studio.tokens": { "modify": { "type": "alpha", "value": "0.5" } } }
    },
    "ref": { "$type": "color", "$value": "{beta.missing}" }
  }
}"##;
    let source = dir.path().join("in.json");
    fs::write(&source, document).unwrap();
    let tokens = dir.path().join("tokens");
    split(&source, &tokens, &no_backup()).unwrap();

    let output = dir.path().join("out.json");
    let report = consolidate(&tokens, &output).unwrap();
    assert_eq!(report.token_sets_written, 2);
    assert_eq!(report.warnings.len(), 1);

    let original: serde_json::Value = serde_json::from_str(document).unwrap();
    assert_eq!(
        serde_json::to_string(&read_value(&output)).unwrap(),
        serde_json::to_string(&original).unwrap()
    );

    // A second pass is byte-for-byte stable.
    let again = dir.path().join("tokens-again");
    split(&output, &again, &no_backup()).unwrap();
    for file in ["zeta.json", "alpha.json", METADATA_FILE] {
        assert_eq!(
            fs::read(tokens.join(file)).unwrap(),
            fs::read(again.join(file)).unwrap(),
            "{file}"
        );
    }
}

#[test]
fn split_of_consolidate_reproduces_sets() {
    let dir = TempDir::new().unwrap();
    let tokens = dir.path().join("tokens");
    write_store(&tokens);
    let output = dir.path().join("tokensource.json");
    consolidate(&tokens, &output).unwrap();

    let copy = dir.path().join("copy");
    let options = SplitOptions {
        themes: ThemesPolicy::CopyFrom(tokens.join(THEMES_FILE)),
        ..no_backup()
    };
    split(&output, &copy, &options).unwrap();
    for file in ["core.json", "global.json", METADATA_FILE] {
        assert_eq!(
            serde_json::to_string(&read_value(&tokens.join(file))).unwrap(),
            serde_json::to_string(&read_value(&copy.join(file))).unwrap(),
            "{file}"
        );
    }
    assert_eq!(
        fs::read(tokens.join(THEMES_FILE)).unwrap(),
        fs::read(copy.join(THEMES_FILE)).unwrap()
    );
}

#[test]
fn dry_run_reports_three_sets_and_creates_nothing() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("tokensource.json");
    fs::write(
        &source,
        r#"{"a":{"x":{"$type":"t","$value":"1"}},"b":{"y":{"$type":"t","$value":"2"}},"c":{"z":{"$type":"t","$value":"3"}}}"#,
    )
    .unwrap();
    let tokens = dir.path().join("tokens");

    let report = split(
        &source,
        &tokens,
        &SplitOptions {
            dry_run: true,
            ..SplitOptions::default()
        },
    )
    .unwrap();
    let set_writes = report
        .writes
        .iter()
        .filter(|write| matches!(write.kind, WriteKind::TokenSet(_)))
        .count();
    assert_eq!(set_writes, 3);
    assert!(!tokens.exists());
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}

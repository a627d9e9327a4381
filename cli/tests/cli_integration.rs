use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn ldfserver_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_ldfserver"))
}

fn tmp_dir(name: &str) -> PathBuf {
    let mut base = std::env::temp_dir();
    base.push(format!("ldfserver-cli-{}-{}", name, std::process::id()));
    if base.exists() {
        let _ = fs::remove_dir_all(&base);
    }
    fs::create_dir_all(&base).unwrap();
    base
}

/// A configuration serving a small social graph as dataset `people`.
fn write_config(root: &Path) -> PathBuf {
    fs::write(
        root.join("people.ttl"),
        "@prefix ex: <http://example.org/> .\n\
         ex:alice ex:knows ex:bob , ex:carol .\n\
         ex:bob ex:knows ex:carol .\n\
         ex:alice ex:name \"Alice\" .\n",
    )
    .expect("write ttl");
    let config = root.join("config.json");
    fs::write(
        &config,
        r#"{
            "title": "CLI fragments",
            "baseURL": "http://localhost:3000/",
            "pageSize": 2,
            "datasources": {
                "people": { "title": "People", "type": "dictionary",
                            "settings": { "file": "people.ttl" } }
            }
        }"#,
    )
    .expect("write config");
    config
}

fn run(args: &[&str]) -> Output {
    Command::new(ldfserver_bin())
        .args(args)
        .output()
        .expect("run ldfserver")
}

#[test]
fn datasets_lists_configuration() {
    let root = tmp_dir("datasets");
    let config = write_config(&root);
    let out = run(&["datasets", "--config", config.to_str().unwrap()]);
    assert!(
        out.status.success(),
        "datasets failed: {}",
        String::from_utf8_lossy(&out.stderr)
    );
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert_eq!(stdout.trim(), "people\tdictionary\tPeople");

    let out = run(&["datasets", "--config", config.to_str().unwrap(), "--json"]);
    let json: serde_json::Value = serde_json::from_slice(&out.stdout).expect("json output");
    assert_eq!(json["people"]["type"], "dictionary");
}

#[test]
fn fragment_prints_one_page() {
    let root = tmp_dir("fragment");
    let config = write_config(&root);
    let out = run(&[
        "fragment",
        "--config",
        config.to_str().unwrap(),
        "people",
        "--predicate",
        "http://example.org/knows",
        "--format",
        "application/n-triples",
    ]);
    assert!(
        out.status.success(),
        "fragment failed: {}",
        String::from_utf8_lossy(&out.stderr)
    );
    let stdout = String::from_utf8_lossy(&out.stdout);
    let matches = stdout
        .lines()
        .filter(|line| line.contains("<http://example.org/knows>"))
        .count();
    assert_eq!(matches, 2);
    assert!(stdout.contains("http://www.w3.org/ns/hydra/core#nextPage"));

    let out = run(&[
        "fragment",
        "--config",
        config.to_str().unwrap(),
        "people",
        "--predicate",
        "http://example.org/knows",
        "--page",
        "2",
        "--format",
        "application/n-triples",
    ]);
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("http://www.w3.org/ns/hydra/core#previousPage"));
    assert!(!stdout.contains("http://www.w3.org/ns/hydra/core#nextPage"));
}

#[test]
fn unknown_dataset_fails() {
    let root = tmp_dir("unknown");
    let config = write_config(&root);
    let out = run(&["fragment", "--config", config.to_str().unwrap(), "nobody"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains("not found!"));
}

#[test]
fn missing_configuration_fails() {
    let root = tmp_dir("missing");
    let out = run(&[
        "datasets",
        "--config",
        root.join("nope.json").to_str().unwrap(),
    ]);
    assert!(!out.status.success());
}

use callmap::inventory::defined_functions;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_file(root: &Path, rel: &str, content: &str) -> PathBuf {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn inventories_scripts_and_components() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    write_file(
        root,
        "src/app.js",
        r#"
function main() {}
const helper = () => {};
const limit = 10;
"#,
    );
    write_file(
        root,
        "src/views/Home.vue",
        r#"
<template><div/></template>
<script setup>
const onClick = () => {};
</script>
"#,
    );
    write_file(root, "node_modules/pkg/index.js", "function hidden() {}\n");
    write_file(root, "dist/bundle.js", "function built() {}\n");

    let defs = defined_functions(root).unwrap();
    let names: Vec<&str> = defs.iter().map(|def| def.name.as_str()).collect();
    assert!(names.contains(&"main"));
    assert!(names.contains(&"helper"));
    assert!(names.contains(&"onClick"));
    assert!(!names.contains(&"hidden"));
    assert!(!names.contains(&"built"));
    assert!(!names.contains(&"limit"));

    let main_def = defs.iter().find(|def| def.name == "main").unwrap();
    assert!(main_def.path.ends_with("src/app.js"));
}

#[test]
fn imported_bindings_are_not_inventoried_here() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    write_file(root, "b.js", "function bar() {}\n");
    write_file(
        root,
        "a.js",
        r#"
import { bar } from "./b.js";
function foo() { bar(); }
"#,
    );

    let defs = defined_functions(root).unwrap();
    let from_a: Vec<&str> = defs
        .iter()
        .filter(|def| def.path.ends_with("a.js"))
        .map(|def| def.name.as_str())
        .collect();
    assert_eq!(from_a, vec!["foo"]);
}

#[test]
fn broken_file_contributes_nothing() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    write_file(root, "broken.js", "function ((( {\n");
    write_file(root, "ok.js", "function fine() {}\n");

    let defs = defined_functions(root).unwrap();
    assert_eq!(defs.len(), 1);
    assert_eq!(defs[0].name, "fine");
}

#[test]
fn component_without_script_is_not_an_error() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    write_file(root, "Empty.vue", "<template><div/></template>\n");

    let defs = defined_functions(root).unwrap();
    assert!(defs.is_empty());
}

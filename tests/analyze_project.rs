use callmap::analyzer::Analyzer;
use callmap::diagram;
use callmap::model::AnalysisResult;
use std::collections::HashSet;
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

fn shared_helper_project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    write_file(root, "utils.js", "function helper() {}\n");
    write_file(
        root,
        "a.js",
        r#"
import { helper } from "./utils.js";
function alpha() { helper(); }
"#,
    );
    write_file(
        root,
        "b.js",
        r#"
import { helper } from "./utils.js";
function beta() { helper(); }
"#,
    );
    tmp
}

fn entry<'a>(result: &'a AnalysisResult, name: &str) -> &'a callmap::model::FunctionEntry {
    result
        .values()
        .flatten()
        .find(|func| func.function_name == name)
        .unwrap_or_else(|| panic!("no entry for {name}"))
}

#[test]
fn shared_callee_converges_on_one_id() {
    let tmp = shared_helper_project();
    let mut analyzer = Analyzer::new(tmp.path().to_path_buf());
    let result = analyzer.analyze().unwrap();

    let alpha = entry(&result, "alpha");
    let beta = entry(&result, "beta");
    let helper = entry(&result, "helper");

    let alpha_call = alpha.calls.user_defined[0].id.as_deref().unwrap();
    let beta_call = beta.calls.user_defined[0].id.as_deref().unwrap();
    assert_eq!(alpha_call, beta_call);
    assert_eq!(alpha_call, helper.function_id);
}

#[test]
fn result_groups_by_absolute_path() {
    let tmp = shared_helper_project();
    let mut analyzer = Analyzer::new(tmp.path().to_path_buf());
    let result = analyzer.analyze().unwrap();

    assert_eq!(result.len(), 3);
    for (path, functions) in &result {
        assert!(Path::new(path).is_absolute());
        assert!(!functions.is_empty());
    }

    let json = serde_json::to_string_pretty(&result).unwrap();
    assert!(json.contains("\"functionName\""));
    assert!(json.contains("\"functionId\""));
    assert!(json.contains("\"userDefined\""));
    let roundtrip: AnalysisResult = serde_json::from_str(&json).unwrap();
    assert_eq!(roundtrip, result);
}

#[test]
fn id_diagram_deduplicates_edges() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    write_file(root, "utils.js", "function helper() {}\n");
    write_file(
        root,
        "a.js",
        r#"
import { helper } from "./utils.js";
function twice() {
    helper();
    helper();
}
"#,
    );

    let mut analyzer = Analyzer::new(root.to_path_buf());
    let result = analyzer.analyze().unwrap();
    let id_diagram = diagram::id_diagram(&result);
    let lines: Vec<&str> = id_diagram.lines().collect();
    assert_eq!(lines[0], "graph TD");
    // twice -> helper once despite two call sites
    assert_eq!(lines.len(), 2);
}

#[test]
fn readable_diagram_uses_sanitized_labels() {
    let tmp = shared_helper_project();
    let mut analyzer = Analyzer::new(tmp.path().to_path_buf());
    let result = analyzer.analyze().unwrap();

    let id_diagram = diagram::id_diagram(&result);
    let readable = diagram::readable_diagram(&id_diagram, &result, analyzer.project_root());
    assert!(readable.starts_with("graph TD"));
    assert!(readable.contains("  a.js_alpha --> utils.js_helper"));
    assert!(readable.contains("  b.js_beta --> utils.js_helper"));
    for line in readable.lines().skip(1) {
        let (from, to) = line.trim().split_once(" --> ").unwrap();
        assert!(!from.contains('/'));
        assert!(!to.contains('/'));
    }
}

#[test]
fn reruns_are_edge_isomorphic() {
    let tmp = shared_helper_project();

    let mut first = Analyzer::new(tmp.path().to_path_buf());
    let first_result = first.analyze().unwrap();
    let mut second = Analyzer::new(tmp.path().to_path_buf());
    let second_result = second.analyze().unwrap();

    // Ids differ between registries, but the labeled edge structure is
    // identical.
    let edges = |result: &AnalysisResult, root: &Path| -> HashSet<String> {
        let id_diagram = diagram::id_diagram(result);
        diagram::readable_diagram(&id_diagram, result, root)
            .lines()
            .skip(1)
            .map(|line| line.trim().to_string())
            .collect()
    };
    assert_eq!(
        edges(&first_result, first.project_root()),
        edges(&second_result, second.project_root())
    );
}

#[test]
fn nested_component_paths_flatten_in_labels() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    write_file(root, "src/model/session.js", "function create() {}\n");
    write_file(
        root,
        "src/views/Home.vue",
        r#"
<script setup>
import { create } from "../model/session.js";
const onClick = () => { create(); };
</script>
"#,
    );

    let mut analyzer = Analyzer::new(root.to_path_buf());
    let result = analyzer.analyze().unwrap();
    let id_diagram = diagram::id_diagram(&result);
    let readable = diagram::readable_diagram(&id_diagram, &result, analyzer.project_root());
    assert!(
        readable.contains("  src_views_Home.vue_onClick --> src_model_session.js_create"),
        "unexpected diagram: {readable}"
    );
}

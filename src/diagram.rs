use crate::model::{AnalysisResult, DiagramEdge};
use std::collections::{HashMap, HashSet};
use std::path::Path;

pub const DIAGRAM_HEADER: &str = "graph TD";

/// Identifier-keyed diagram: one ` --> ` line per distinct
/// caller-id/callee-id pair, in discovery order.
pub fn id_diagram(result: &AnalysisResult) -> String {
    let mut lines = vec![DIAGRAM_HEADER.to_string()];
    let mut seen = HashSet::new();
    for functions in result.values() {
        for func in functions {
            for call in &func.calls.user_defined {
                let Some(call_id) = call.id.as_deref() else {
                    continue;
                };
                let edge = format!("  {} --> {}", func.function_id, call_id);
                if seen.insert(edge.clone()) {
                    lines.push(edge);
                }
            }
        }
    }
    lines.join("\n")
}

/// Relabel an id-keyed diagram into the human-readable variant using the
/// id -> label map derived from the aggregate. Unknown ids keep their raw
/// token.
pub fn readable_diagram(
    id_diagram: &str,
    result: &AnalysisResult,
    project_root: &Path,
) -> String {
    let labels = id_label_map(result, project_root);
    let mut lines = vec![DIAGRAM_HEADER.to_string()];
    for line in id_diagram.lines().skip(1) {
        let Some((from, to)) = line.trim().split_once(" --> ") else {
            continue;
        };
        let from_label = labels.get(from).map(String::as_str).unwrap_or(from);
        let to_label = labels.get(to).map(String::as_str).unwrap_or(to);
        lines.push(format!("  {from_label} --> {to_label}"));
    }
    lines.join("\n")
}

fn id_label_map(result: &AnalysisResult, project_root: &Path) -> HashMap<String, String> {
    let mut labels = HashMap::new();
    for (file_path, functions) in result {
        for func in functions {
            labels.insert(
                func.function_id.clone(),
                node_label(Path::new(file_path), &func.function_name, project_root),
            );
            for call in &func.calls.user_defined {
                if let Some(call_id) = &call.id {
                    labels.insert(
                        call_id.clone(),
                        node_label(&call.path, &call.name, project_root),
                    );
                }
            }
        }
    }
    labels
}

/// Diagram-safe node token: project-relative path with separators replaced
/// by `_`, then `_` and the function name.
pub fn node_label(path: &Path, function_name: &str, project_root: &Path) -> String {
    let rel = path.strip_prefix(project_root).unwrap_or(path);
    let sanitized = rel
        .to_string_lossy()
        .replace(['/', '\\'], "_");
    format!("{sanitized}_{function_name}")
}

/// Read ` --> ` edge lines back out of a diagram, tolerating the header
/// and any other preamble lines.
pub fn parse_diagram(content: &str) -> Vec<DiagramEdge> {
    content
        .lines()
        .map(str::trim)
        .filter_map(|line| line.split_once(" --> "))
        .map(|(from, to)| DiagramEdge {
            from: from.trim().to_string(),
            to: to.trim().to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{node_label, parse_diagram};
    use std::path::Path;

    #[test]
    fn labels_have_no_separators() {
        let label = node_label(
            Path::new("/proj/src/views/Home.vue"),
            "onClick",
            Path::new("/proj"),
        );
        assert_eq!(label, "src_views_Home.vue_onClick");
        assert!(!label.contains('/'));
    }

    #[test]
    fn parses_edge_lines_only() {
        let content = "graph TD\n  a --> b\n  b --> c\nnot an edge\n";
        let edges = parse_diagram(content);
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[0].from, "a");
        assert_eq!(edges[0].to, "b");
        assert_eq!(edges[1].from, "b");
        assert_eq!(edges[1].to, "c");
    }
}

use crate::diagram::{DIAGRAM_HEADER, node_label};
use crate::model::{AnalysisResult, DiagramEdge, FunctionEntry};
use std::collections::HashSet;
use std::path::Path;

/// Extract the induced subgraph of the aggregate result around every
/// function whose name contains `filter_text` case-insensitively: the
/// matches themselves, every transitive callee, and every transitive
/// caller. The visited set is keyed by function id, so diamonds appear
/// once and cyclic call graphs terminate.
pub fn filter_result(result: &AnalysisResult, filter_text: &str) -> AnalysisResult {
    let needle = filter_text.to_lowercase();
    let mut filtered = AnalysisResult::new();
    let mut visited: HashSet<String> = HashSet::new();

    for functions in result.values() {
        for func in functions {
            if func.function_name.to_lowercase().contains(&needle) {
                for (path, entry) in find_call_chain(result, &func.function_name, &mut visited) {
                    filtered.entry(path).or_default().push(entry);
                }
            }
        }
    }

    for functions in result.values() {
        for func in functions {
            if func.function_name.to_lowercase().contains(&needle) {
                for (path, entry) in find_parent_chain(result, &func.function_name, &mut visited) {
                    filtered.entry(path).or_default().push(entry);
                }
            }
        }
    }

    filtered
}

/// Descendants: every function reachable by following userDefined call
/// names forward.
fn find_call_chain(
    result: &AnalysisResult,
    function_name: &str,
    visited: &mut HashSet<String>,
) -> Vec<(String, FunctionEntry)> {
    let mut chain = Vec::new();
    for (file_path, functions) in result {
        for func in functions {
            if !func.function_name.eq_ignore_ascii_case(function_name) {
                continue;
            }
            if !visited.insert(func.function_id.clone()) {
                continue;
            }
            chain.push((file_path.clone(), func.clone()));
            for call in &func.calls.user_defined {
                chain.extend(find_call_chain(result, &call.name, visited));
            }
        }
    }
    chain
}

/// Ancestors: every function whose userDefined calls mention the name,
/// transitively.
fn find_parent_chain(
    result: &AnalysisResult,
    function_name: &str,
    visited: &mut HashSet<String>,
) -> Vec<(String, FunctionEntry)> {
    let mut chain = Vec::new();
    for (file_path, functions) in result {
        for func in functions {
            if visited.contains(&func.function_id) {
                continue;
            }
            let calls_target = func
                .calls
                .user_defined
                .iter()
                .any(|call| call.name.eq_ignore_ascii_case(function_name));
            if !calls_target {
                continue;
            }
            visited.insert(func.function_id.clone());
            chain.push((file_path.clone(), func.clone()));
            chain.extend(find_parent_chain(result, &func.function_name, visited));
        }
    }
    chain
}

/// Edge-list mode: the chain node set induced by `filter_text` over raw
/// diagram edges, matching nodes plus all their descendants and
/// ancestors.
pub fn extract_call_chain(edges: &[DiagramEdge], filter_text: &str) -> Vec<String> {
    let needle = filter_text.to_lowercase();
    let mut visited: HashSet<String> = HashSet::new();
    let mut chain = Vec::new();
    for edge in edges {
        let matched = edge.from.to_lowercase().contains(&needle)
            || edge.to.to_lowercase().contains(&needle);
        if !matched {
            continue;
        }
        if visited.insert(edge.from.clone()) {
            chain.push(edge.from.clone());
            find_children(edges, &edge.from, &mut visited, &mut chain);
            find_parents(edges, &edge.from, &mut visited, &mut chain);
        }
        if visited.insert(edge.to.clone()) {
            chain.push(edge.to.clone());
            find_children(edges, &edge.to, &mut visited, &mut chain);
            find_parents(edges, &edge.to, &mut visited, &mut chain);
        }
    }
    chain
}

fn find_children(
    edges: &[DiagramEdge],
    node: &str,
    visited: &mut HashSet<String>,
    out: &mut Vec<String>,
) {
    for edge in edges {
        if edge.from == node && visited.insert(edge.to.clone()) {
            out.push(edge.to.clone());
            find_children(edges, &edge.to, visited, out);
        }
    }
}

fn find_parents(
    edges: &[DiagramEdge],
    node: &str,
    visited: &mut HashSet<String>,
    out: &mut Vec<String>,
) {
    for edge in edges {
        if edge.to == node && visited.insert(edge.from.clone()) {
            out.push(edge.from.clone());
            find_parents(edges, &edge.from, visited, out);
        }
    }
}

/// Readable diagram of a filtered result. Only edges whose endpoints are
/// both in the induced node set appear; an ancestor's calls that leave the
/// chain are dropped.
pub fn subgraph_diagram(filtered: &AnalysisResult, project_root: &Path) -> String {
    let nodes: HashSet<String> = filtered
        .iter()
        .flat_map(|(file_path, functions)| {
            functions
                .iter()
                .map(|func| node_label(Path::new(file_path), &func.function_name, project_root))
        })
        .collect();
    let mut lines = vec![DIAGRAM_HEADER.to_string()];
    let mut seen = HashSet::new();
    for (file_path, functions) in filtered {
        for func in functions {
            let from = node_label(Path::new(file_path), &func.function_name, project_root);
            for call in &func.calls.user_defined {
                let to = node_label(&call.path, &call.name, project_root);
                if !nodes.contains(&to) {
                    continue;
                }
                let edge = format!("  {from} --> {to}");
                if seen.insert(edge.clone()) {
                    lines.push(edge);
                }
            }
        }
    }
    lines.join("\n")
}

/// Keep only the edges whose endpoints are both in the chain.
pub fn filtered_diagram(edges: &[DiagramEdge], chain: &[String]) -> String {
    let nodes: HashSet<&str> = chain.iter().map(String::as_str).collect();
    let mut lines = vec![DIAGRAM_HEADER.to_string()];
    for edge in edges {
        if nodes.contains(edge.from.as_str()) && nodes.contains(edge.to.as_str()) {
            lines.push(format!("  {} --> {}", edge.from, edge.to));
        }
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::{extract_call_chain, filtered_diagram};
    use crate::model::DiagramEdge;

    fn edge(from: &str, to: &str) -> DiagramEdge {
        DiagramEdge {
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    #[test]
    fn chain_covers_descendants_and_ancestors() {
        let edges = vec![
            edge("root", "target"),
            edge("target", "child"),
            edge("child", "grandchild"),
            edge("unrelated", "island"),
        ];
        let chain = extract_call_chain(&edges, "TARGET");
        assert!(chain.contains(&"root".to_string()));
        assert!(chain.contains(&"target".to_string()));
        assert!(chain.contains(&"child".to_string()));
        assert!(chain.contains(&"grandchild".to_string()));
        assert!(!chain.contains(&"island".to_string()));
    }

    #[test]
    fn diamond_nodes_appear_once() {
        let edges = vec![
            edge("target", "left"),
            edge("target", "right"),
            edge("left", "join"),
            edge("right", "join"),
        ];
        let chain = extract_call_chain(&edges, "target");
        let joins = chain.iter().filter(|node| node.as_str() == "join").count();
        assert_eq!(joins, 1);
    }

    #[test]
    fn cyclic_edges_terminate() {
        let edges = vec![edge("a", "b"), edge("b", "a")];
        let chain = extract_call_chain(&edges, "a");
        assert!(chain.contains(&"a".to_string()));
        assert!(chain.contains(&"b".to_string()));
        assert_eq!(chain.len(), 2);
    }

    #[test]
    fn filtered_diagram_requires_both_endpoints() {
        let edges = vec![edge("a", "b"), edge("b", "c"), edge("c", "d")];
        let chain = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let diagram = filtered_diagram(&edges, &chain);
        assert!(diagram.contains("a --> b"));
        assert!(diagram.contains("b --> c"));
        assert!(!diagram.contains("c --> d"));
    }
}

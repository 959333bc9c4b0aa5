use crate::error::AnalysisError;
use std::path::Path;
use tree_sitter::{Node, Parser, Tree};

/// Parse one script body under the fixed dialect (latest ECMAScript,
/// module semantics). Malformed syntax fails with a `Parse` error carrying
/// the file and the first offending position; callers contain it at the
/// file boundary.
pub fn parse_script(script: &str, file: &Path) -> Result<Tree, AnalysisError> {
    let mut parser = Parser::new();
    let language = tree_sitter_javascript::LANGUAGE;
    parser
        .set_language(&language.into())
        .map_err(|err| AnalysisError::Parse {
            file: file.to_path_buf(),
            message: err.to_string(),
        })?;
    let tree = parser
        .parse(script, None)
        .ok_or_else(|| AnalysisError::Parse {
            file: file.to_path_buf(),
            message: "parser produced no tree".to_string(),
        })?;
    let root = tree.root_node();
    if root.has_error() {
        let message = match first_error(root) {
            Some((line, column)) => format!("syntax error at line {line}, column {column}"),
            None => "syntax error".to_string(),
        };
        return Err(AnalysisError::Parse {
            file: file.to_path_buf(),
            message,
        });
    }
    Ok(tree)
}

fn first_error(root: Node<'_>) -> Option<(usize, usize)> {
    let mut stack = vec![root];
    let mut best: Option<(usize, usize)> = None;
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            let pos = node.start_position();
            let candidate = (pos.row + 1, pos.column + 1);
            if best.map(|current| candidate < current).unwrap_or(true) {
                best = Some(candidate);
            }
            continue;
        }
        if !node.has_error() {
            continue;
        }
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            stack.push(child);
        }
    }
    best
}

pub fn node_text(node: Node<'_>, source: &str) -> String {
    let start = node.start_byte();
    let end = node.end_byte();
    source.get(start..end).unwrap_or("").trim().to_string()
}

pub fn unquote_string_literal(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.len() < 2 {
        return None;
    }
    let first = trimmed.chars().next()?;
    if first == '"' || first == '\'' || first == '`' {
        let last = trimmed.chars().last()?;
        if last == first {
            return Some(trimmed[1..trimmed.len() - 1].to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::{parse_script, unquote_string_literal};
    use std::path::Path;

    #[test]
    fn parses_module_source() {
        let tree = parse_script("import { a } from './a.js';\na();\n", Path::new("x.js")).unwrap();
        assert_eq!(tree.root_node().kind(), "program");
    }

    #[test]
    fn malformed_source_is_a_parse_error() {
        let err = parse_script("function (((", Path::new("broken.js")).unwrap_err();
        assert!(err.to_string().contains("broken.js"));
    }

    #[test]
    fn unquotes_literals() {
        assert_eq!(unquote_string_literal("'./a.js'").as_deref(), Some("./a.js"));
        assert_eq!(unquote_string_literal("\"@/m\"").as_deref(), Some("@/m"));
        assert_eq!(unquote_string_literal("notquoted"), None);
    }
}

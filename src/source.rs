use crate::error::AnalysisError;
use crate::scan::{SourceKind, source_kind};
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

static SCRIPT_BLOCK: OnceLock<Regex> = OnceLock::new();

/// Matches every `<script ...>...</script>` block, including
/// `<script setup>`, across lines and case-insensitively.
fn script_block_regex() -> &'static Regex {
    SCRIPT_BLOCK.get_or_init(|| {
        Regex::new(r"(?is)<script[^>]*>(.*?)</script>").expect("script block pattern")
    })
}

/// Extract the embedded script blocks from component markup, in document
/// order.
pub fn extract_script_content(markup: &str) -> Vec<String> {
    script_block_regex()
        .captures_iter(markup)
        .map(|cap| cap[1].to_string())
        .collect()
}

/// Return the script bodies to analyze for one file: the whole content for
/// a plain script, one body per `<script>` block for a component. A
/// component without any script block contributes zero bodies (warned, not
/// failed).
pub fn script_bodies(path: &Path) -> Result<Vec<String>, AnalysisError> {
    let kind = source_kind(path).ok_or_else(|| AnalysisError::UnsupportedFileType {
        path: path.to_path_buf(),
    })?;
    let content = fs::read_to_string(path).map_err(|source| AnalysisError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    match kind {
        SourceKind::Script => Ok(vec![content]),
        SourceKind::Component => {
            let bodies = extract_script_content(&content);
            if bodies.is_empty() {
                let missing = AnalysisError::MissingScriptContent {
                    path: path.to_path_buf(),
                };
                eprintln!("callmap: {missing}");
            }
            Ok(bodies)
        }
    }
}

use regex::Regex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use uuid::Uuid;

static MODULE_METHOD: OnceLock<Regex> = OnceLock::new();

fn module_method_regex() -> &'static Regex {
    MODULE_METHOD.get_or_init(|| Regex::new(r"^(\w+)\.(\w+)$").expect("dotted name pattern"))
}

/// Run-scoped identity registry: every physical function gets exactly one
/// opaque id, however many call sites reference it. Keys are
/// `resolvedName@resolvedFile`; the first lookup allocates, later lookups
/// return the same id.
#[derive(Debug, Default)]
pub struct IdRegistry {
    ids: HashMap<String, String>,
}

impl IdRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id_for(&mut self, name: &str, file: &Path, project_root: &Path) -> String {
        let (resolved_name, resolved_file) = resolve_dotted_name(name, file, project_root);
        let key = format!("{resolved_name}@{}", resolved_file.display());
        self.ids
            .entry(key)
            .or_insert_with(|| Uuid::new_v4().to_string())
            .clone()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// `Module.function` dotted names follow the model-module convention: the
/// identity key is re-derived as the bare function name in
/// `<project_root>/src/model/<module_lower>.js`, so a dotted reference and
/// the function's own record converge on one node.
pub fn resolve_dotted_name(name: &str, file: &Path, project_root: &Path) -> (String, PathBuf) {
    if let Some(caps) = module_method_regex().captures(name) {
        let module = caps[1].to_lowercase();
        let function = caps[2].to_string();
        let path = project_root
            .join("src")
            .join("model")
            .join(format!("{module}.js"));
        return (function, path);
    }
    (name.to_string(), file.to_path_buf())
}

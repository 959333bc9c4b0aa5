use crate::config::Config;
use crate::parse::{node_text, unquote_string_literal};
use crate::util;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tree_sitter::Node;

/// Per-file name resolution table, built in one pass over a parsed script
/// body.
///
/// A local name lives in exactly one of `user_defined_functions` and
/// `user_defined_objects`; a later declaration under the same name
/// overwrites the earlier one, whichever map it was in. Module aliases in
/// `imported_modules` are a separate namespace keyed by the specifier's
/// final path segment with its extension stripped.
#[derive(Debug, Default, Clone)]
pub struct BindingTable {
    /// Module alias -> resolved project file, or None for an external
    /// (bare) specifier.
    pub imported_modules: HashMap<String, Option<PathBuf>>,
    /// Local name -> defining file (this file for declarations, the
    /// resolved target for imported bindings).
    pub user_defined_functions: HashMap<String, PathBuf>,
    /// Local name -> file, for object literals, namespace imports, and
    /// require-bound names. Method calls on these resolve against the file
    /// recorded here.
    pub user_defined_objects: HashMap<String, PathBuf>,
}

impl BindingTable {
    fn bind_function(&mut self, name: &str, path: PathBuf) {
        self.user_defined_objects.remove(name);
        self.user_defined_functions.insert(name.to_string(), path);
    }

    fn bind_object(&mut self, name: &str, path: PathBuf) {
        self.user_defined_functions.remove(name);
        self.user_defined_objects.insert(name.to_string(), path);
    }
}

/// The declaration forms the collector reacts to, lifted out of raw node
/// kinds so the binding rules match exhaustively.
enum Declaration<'a> {
    Import(Node<'a>),
    RequireBinding { name: Node<'a>, specifier: String },
    NamedFunction(Node<'a>),
    FunctionVariable(Node<'a>),
    ObjectVariable(Node<'a>),
}

fn declaration_of<'a>(node: Node<'a>, source: &str) -> Option<Declaration<'a>> {
    match node.kind() {
        "import_statement" => Some(Declaration::Import(node)),
        "function_declaration" | "generator_function_declaration" => node
            .child_by_field_name("name")
            .map(Declaration::NamedFunction),
        "variable_declarator" => {
            let name = node.child_by_field_name("name")?;
            let value = node.child_by_field_name("value")?;
            match value.kind() {
                "call_expression" => require_specifier(value, source)
                    .map(|specifier| Declaration::RequireBinding { name, specifier }),
                "arrow_function" | "function_expression" | "function" | "generator_function" => {
                    Some(Declaration::FunctionVariable(name))
                }
                "object" => Some(Declaration::ObjectVariable(name)),
                _ => None,
            }
        }
        _ => None,
    }
}

/// Walk a parsed script body and collect its imports and declarations.
/// Pre-order document traversal, so re-declarations are last-write-wins.
pub fn collect(
    root: Node<'_>,
    source: &str,
    project_root: &Path,
    current_file: &Path,
) -> BindingTable {
    let mut table = BindingTable::default();
    walk(root, source, project_root, current_file, &mut table);
    table
}

fn walk(
    node: Node<'_>,
    source: &str,
    project_root: &Path,
    current_file: &Path,
    table: &mut BindingTable,
) {
    if let Some(decl) = declaration_of(node, source) {
        apply_declaration(decl, source, project_root, current_file, table);
    }
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        walk(child, source, project_root, current_file, table);
    }
}

fn apply_declaration(
    decl: Declaration<'_>,
    source: &str,
    project_root: &Path,
    current_file: &Path,
    table: &mut BindingTable,
) {
    match decl {
        Declaration::Import(node) => {
            handle_import(node, source, project_root, current_file, table)
        }
        Declaration::RequireBinding { name, specifier } => {
            match resolve_module_path(&specifier, project_root, current_file) {
                Some(resolved) => {
                    table
                        .imported_modules
                        .insert(specifier_basename(&specifier), Some(resolved));
                    // Destructured requires record the module only.
                    if name.kind() == "identifier" {
                        let name = node_text(name, source);
                        if !name.is_empty() {
                            table.bind_object(&name, current_file.to_path_buf());
                        }
                    }
                }
                None => {
                    table.imported_modules.insert(specifier, None);
                }
            }
        }
        Declaration::NamedFunction(name) => {
            let name = node_text(name, source);
            if !name.is_empty() {
                table.bind_function(&name, current_file.to_path_buf());
            }
        }
        Declaration::FunctionVariable(name) => {
            if name.kind() == "identifier" {
                let name = node_text(name, source);
                if !name.is_empty() {
                    table.bind_function(&name, current_file.to_path_buf());
                }
            }
        }
        Declaration::ObjectVariable(name) => {
            if name.kind() == "identifier" {
                let name = node_text(name, source);
                if !name.is_empty() {
                    table.bind_object(&name, current_file.to_path_buf());
                }
            }
        }
    }
}

fn handle_import(
    node: Node<'_>,
    source: &str,
    project_root: &Path,
    current_file: &Path,
    table: &mut BindingTable,
) {
    let Some(source_node) = node.child_by_field_name("source") else {
        return;
    };
    let raw = node_text(source_node, source);
    let Some(specifier) = unquote_string_literal(&raw) else {
        return;
    };
    let Some(resolved) = resolve_module_path(&specifier, project_root, current_file) else {
        table.imported_modules.insert(specifier, None);
        return;
    };
    table
        .imported_modules
        .insert(specifier_basename(&specifier), Some(resolved.clone()));
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if child.kind() != "import_clause" {
            continue;
        }
        let mut clause_cursor = child.walk();
        for spec in child.named_children(&mut clause_cursor) {
            match spec.kind() {
                // default import
                "identifier" => {
                    let name = node_text(spec, source);
                    if !name.is_empty() {
                        table.bind_function(&name, resolved.clone());
                    }
                }
                "named_imports" => {
                    let mut import_cursor = spec.walk();
                    for import in spec.named_children(&mut import_cursor) {
                        if import.kind() != "import_specifier" {
                            continue;
                        }
                        let local = import
                            .child_by_field_name("alias")
                            .or_else(|| import.child_by_field_name("name"));
                        let Some(local) = local else {
                            continue;
                        };
                        let name = node_text(local, source);
                        if !name.is_empty() {
                            table.bind_function(&name, resolved.clone());
                        }
                    }
                }
                "namespace_import" => {
                    let mut ns_cursor = spec.walk();
                    for inner in spec.named_children(&mut ns_cursor) {
                        if inner.kind() == "identifier" {
                            let name = node_text(inner, source);
                            if !name.is_empty() {
                                table.bind_object(&name, current_file.to_path_buf());
                            }
                        }
                    }
                }
                _ => {}
            }
        }
    }
}

/// The string literal argument of a `require(...)` call, if that is what
/// the node is.
fn require_specifier(node: Node<'_>, source: &str) -> Option<String> {
    let callee = node.child_by_field_name("function")?;
    if callee.kind() != "identifier" || node_text(callee, source) != "require" {
        return None;
    }
    let args = node.child_by_field_name("arguments")?;
    let mut cursor = args.walk();
    let first = args.named_children(&mut cursor).next()?;
    if first.kind() != "string" {
        return None;
    }
    unquote_string_literal(&node_text(first, source))
}

/// Resolve an import/require specifier to a project file.
///
/// `@/rest` resolves under `<project_root>/<alias_dir>/rest`; a leading
/// `.` resolves against the importing file's directory; a leading `/` is
/// kept as-is. Anything else is an external package. No extension probing
/// and no package.json resolution: this mirrors the bundler-alias
/// convention, not a full resolver.
pub fn resolve_module_path(
    specifier: &str,
    project_root: &Path,
    current_file: &Path,
) -> Option<PathBuf> {
    if let Some(rest) = specifier.strip_prefix("@/") {
        let base = project_root.join(&Config::get().alias_dir);
        return Some(util::lexical_resolve(&base.join(rest)));
    }
    if specifier.starts_with('/') {
        return Some(util::lexical_resolve(Path::new(specifier)));
    }
    if specifier.starts_with('.') {
        let base = current_file.parent().unwrap_or_else(|| Path::new(""));
        return Some(util::lexical_resolve(&base.join(specifier)));
    }
    None
}

/// Module alias for a specifier: its final path segment, extension
/// stripped, which is the name member calls reference the module by.
pub fn specifier_basename(specifier: &str) -> String {
    let segment = specifier
        .rsplit('/')
        .find(|segment| !segment.is_empty())
        .unwrap_or(specifier);
    match Path::new(segment).file_stem() {
        Some(stem) if !stem.is_empty() => stem.to_string_lossy().to_string(),
        _ => segment.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{collect, resolve_module_path, specifier_basename};
    use crate::parse::parse_script;
    use std::path::{Path, PathBuf};

    #[test]
    fn resolves_alias_relative_and_bare() {
        let root = Path::new("/proj");
        let file = Path::new("/proj/src/views/Home.js");
        assert_eq!(
            resolve_module_path("@/model/api", root, file),
            Some(PathBuf::from("/proj/src/model/api"))
        );
        assert_eq!(
            resolve_module_path("./helpers.js", root, file),
            Some(PathBuf::from("/proj/src/views/helpers.js"))
        );
        assert_eq!(
            resolve_module_path("../util/time.js", root, file),
            Some(PathBuf::from("/proj/src/util/time.js"))
        );
        assert_eq!(resolve_module_path("axios", root, file), None);
        assert_eq!(resolve_module_path("lodash/debounce", root, file), None);
    }

    #[test]
    fn basename_strips_extension() {
        assert_eq!(specifier_basename("./b.js"), "b");
        assert_eq!(specifier_basename("@/utils/tool"), "tool");
        assert_eq!(specifier_basename("../views/Home.vue"), "Home");
        assert_eq!(specifier_basename("axios"), "axios");
    }

    #[test]
    fn collects_imports_and_declarations() {
        let source = r#"
import { bar, baz as qux } from "./b.js";
import Dflt from "@/model/api.js";
import * as helpers from "./helpers.js";
import axios from "axios";
const tool = require("./tool.js");
const ext = require("express");

function top() {}
const arrow = () => {};
const obj = { run() {} };
"#;
        let file = Path::new("/proj/src/a.js");
        let tree = parse_script(source, file).unwrap();
        let table = collect(tree.root_node(), source, Path::new("/proj"), file);

        assert_eq!(
            table.user_defined_functions.get("bar"),
            Some(&PathBuf::from("/proj/src/b.js"))
        );
        assert_eq!(
            table.user_defined_functions.get("qux"),
            Some(&PathBuf::from("/proj/src/b.js"))
        );
        assert_eq!(
            table.user_defined_functions.get("Dflt"),
            Some(&PathBuf::from("/proj/src/model/api.js"))
        );
        assert_eq!(table.user_defined_functions.get("top"), Some(&file.to_path_buf()));
        assert_eq!(
            table.user_defined_functions.get("arrow"),
            Some(&file.to_path_buf())
        );

        assert!(table.user_defined_objects.contains_key("helpers"));
        assert!(table.user_defined_objects.contains_key("tool"));
        assert!(table.user_defined_objects.contains_key("obj"));

        assert_eq!(table.imported_modules.get("axios"), Some(&None));
        assert_eq!(table.imported_modules.get("express"), Some(&None));
        assert_eq!(
            table.imported_modules.get("b"),
            Some(&Some(PathBuf::from("/proj/src/b.js")))
        );
    }

    #[test]
    fn later_declaration_shadows_earlier() {
        let source = r#"
import { helper } from "./other.js";
const helper = () => {};
const thing = { a: 1 };
function thing() {}
"#;
        let file = Path::new("/proj/src/a.js");
        let tree = parse_script(source, file).unwrap();
        let table = collect(tree.root_node(), source, Path::new("/proj"), file);

        assert_eq!(
            table.user_defined_functions.get("helper"),
            Some(&file.to_path_buf())
        );
        assert!(table.user_defined_functions.contains_key("thing"));
        assert!(!table.user_defined_objects.contains_key("thing"));
    }
}

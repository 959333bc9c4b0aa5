use crate::bindings::{self, BindingTable};
use crate::error::AnalysisError;
use crate::model::{CallBuckets, UserCall};
use crate::parse::{node_text, parse_script};
use crate::source;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tree_sitter::Node;

/// Global/builtin names a call head is checked against first.
pub const SYSTEM_GLOBALS: &[&str] = &[
    // global objects
    "globalThis",
    "window",
    "self",
    "global",
    // value properties
    "Infinity",
    "NaN",
    "undefined",
    // function properties
    "eval",
    "isFinite",
    "isNaN",
    "parseFloat",
    "parseInt",
    "decodeURI",
    "decodeURIComponent",
    "encodeURI",
    "encodeURIComponent",
    // fundamental objects
    "Object",
    "Function",
    "Boolean",
    "Symbol",
    // error objects
    "Error",
    "AggregateError",
    "EvalError",
    "InternalError",
    "RangeError",
    "ReferenceError",
    "SyntaxError",
    "TypeError",
    "URIError",
    // numbers and dates
    "Number",
    "BigInt",
    "Math",
    "Date",
    // text processing
    "String",
    "RegExp",
    // indexed collections
    "Array",
    "Int8Array",
    "Uint8Array",
    "Uint8ClampedArray",
    "Int16Array",
    "Uint16Array",
    "Int32Array",
    "Uint32Array",
    "Float32Array",
    "Float64Array",
    "BigInt64Array",
    "BigUint64Array",
    // keyed collections
    "Map",
    "Set",
    "WeakMap",
    "WeakSet",
    // structured data
    "ArrayBuffer",
    "SharedArrayBuffer",
    "Atomics",
    "DataView",
    "JSON",
    // control abstraction
    "Promise",
    "Generator",
    "GeneratorFunction",
    "AsyncFunction",
    // reflection
    "Reflect",
    "Proxy",
    // internationalization
    "Intl",
    // WebAssembly
    "WebAssembly",
    // host functions
    "fetch",
    "console",
    "setTimeout",
    "setInterval",
    "clearTimeout",
    "clearInterval",
];

pub fn is_system_global(name: &str) -> bool {
    SYSTEM_GLOBALS.contains(&name)
}

enum MemoState {
    InProgress,
    Done(CallBuckets),
}

/// Memoization table threaded through one top-level resolution. A repeat
/// visit of a (file, function) pair short-circuits instead of re-expanding,
/// which is what makes self- and mutually-recursive project code terminate.
type Memo = HashMap<(PathBuf, String), MemoState>;

/// Resolve every call site inside `target_function` of `file` into the four
/// classification buckets, recursing into imported project modules.
pub fn resolve_calls(
    project_root: &Path,
    file: &Path,
    target_function: &str,
) -> Result<CallBuckets, AnalysisError> {
    let mut memo = Memo::new();
    resolve_with_memo(project_root, file, target_function, &mut memo)
}

fn resolve_with_memo(
    project_root: &Path,
    file: &Path,
    target_function: &str,
    memo: &mut Memo,
) -> Result<CallBuckets, AnalysisError> {
    let key = (file.to_path_buf(), target_function.to_string());
    match memo.get(&key) {
        // Cycle marker: the pair is being expanded higher up the stack.
        Some(MemoState::InProgress) => return Ok(CallBuckets::default()),
        Some(MemoState::Done(cached)) => return Ok(cached.clone()),
        None => {}
    }
    memo.insert(key.clone(), MemoState::InProgress);
    let result = resolve_in_file(project_root, file, target_function, memo);
    match &result {
        Ok(buckets) => {
            memo.insert(key, MemoState::Done(buckets.clone()));
        }
        Err(_) => {
            memo.remove(&key);
        }
    }
    result
}

fn resolve_in_file(
    project_root: &Path,
    file: &Path,
    target_function: &str,
    memo: &mut Memo,
) -> Result<CallBuckets, AnalysisError> {
    let bodies = source::script_bodies(file)?;
    let mut merged = CallBuckets::default();
    for body in &bodies {
        let tree = parse_script(body, file)?;
        let table = bindings::collect(tree.root_node(), body, project_root, file);
        let mut names = Vec::new();
        find_target_calls(tree.root_node(), body, target_function, &mut names);
        let mut buckets = CallBuckets::default();
        for name in names {
            classify(&name, &table, project_root, file, memo, &mut buckets);
        }
        merged.extend(buckets);
    }
    Ok(merged)
}

/// Classify one extracted call name against the binding table. The head
/// (left of the first dot) decides the bucket, in precedence order.
fn classify(
    name: &str,
    table: &BindingTable,
    project_root: &Path,
    current_file: &Path,
    memo: &mut Memo,
    buckets: &mut CallBuckets,
) {
    let (head, method) = match name.split_once('.') {
        Some((head, method)) => (head, Some(method)),
        None => (name, None),
    };
    if is_system_global(head) {
        buckets.system.push(name.to_string());
    } else if let Some(path) = table.user_defined_functions.get(head) {
        buckets.user_defined.push(UserCall {
            name: name.to_string(),
            path: path.clone(),
            id: None,
            calls: None,
        });
    } else if let Some(path) = table.user_defined_objects.get(head) {
        // A method call on a locally-bound object is assumed to be a local
        // method.
        buckets.user_defined.push(UserCall {
            name: name.to_string(),
            path: path.clone(),
            id: None,
            calls: None,
        });
    } else if let Some(module) = table.imported_modules.get(head) {
        match module {
            Some(module_path) => {
                let calls = match method {
                    Some(method) => {
                        match resolve_with_memo(project_root, module_path, method, memo) {
                            Ok(sub) => sub,
                            Err(err) => {
                                eprintln!("callmap: {err}");
                                CallBuckets::default()
                            }
                        }
                    }
                    None => CallBuckets::default(),
                };
                buckets.user_defined.push(UserCall {
                    name: name.to_string(),
                    path: module_path.clone(),
                    id: None,
                    calls: Some(calls),
                });
            }
            None => buckets.npm.push(name.to_string()),
        }
    } else {
        buckets.other.push(name.to_string());
    }
}

/// Find every declaration of the target function in this script body and
/// collect the call names inside its body.
fn find_target_calls(node: Node<'_>, source: &str, target: &str, out: &mut Vec<String>) {
    if let Some(body) = target_function_body(node, source, target) {
        collect_call_names(body, source, out);
    }
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        find_target_calls(child, source, target, out);
    }
}

fn target_function_body<'a>(node: Node<'a>, source: &str, target: &str) -> Option<Node<'a>> {
    match node.kind() {
        "function_declaration" | "generator_function_declaration" => {
            let name_node = node.child_by_field_name("name")?;
            if node_text(name_node, source) != target {
                return None;
            }
            node.child_by_field_name("body")
        }
        "variable_declarator" => {
            let name_node = node.child_by_field_name("name")?;
            if name_node.kind() != "identifier" || node_text(name_node, source) != target {
                return None;
            }
            let value = node.child_by_field_name("value")?;
            match value.kind() {
                "arrow_function" | "function_expression" | "function" | "generator_function" => {
                    value.child_by_field_name("body")
                }
                _ => None,
            }
        }
        _ => None,
    }
}

/// Walk a function body and name every call expression: a plain identifier
/// callee, or `object.property` when both sides are simple identifiers.
/// Every other callee shape (computed access, chained or optional-chained
/// calls) is skipped.
fn collect_call_names(node: Node<'_>, source: &str, out: &mut Vec<String>) {
    if node.kind() == "call_expression" {
        if let Some(name) = call_name(node, source) {
            out.push(name);
        }
    }
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        collect_call_names(child, source, out);
    }
}

/// What a call's callee looks like, lifted out of raw node kinds.
/// Everything beyond a plain identifier or a simple `object.property`
/// member access is deliberately unsupported.
enum CalleeShape {
    Identifier(String),
    Member { object: String, property: String },
    Unsupported,
}

fn callee_shape(node: Node<'_>, source: &str) -> Option<CalleeShape> {
    let callee = node.child_by_field_name("function")?;
    let shape = match callee.kind() {
        "identifier" => CalleeShape::Identifier(node_text(callee, source)),
        "member_expression" => {
            if has_optional_chain(callee) {
                return Some(CalleeShape::Unsupported);
            }
            let object = callee.child_by_field_name("object")?;
            let property = callee.child_by_field_name("property")?;
            if object.kind() != "identifier" || property.kind() != "property_identifier" {
                return Some(CalleeShape::Unsupported);
            }
            CalleeShape::Member {
                object: node_text(object, source),
                property: node_text(property, source),
            }
        }
        _ => CalleeShape::Unsupported,
    };
    Some(shape)
}

fn call_name(node: Node<'_>, source: &str) -> Option<String> {
    match callee_shape(node, source)? {
        CalleeShape::Identifier(name) => Some(name),
        CalleeShape::Member { object, property } => Some(format!("{object}.{property}")),
        CalleeShape::Unsupported => None,
    }
}

fn has_optional_chain(node: Node<'_>) -> bool {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == "optional_chain" {
            return true;
        }
    }
    false
}

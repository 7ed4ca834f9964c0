//! Dotted name paths addressing the animated properties and nodes of an
//! animation, e.g. `Shape Layer 1.Transform.Opacity`.
//!
//! A `*` segment matches exactly one name and `**` matches any number of
//! names, including none.

use std::fmt;

use crate::animator::{AnimatorGraph, NodeId};
use crate::error::{LottieError, LottieResult};
use crate::property::{AnyCell, AnyValue, PropertyMap, ValueKind};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Keypath {
    segments: Vec<String>,
}

impl Keypath {
    pub fn new(path: &str) -> Self {
        Self {
            segments: path.split('.').map(str::to_string).collect(),
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn matches<S: AsRef<str>>(&self, names: &[S]) -> bool {
        match_segments(&self.segments, names)
    }
}

impl From<&str> for Keypath {
    fn from(path: &str) -> Self {
        Keypath::new(path)
    }
}

impl fmt::Display for Keypath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

fn match_segments<S: AsRef<str>>(pattern: &[String], names: &[S]) -> bool {
    match pattern.split_first() {
        None => names.is_empty(),
        Some((head, rest)) if head == "**" => (0..=names.len()).any(|skip| match_segments(rest, &names[skip..])),
        Some((head, rest)) => match names.split_first() {
            Some((name, tail)) => (head == "*" || head == name.as_ref()) && match_segments(rest, tail),
            None => false,
        },
    }
}

/// Names of a node's property `cell`: node keypath, prefix, cell name.
fn property_names<'a>(base: &'a [String], prefix: Option<&'static str>, cell: &'static str) -> Vec<&'a str> {
    base.iter()
        .map(String::as_str)
        .chain(prefix)
        .chain(std::iter::once(cell))
        .collect()
}

/// Visits every addressable cell of the graph with its dotted keypath.
fn for_each_cell(graph: &mut AnimatorGraph, mut f: impl FnMut(&[&str], &mut dyn AnyCell)) {
    let ids: Vec<NodeId> = graph.ids().collect();
    for id in ids {
        let node = graph.node_mut(id);
        if node.keypath().is_empty() {
            continue;
        }
        let base = node.keypath().to_vec();
        let prefix = node.property_prefix();
        node.kind_mut().visit_cells(&mut |name, cell| {
            f(&property_names(&base, prefix, name), cell);
        });
    }
}

/// Every property keypath of the graph, in node order.
pub(crate) fn list(graph: &mut AnimatorGraph) -> Vec<String> {
    let mut paths = Vec::new();
    for_each_cell(graph, |names, _| paths.push(names.join(".")));
    paths
}

/// Current values of the properties matching `keypath`.
pub(crate) fn values(graph: &mut AnimatorGraph, keypath: &Keypath) -> LottieResult<Vec<(String, AnyValue)>> {
    let mut found = Vec::new();
    for_each_cell(graph, |names, cell| {
        if keypath.matches(names) {
            found.push((names.join("."), cell.current()));
        }
    });
    if found.is_empty() {
        return Err(LottieError::KeypathNotFound(keypath.to_string()));
    }
    Ok(found)
}

/// Replaces every matching property with the constant `value`. Nothing is
/// changed when any match holds a different kind of value. Returns the
/// number of properties replaced.
pub(crate) fn set_value(graph: &mut AnimatorGraph, keypath: &Keypath, value: AnyValue) -> LottieResult<usize> {
    let mut matched = 0;
    let mut mismatch: Option<(String, ValueKind)> = None;
    for_each_cell(graph, |names, cell| {
        if keypath.matches(names) {
            matched += 1;
            if mismatch.is_none() && cell.kind() != value.kind() {
                mismatch = Some((names.join("."), cell.kind()));
            }
        }
    });
    if matched == 0 {
        return Err(LottieError::KeypathNotFound(keypath.to_string()));
    }
    if let Some((path, expected)) = mismatch {
        return Err(LottieError::TypeMismatch {
            keypath: path,
            expected,
            found: value.kind(),
        });
    }

    for_each_cell(graph, |names, cell| {
        if keypath.matches(names) {
            // Kinds were checked above.
            let _ = cell.override_value(value.clone());
        }
    });
    Ok(matched)
}

/// Enables or disables the nodes matching `keypath`. A node matches by its
/// own keypath or by its keypath followed by its property prefix, so
/// `Layer.Transform` names a layer transform and `Layer` every node of the
/// layer itself.
pub(crate) fn set_enabled(graph: &mut AnimatorGraph, keypath: &Keypath, enabled: bool) -> LottieResult<usize> {
    let targets: Vec<NodeId> = graph
        .ids()
        .filter(|id| {
            let node = graph.node(*id);
            let base = node.keypath();
            if base.is_empty() {
                return false;
            }
            keypath.matches(base)
                || node.property_prefix().is_some_and(|prefix| {
                    let names: Vec<&str> = base.iter().map(String::as_str).chain(Some(prefix)).collect();
                    keypath.matches(&names)
                })
        })
        .collect();
    if targets.is_empty() {
        return Err(LottieError::KeypathNotFound(keypath.to_string()));
    }
    for id in &targets {
        graph.set_enabled(*id, enabled);
    }
    Ok(targets.len())
}

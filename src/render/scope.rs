use std::collections::{BTreeMap, BTreeSet};

use super::{Component, Value};

/// Mapping from identifier name to the runtime value an example may reference.
///
/// Assembled by the documentation tool (library exports plus `React`); the
/// compiler and renderer only read from it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scope {
    bindings: BTreeMap<String, Value>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stub scope for a component library known only by export names.
    ///
    /// Dotted names (`Card.Section`) become static members of their root
    /// component. Every export renders as an element named after itself.
    pub fn from_library<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut scope = Scope::new();
        for name in names {
            let name = name.as_ref().trim();
            let segments: Vec<&str> = name.split('.').filter(|s| !s.is_empty()).collect();
            let Some((root, rest)) = segments.split_first() else {
                continue;
            };
            let value = scope
                .bindings
                .entry(root.to_string())
                .or_insert_with(|| Value::Component(Component::host(*root)));
            install_static(value, rest, root.to_string());
        }
        scope
    }

    /// Adds a `React` namespace exposing `Fragment` and the class bases.
    pub fn with_react(mut self) -> Self {
        let mut react = BTreeMap::new();
        react.insert("Fragment".to_string(), Value::Component(Component::fragment()));
        react.insert(
            "Component".to_string(),
            Value::Component(Component::host("React.Component")),
        );
        react.insert(
            "PureComponent".to_string(),
            Value::Component(Component::host("React.PureComponent")),
        );
        self.bindings.insert("React".to_string(), Value::Object(react));
        self
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.bindings.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Entries from `other` override entries with the same name.
    pub fn merge(&mut self, other: Scope) {
        self.bindings.extend(other.bindings);
    }

    /// Names from `names` that this scope does not provide, in input order
    pub fn missing(&self, names: &[String]) -> Vec<String> {
        names
            .iter()
            .filter(|name| !self.contains(name))
            .cloned()
            .collect()
    }

    /// Scope restricted to `names`
    pub fn subset(&self, names: &[String]) -> Scope {
        Scope {
            bindings: names
                .iter()
                .filter_map(|name| self.get(name).map(|v| (name.clone(), v.clone())))
                .collect(),
        }
    }

    pub fn surface(&self) -> LibrarySurface {
        LibrarySurface::from_names(self.names())
    }
}

fn install_static(value: &mut Value, segments: &[&str], path: String) {
    let Some((segment, rest)) = segments.split_first() else {
        return;
    };
    let Value::Component(component) = value else {
        return;
    };
    let path = format!("{}.{}", path, segment);
    if component.get_static(segment).is_none() {
        component.insert_static(*segment, Component::host(path.clone()));
    }
    if let Some(member) = component.get_static_mut(segment) {
        install_static(member, rest, path);
    }
}

/// The set of top-level identifiers a component library declares.
///
/// Examples are checked against it when they are compiled, so a snippet that
/// references an unknown export is rejected during the build instead of
/// failing when the story renders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LibrarySurface {
    names: BTreeSet<String>,
}

impl LibrarySurface {
    /// Dotted names contribute their root identifier.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names = names
            .into_iter()
            .filter_map(|name| {
                let root = name.as_ref().trim().split('.').next().unwrap_or("");
                if root.is_empty() {
                    None
                } else {
                    Some(root.to_string())
                }
            })
            .collect();
        Self { names }
    }

    pub fn insert(&mut self, name: impl Into<String>) {
        self.names.insert(name.into());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Identifiers from `identifiers` the surface does not declare
    pub fn unknown(&self, identifiers: &[String]) -> Vec<String> {
        identifiers
            .iter()
            .filter(|id| !self.contains(id))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

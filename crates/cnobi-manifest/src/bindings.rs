use crate::eval::EvalString;
use indexmap::IndexMap;
use smol_str::SmolStr;

/// An ordered variable scope.
///
/// Keys are unique. Assigning an existing key replaces its value but keeps
/// the position of the first assignment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings {
    map: IndexMap<SmolStr, EvalString>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name`, returning the previous value if there was one.
    pub fn insert(&mut self, name: impl Into<SmolStr>, value: EvalString) -> Option<EvalString> {
        self.map.insert(name.into(), value)
    }

    pub fn get(&self, name: &str) -> Option<&EvalString> {
        self.map.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &EvalString)> {
        self.map.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<'a> IntoIterator for &'a Bindings {
    type Item = (&'a SmolStr, &'a EvalString);
    type IntoIter = indexmap::map::Iter<'a, SmolStr, EvalString>;

    fn into_iter(self) -> Self::IntoIter {
        self.map.iter()
    }
}

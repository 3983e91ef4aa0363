//! Slot addresses inside a commented tree.

use std::fmt;
use yaml_rust2::Yaml;

/// The address of one child slot of a [`CommentedTree`](crate::CommentedTree).
///
/// Sequences are addressed by `Index`, mappings usually by `Name`. A tree
/// whose keys are exactly `Index(0)..Index(n-1)` in order is a sequence;
/// anything else is a hash.
///
/// Mapping keys loaded from YAML keep their scalar type, so `true: 1` and
/// `'true': 1` address different slots and dump back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    Index(i64),
    Name(String),
    Bool(bool),
    /// A floating-point key, held as its source text.
    Real(String),
    Null,
}

impl Key {
    /// Convert a plain mapping key into a slot address.
    ///
    /// Every scalar maps to its own variant, so distinct YAML keys stay
    /// distinct. Containers, aliases and bad values cannot address a slot
    /// and yield `None`.
    pub fn from_yaml(yaml: &Yaml) -> Option<Self> {
        match yaml {
            Yaml::Integer(i) => Some(Key::Index(*i)),
            Yaml::String(s) => Some(Key::Name(s.clone())),
            Yaml::Real(s) => Some(Key::Real(s.clone())),
            Yaml::Boolean(b) => Some(Key::Bool(*b)),
            Yaml::Null => Some(Key::Null),
            Yaml::Array(_) | Yaml::Hash(_) | Yaml::Alias(_) | Yaml::BadValue => None,
        }
    }

    /// The plain YAML form of this key.
    pub fn to_yaml(&self) -> Yaml {
        match self {
            Key::Index(i) => Yaml::Integer(*i),
            Key::Name(s) => Yaml::String(s.clone()),
            Key::Bool(b) => Yaml::Boolean(*b),
            Key::Real(s) => Yaml::Real(s.clone()),
            Key::Null => Yaml::Null,
        }
    }

    pub fn as_index(&self) -> Option<i64> {
        match self {
            Key::Index(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_name(&self) -> Option<&str> {
        match self {
            Key::Name(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Index(i) => write!(f, "{}", i),
            Key::Name(s) | Key::Real(s) => f.write_str(s),
            Key::Bool(b) => write!(f, "{}", b),
            Key::Null => f.write_str("null"),
        }
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Key::Name(name.to_string())
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Key::Name(name)
    }
}

impl From<&String> for Key {
    fn from(name: &String) -> Self {
        Key::Name(name.clone())
    }
}

impl From<&Key> for Key {
    fn from(key: &Key) -> Self {
        key.clone()
    }
}

impl From<i64> for Key {
    fn from(index: i64) -> Self {
        Key::Index(index)
    }
}

impl From<i32> for Key {
    fn from(index: i32) -> Self {
        Key::Index(i64::from(index))
    }
}

impl From<usize> for Key {
    fn from(index: usize) -> Self {
        Key::Index(position_index(index))
    }
}

/// Integer key for a position in a sequence.
///
/// Positions come from in-memory collections, whose lengths are bounded by
/// `isize::MAX`, so saturation is never observed in practice.
pub(crate) fn position_index(position: usize) -> i64 {
    i64::try_from(position).unwrap_or(i64::MAX)
}

/// Check whether keys form the contiguous run `0, 1, ..., n-1` in order.
///
/// This is the single sequence-vs-hash test shared by trees and plain
/// mappings.
pub(crate) fn is_sequence_run(keys: impl Iterator<Item = Option<i64>>) -> bool {
    let mut expected = 0i64;
    for key in keys {
        if key != Some(expected) {
            return false;
        }
        expected += 1;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_yaml() {
        assert_eq!(Key::from_yaml(&Yaml::Integer(3)), Some(Key::Index(3)));
        assert_eq!(
            Key::from_yaml(&Yaml::String("foo".into())),
            Some(Key::Name("foo".into()))
        );
        assert_eq!(Key::from_yaml(&Yaml::Boolean(true)), Some(Key::Bool(true)));
        assert_eq!(
            Key::from_yaml(&Yaml::Real("1.5".into())),
            Some(Key::Real("1.5".into()))
        );
        assert_eq!(Key::from_yaml(&Yaml::Null), Some(Key::Null));
        assert_eq!(Key::from_yaml(&Yaml::Array(vec![])), None);
        assert_eq!(Key::from_yaml(&Yaml::BadValue), None);
    }

    #[test]
    fn test_name_and_index_are_distinct() {
        assert_ne!(Key::from("0"), Key::from(0usize));
        assert_eq!(Key::from(0usize), Key::Index(0));
        assert_eq!(Key::from("0").to_yaml(), Yaml::String("0".into()));
        assert_eq!(Key::from(0i32).to_yaml(), Yaml::Integer(0));
    }

    #[test]
    fn test_scalar_keys_keep_their_type() {
        for yaml in [
            Yaml::Boolean(false),
            Yaml::Real("2.50".into()),
            Yaml::Null,
            Yaml::String("true".into()),
            Yaml::Integer(-3),
        ] {
            let key = Key::from_yaml(&yaml).unwrap();
            assert_eq!(key.to_yaml(), yaml);
        }
        assert_ne!(
            Key::from_yaml(&Yaml::Boolean(true)),
            Key::from_yaml(&Yaml::String("true".into()))
        );
        assert_eq!(Key::Bool(true).to_string(), "true");
        assert_eq!(Key::Real("2.50".into()).to_string(), "2.50");
        assert_eq!(Key::Null.to_string(), "null");
    }

    #[test]
    fn test_position_index() {
        assert_eq!(position_index(0), 0);
        assert_eq!(position_index(7), 7);
        assert_eq!(Key::from(3usize), Key::Index(3));
    }

    #[test]
    fn test_is_sequence_run() {
        assert!(is_sequence_run(std::iter::empty()));
        assert!(is_sequence_run([Some(0), Some(1), Some(2)].into_iter()));
        assert!(!is_sequence_run([Some(1), Some(0)].into_iter()));
        assert!(!is_sequence_run([Some(0), Some(2)].into_iter()));
        assert!(!is_sequence_run([Some(0), None].into_iter()));
    }
}

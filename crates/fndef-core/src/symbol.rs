//! # Schema Identifier Newtypes
//!
//! `Symbol` and `AddressWidth` wrap the raw strings found in a function
//! definitions document. Equality, ordering and hashing are those of the
//! underlying string, so sets of symbols behave exactly like sets of
//! names while staying distinct from other string data at the type level.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A type name usable as a parameter type, struct field type, alias target,
/// or key in one of the defining namespaces.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(pub String);

/// Key partitioning `HighLevelParameterTypes`, e.g. `AddressWidth32Bit`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AddressWidth(pub String);

impl Symbol {
    /// Create a symbol from anything string-like.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Access the symbol name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AddressWidth {
    /// Create an address width key from anything string-like.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Access the raw key.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Symbol {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for AddressWidth {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for AddressWidth {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for AddressWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn symbol_set_lookup_by_str() {
        let set: BTreeSet<Symbol> = ["HANDLE", "DWORD"].into_iter().map(Symbol::from).collect();
        assert!(set.contains("HANDLE"));
        assert!(!set.contains("LPCWSTR"));
    }

    #[test]
    fn symbol_is_whole_string_not_characters() {
        let mut set = BTreeSet::new();
        set.insert(Symbol::new("AB"));
        assert_eq!(set.len(), 1);
        assert!(!set.contains("A"));
        assert!(set.contains("AB"));
    }

    #[test]
    fn symbol_deserializes_transparently() {
        let sym: Symbol = serde_yaml::from_str("LPCWSTR").unwrap();
        assert_eq!(sym, Symbol::from("LPCWSTR"));
    }

    #[test]
    fn address_width_display() {
        assert_eq!(AddressWidth::from("AddressWidth64Bit").to_string(), "AddressWidth64Bit");
    }

    #[test]
    fn symbols_order_lexicographically() {
        assert!(Symbol::from("BOOL") < Symbol::from("DWORD"));
    }
}

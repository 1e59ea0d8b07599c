//! Favorite stations.
//!
//! The ranking engine only ever asks whether a code is a favorite, through
//! [`FavoriteSet`]. [`Favorites`] is the in-memory list a store loads and saves.

use serde_json::Value;
use std::collections::{BTreeSet, HashSet};

/// Membership test over station codes.
pub trait FavoriteSet {
    fn contains(&self, code: &str) -> bool;
}

impl FavoriteSet for HashSet<String> {
    fn contains(&self, code: &str) -> bool {
        HashSet::contains(self, code)
    }
}

impl FavoriteSet for BTreeSet<String> {
    fn contains(&self, code: &str) -> bool {
        BTreeSet::contains(self, code)
    }
}

impl FavoriteSet for [&str] {
    fn contains(&self, code: &str) -> bool {
        self.iter().any(|c| *c == code)
    }
}

/// Ordered list of favorite station codes, without duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Favorites {
    codes: Vec<String>,
}

impl Favorites {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_codes<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut favorites = Self::new();
        for code in codes {
            let code = code.into();
            if !favorites.codes.contains(&code) {
                favorites.codes.push(code);
            }
        }
        favorites
    }

    /// Decode a JSON array of codes. Numeric codes are stringified; other
    /// entries are dropped.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let entries: Vec<Value> = serde_json::from_str(json)?;
        Ok(Self::from_codes(entries.into_iter().filter_map(|entry| {
            match entry {
                Value::String(s) => Some(s),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            }
        })))
    }

    pub fn to_json(&self) -> String {
        Value::from(self.codes.clone()).to_string()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.codes.iter().any(|c| c == code)
    }

    /// Add `code` if absent, remove it if present. Returns whether it is a
    /// favorite afterwards.
    pub fn toggle(&mut self, code: &str) -> bool {
        match self.codes.iter().position(|c| c == code) {
            Some(index) => {
                self.codes.remove(index);
                false
            }
            None => {
                self.codes.push(code.to_string());
                true
            }
        }
    }

    pub fn list(&self) -> &[String] {
        &self.codes
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

impl FavoriteSet for Favorites {
    fn contains(&self, code: &str) -> bool {
        Favorites::contains(self, code)
    }
}

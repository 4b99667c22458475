//! Favorites persisted through a key-value store.
//!
//! The store holds a single key whose value is a JSON array of entry ids.
//! Every toggle rewrites the whole array.

use std::collections::{BTreeSet, HashMap};

/// Storage key for the favorites array.
pub const FAVORITES_KEY: &str = "svg-favorites";

/// A string key-value store, such as browser local storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String);
}

/// In-memory [`KeyValueStore`].
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with one value.
    pub fn with_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut store = Self::new();
        store.values.insert(key.into(), value.into());
        store
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.values.insert(key.to_string(), value);
    }
}

/// The set of favorited entry ids.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Favorites {
    ids: BTreeSet<String>,
}

impl Favorites {
    /// Creates an empty favorites set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads favorites from `store`.
    ///
    /// A missing or unparseable value yields an empty set.
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        let Some(raw) = store.get(FAVORITES_KEY) else {
            return Self::new();
        };
        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(ids) => Self {
                ids: ids.into_iter().collect(),
            },
            Err(err) => {
                log::warn!("ignoring malformed favorites under {FAVORITES_KEY:?}: {err}");
                Self::new()
            }
        }
    }

    /// Writes the whole set to `store`.
    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) {
        match serde_json::to_string(&self.ids) {
            Ok(json) => store.set(FAVORITES_KEY, json),
            Err(err) => log::warn!("failed to serialize favorites: {err}"),
        }
    }

    /// Flips membership of `id` and persists the result.
    ///
    /// Returns true if `id` is a favorite afterwards.
    pub fn toggle<S: KeyValueStore + ?Sized>(&mut self, store: &mut S, id: &str) -> bool {
        let now_favorite = if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.to_string());
            true
        };
        self.save(store);
        now_favorite
    }

    /// Returns true if `id` is a favorite.
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Returns the number of favorites.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns true if there are no favorites.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Iterates over favorite ids in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for Favorites {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().map(Into::into).collect(),
        }
    }
}

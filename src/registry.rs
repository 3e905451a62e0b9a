//! Ordered registry of menu entries keyed by id and dispatch key.
//!
//! Both the application registry and the link-type registry are a
//! [`Registry`]. Insertion order is menu order. Each entry's dispatch
//! key (the first character of its label, case-sensitive) is computed
//! once on insertion and must be unique within the registry.

/// Something that can live in a [`Registry`].
pub trait RegistryEntry {
    /// Stable identifier (`"safari"`, `"org"`).
    fn id(&self) -> &str;
    /// Menu label; its first character is the dispatch key.
    fn label(&self) -> &str;
}

/// Errors raised while building or overriding a registry.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("duplicate id: {0}")]
    DuplicateId(String),
    #[error("dispatch key {key:?} of {id:?} already used by {existing:?}")]
    DuplicateKey {
        key: char,
        id: String,
        existing: String,
    },
    #[error("entry {0:?} has an empty label")]
    EmptyLabel(String),
    #[error("no entry with id {0:?}")]
    NotFound(String),
}

/// An entry plus its precomputed dispatch key.
#[derive(Debug)]
struct Slot<E> {
    key: char,
    entry: E,
}

/// Ordered id → entry mapping with unique dispatch keys.
#[derive(Debug)]
pub struct Registry<E> {
    slots: Vec<Slot<E>>,
}

impl<E> Default for Registry<E> {
    fn default() -> Self {
        Self { slots: Vec::new() }
    }
}

impl<E: RegistryEntry> Registry<E> {
    /// Build a registry from entries in menu order.
    ///
    /// Rejects the whole set on the first duplicate id, duplicate
    /// dispatch key, or empty label.
    pub fn from_entries(entries: impl IntoIterator<Item = E>) -> Result<Self, RegistryError> {
        let mut registry = Self::default();
        for entry in entries {
            registry.insert(entry)?;
        }
        Ok(registry)
    }

    /// Append an entry at the end of the menu.
    pub fn insert(&mut self, entry: E) -> Result<(), RegistryError> {
        let key = dispatch_key(&entry)?;
        if self.position(entry.id()).is_some() {
            return Err(RegistryError::DuplicateId(entry.id().to_string()));
        }
        self.check_key(key, entry.id(), None)?;
        self.slots.push(Slot { key, entry });
        Ok(())
    }

    /// Replace the entry with the same id, keeping its menu position.
    pub fn replace(&mut self, entry: E) -> Result<(), RegistryError> {
        let index = self
            .position(entry.id())
            .ok_or_else(|| RegistryError::NotFound(entry.id().to_string()))?;
        let key = dispatch_key(&entry)?;
        self.check_key(key, entry.id(), Some(index))?;
        self.slots[index] = Slot { key, entry };
        Ok(())
    }

    /// Replace the entry if the id is known, append it otherwise.
    pub fn upsert(&mut self, entry: E) -> Result<(), RegistryError> {
        if self.position(entry.id()).is_some() {
            self.replace(entry)
        } else {
            self.insert(entry)
        }
    }

    /// Remove an entry by id, returning it.
    pub fn remove(&mut self, id: &str) -> Option<E> {
        let index = self.position(id)?;
        Some(self.slots.remove(index).entry)
    }

    /// Look up an entry by id.
    pub fn get(&self, id: &str) -> Option<&E> {
        self.slots
            .iter()
            .find(|s| s.entry.id() == id)
            .map(|s| &s.entry)
    }

    /// Look up an entry by dispatch key.
    pub fn by_key(&self, key: char) -> Option<&E> {
        self.slots.iter().find(|s| s.key == key).map(|s| &s.entry)
    }

    /// Entries in menu order.
    pub fn list(&self) -> impl Iterator<Item = &E> {
        self.slots.iter().map(|s| &s.entry)
    }

    /// `(dispatch key, entry)` pairs in menu order.
    pub fn keyed(&self) -> impl Iterator<Item = (char, &E)> {
        self.slots.iter().map(|s| (s.key, &s.entry))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.slots.iter().position(|s| s.entry.id() == id)
    }

    /// Fail if `key` is taken by any slot other than `skip`.
    fn check_key(&self, key: char, id: &str, skip: Option<usize>) -> Result<(), RegistryError> {
        let clash = self
            .slots
            .iter()
            .enumerate()
            .find(|(i, s)| Some(*i) != skip && s.key == key);

        match clash {
            Some((_, existing)) => Err(RegistryError::DuplicateKey {
                key,
                id: id.to_string(),
                existing: existing.entry.id().to_string(),
            }),
            None => Ok(()),
        }
    }
}

fn dispatch_key<E: RegistryEntry>(entry: &E) -> Result<char, RegistryError> {
    entry
        .label()
        .chars()
        .next()
        .ok_or_else(|| RegistryError::EmptyLabel(entry.id().to_string()))
}

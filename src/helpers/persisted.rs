//! State mirrored into a key-value [`Storage`].
//!
//! The first render reads the stored JSON for the key; every write through
//! the returned [`Persisted`] handle serializes the new value back. Storage
//! or encoding failures are logged and never reach the component: the
//! in-memory state keeps working.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use crate::engine::{Hooks, Setter};

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("failed to encode `{key}`: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("storage rejected `{key}`: {reason}")]
    Storage { key: String, reason: String },
}

/// String key-value storage, e.g. a browser's local storage or a file.
pub trait Storage {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), PersistError>;
}

/// [`Storage`] backed by an in-memory map.
#[derive(Default)]
pub struct MemoryStorage {
    items: RefCell<BTreeMap<String, String>>,
    read_only: Cell<bool>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every write from now on.
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.set(read_only);
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), PersistError> {
        if self.read_only.get() {
            return Err(PersistError::Storage {
                key: key.to_string(),
                reason: "read-only".to_string(),
            });
        }
        self.items.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Setter returned by [`use_persisted`].
pub struct Persisted<T> {
    setter: Setter<T>,
    key: Rc<str>,
    storage: Rc<dyn Storage>,
}

impl<T> Clone for Persisted<T> {
    fn clone(&self) -> Self {
        Self {
            setter: self.setter.clone(),
            key: self.key.clone(),
            storage: self.storage.clone(),
        }
    }
}

impl<T: Serialize + Clone + 'static> Persisted<T> {
    /// Store `value`, then update the state (re-rendering the owner).
    pub fn set(&self, value: T) {
        if let Err(err) = self.save(&value) {
            warn!(key = %self.key, %err, "persisting state failed");
        }
        self.setter.set(value);
    }

    pub fn update(&self, f: impl FnOnce(&T) -> T) {
        let next = f(&self.setter.get());
        self.set(next);
    }

    fn save(&self, value: &T) -> Result<(), PersistError> {
        let encoded = serde_json::to_string(value).map_err(|source| PersistError::Encode {
            key: self.key.to_string(),
            source,
        })?;
        self.storage.set_item(&self.key, &encoded)
    }
}

fn load<T: DeserializeOwned>(storage: &dyn Storage, key: &str) -> Option<T> {
    let raw = storage.get_item(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(key, %err, "stored state unreadable, using initial value");
            None
        }
    }
}

/// State slot initialized from `storage[key]` (or `initial`) and written
/// back on every set.
///
/// ```ignore
/// let storage: Rc<dyn Storage> = Rc::new(MemoryStorage::new());
/// let (theme, set_theme) = use_persisted(hooks, &storage, "theme", "light".to_string());
/// ```
pub fn use_persisted<T>(hooks: &mut Hooks<'_>, storage: &Rc<dyn Storage>, key: &str, initial: T) -> (T, Persisted<T>)
where
    T: Serialize + DeserializeOwned + Clone + 'static,
{
    let (value, setter) = hooks.use_state_with(|| load(storage.as_ref(), key).unwrap_or(initial));
    let persisted = Persisted {
        setter,
        key: Rc::from(key),
        storage: storage.clone(),
    };
    (value, persisted)
}

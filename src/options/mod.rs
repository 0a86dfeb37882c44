//! Typed per-request options.
//!
//! # Responsibilities
//! - Let independent stages attach metadata to a request without a shared schema
//! - Return an option's declared default when it was never set
//!
//! # Design Decisions
//! - Keyed by the `TypeId` of the option's marker type; no registration step
//! - Values are erased behind `Arc<dyn Any>` and recovered with a checked
//!   downcast, so cloning a request never deep-copies option values
//! - Writing replaces any previous value for the same option

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

pub mod environment;

pub use environment::ServerEnvironment;

/// A per-request option that can be stored in a [`Request`](crate::Request).
///
/// The implementing type is only used as a key; the stored data has type
/// [`RequestOption::Value`].
pub trait RequestOption: 'static {
    /// The type of value this option carries.
    type Value: Clone + Send + Sync + 'static;

    /// The value read when the option was never set.
    fn default_value() -> Self::Value;
}

#[derive(Clone)]
struct Entry {
    name: &'static str,
    value: Arc<dyn Any + Send + Sync>,
}

/// Type-indexed storage for request options.
#[derive(Clone, Default)]
pub struct OptionStore {
    entries: HashMap<TypeId, Entry>,
}

impl OptionStore {
    /// Read option `O`, or its default when unset.
    pub fn get<O: RequestOption>(&self) -> O::Value {
        self.entries
            .get(&TypeId::of::<O>())
            .and_then(|entry| entry.value.downcast_ref::<O::Value>())
            .cloned()
            .unwrap_or_else(O::default_value)
    }

    /// Store a value for option `O`, replacing any previous one.
    pub fn set<O: RequestOption>(&mut self, value: O::Value) {
        self.entries.insert(
            TypeId::of::<O>(),
            Entry {
                name: std::any::type_name::<O>(),
                value: Arc::new(value),
            },
        );
    }

    /// Whether option `O` was explicitly set.
    pub fn contains<O: RequestOption>(&self) -> bool {
        self.entries.contains_key(&TypeId::of::<O>())
    }

    /// Remove option `O`, so subsequent reads see its default again.
    pub fn remove<O: RequestOption>(&mut self) {
        self.entries.remove(&TypeId::of::<O>());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for OptionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(self.entries.values().map(|entry| entry.name))
            .finish()
    }
}

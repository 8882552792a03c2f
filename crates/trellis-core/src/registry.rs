use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;

use crate::error::{DuplicateType, NotFound};
use crate::store::Store;

/// A [`Store<S>`] handle with its state type erased, ready to hand to a
/// [`Registry`].
pub struct AnyStore {
    type_id: TypeId,
    type_name: &'static str,
    handle: Box<dyn Any>,
}

impl AnyStore {
    pub fn new<S: Clone + 'static>(store: Store<S>) -> Self {
        Self {
            type_id: TypeId::of::<S>(),
            type_name: type_name::<S>(),
            handle: Box::new(store),
        }
    }

    pub fn state_type(&self) -> TypeId {
        self.type_id
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl<S: Clone + 'static> From<Store<S>> for AnyStore {
    fn from(store: Store<S>) -> Self {
        Self::new(store)
    }
}

/// Builds a `Vec<AnyStore>` from store handles, for [`Registry::new`].
#[macro_export]
macro_rules! stores {
    () => { ::std::vec::Vec::<$crate::registry::AnyStore>::new() };
    ($($store:expr),+ $(,)?) => {
        ::std::vec![$($crate::registry::AnyStore::from($store)),+]
    };
}

/// Scope-bound, immutable collection of stores resolvable by state type.
///
/// A registry holds cheap `Store` handles, not the stores' state: stores are
/// constructed by application code, can outlive the registry, and can be
/// reused across remounts. The registry itself never mutates them.
pub struct Registry {
    entries: HashMap<TypeId, AnyStore>,
}

impl Registry {
    /// Builds the type→store map, rejecting duplicates eagerly.
    pub fn new(stores: impl IntoIterator<Item = AnyStore>) -> Result<Self, DuplicateType> {
        let mut entries = HashMap::new();
        for store in stores {
            let type_id = store.state_type();
            let type_name = store.type_name();
            if entries.insert(type_id, store).is_some() {
                return Err(DuplicateType { type_name });
            }
        }
        Ok(Self { entries })
    }

    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// The store of state type `S` held directly by this registry.
    ///
    /// [`NotFound`] here is not a failure of the whole resolution: the
    /// provider chain recovers it and walks outward.
    pub fn lookup<S: Clone + 'static>(&self) -> Result<Store<S>, NotFound> {
        self.entries
            .get(&TypeId::of::<S>())
            .and_then(|entry| entry.handle.downcast_ref::<Store<S>>())
            .cloned()
            .ok_or(NotFound {
                type_name: type_name::<S>(),
            })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

use std::any::type_name;
use std::rc::Rc;

use crate::error::NoProviderFound;
use crate::registry::Registry;
use crate::store::Store;

/// Nearest-first chain of provider registries, one link per enclosing scope.
///
/// The chain is a persistent parent-pointer list: [`extend`](ProviderChain::extend)
/// returns a child chain without touching the original, so sibling subtrees
/// can carry different provider stacks. Resolution walks nearest first, which
/// gives nested registries shadowing semantics.
#[derive(Clone, Default)]
pub struct ProviderChain(Option<Rc<Link>>);

struct Link {
    registry: Rc<Registry>,
    parent: ProviderChain,
}

impl ProviderChain {
    /// Chain with no providers in scope.
    pub fn root() -> Self {
        Self(None)
    }

    /// Child chain in which `registry` shadows anything further out.
    pub fn extend(&self, registry: impl Into<Rc<Registry>>) -> Self {
        Self(Some(Rc::new(Link {
            registry: registry.into(),
            parent: self.clone(),
        })))
    }

    /// Resolves the nearest enclosing store of state type `S`.
    ///
    /// A single registry's `NotFound` is recovered by moving outward; only
    /// exhausting the chain (including the empty chain) fails, and that
    /// failure is meant to surface at mount rather than be swallowed.
    pub fn resolve<S: Clone + 'static>(&self) -> Result<Store<S>, NoProviderFound> {
        let mut link = self.0.as_deref();
        while let Some(current) = link {
            if let Ok(store) = current.registry.lookup::<S>() {
                return Ok(store);
            }
            link = current.parent.0.as_deref();
        }
        Err(NoProviderFound {
            type_name: type_name::<S>(),
        })
    }

    /// Number of registries in scope.
    pub fn depth(&self) -> usize {
        let mut n = 0;
        let mut link = self.0.as_deref();
        while let Some(current) = link {
            n += 1;
            link = current.parent.0.as_deref();
        }
        n
    }
}

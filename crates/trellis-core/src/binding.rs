use std::any::type_name;

use crate::error::NoProviderFound;
use crate::provider::ProviderChain;
use crate::store::{Store, Subscription};

/// Links one consuming component to one store for the span of a mount.
///
/// A binding's lifetime is `Unmounted → Mounted → Unmounted`, terminal:
/// [`unmount`](StoreBinding::unmount) consumes it, and a remount creates a
/// fresh binding. A component needing several store types holds one
/// independent binding per type.
pub struct StoreBinding<S: Clone + 'static> {
    store: Store<S>,
    subscription: Subscription,
}

impl<S: Clone + 'static> StoreBinding<S> {
    /// Resolves `S` against the enclosing providers and subscribes `rerender`
    /// to the resolved store.
    ///
    /// Fails fast with [`NoProviderFound`] so a component never renders with
    /// missing state.
    pub fn mount(
        chain: &ProviderChain,
        rerender: impl Fn() + 'static,
    ) -> Result<Self, NoProviderFound> {
        let store = chain.resolve::<S>()?;
        let subscription = store.subscribe(rerender);
        log::debug!("bound store<{}>", type_name::<S>());
        Ok(Self {
            store,
            subscription,
        })
    }

    pub fn store(&self) -> &Store<S> {
        &self.store
    }

    /// Live snapshot; never cached across renders.
    pub fn read(&self) -> S {
        self.store.read()
    }

    /// Cancels the subscription, exactly once, and retires the binding.
    pub fn unmount(self) {
        self.subscription.cancel();
        log::debug!("unbound store<{}>", type_name::<S>());
    }
}

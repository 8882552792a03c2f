//! # Stores, providers, and lifecycle-bound injection
//!
//! Trellis is a small state-container layer for tree-structured UIs. There
//! are three main pieces:
//!
//! - [`Store<S>`] — observable holder of one state value, with a serialized
//!   async mutation protocol.
//! - [`Registry`] / [`ProviderChain`] — scope-bound store collections and
//!   nearest-enclosing-scope resolution.
//! - [`StoreBinding`] — per-consumer link between a component's mount
//!   lifetime and a store's observer set.
//!
//! ## Stores
//!
//! A `Store<S>` is a cloneable handle to a piece of state:
//!
//! ```rust
//! use trellis_core::prelude::*;
//!
//! #[derive(Clone)]
//! struct Counter { value: i32 }
//!
//! let store = Store::new(Counter { value: 42 });
//! assert_eq!(store.read().value, 42);
//!
//! pollster::block_on(store.set_state(|c| Counter { value: c.value + 1 })).unwrap();
//! assert_eq!(store.read().value, 43);
//! ```
//!
//! State is replaced wholesale, never edited in place. [`Store::mutate`]
//! accepts an async updater and serializes concurrent calls in call order:
//! a later updater always sees an earlier one's result, so interleaved async
//! mutations cannot lose updates. If an updater fails, the mutation is
//! discarded atomically — state untouched, no observer invoked.
//!
//! ## Providers
//!
//! Components do not construct their stores. An ancestor scope owns a
//! [`Registry`] of store handles, and a consumer resolves by state type
//! through the [`ProviderChain`], nearest scope first:
//!
//! ```rust
//! use trellis_core::prelude::*;
//!
//! #[derive(Clone)]
//! struct Session { user: String }
//!
//! let session = Store::new(Session { user: "ada".into() });
//! let registry = Registry::new(stores![session.clone()]).unwrap();
//!
//! let chain = ProviderChain::root().extend(registry);
//! let resolved: Store<Session> = chain.resolve().unwrap();
//! assert_eq!(resolved.read().user, "ada");
//! ```
//!
//! A registry rejects two stores of the same state type at construction
//! ([`DuplicateType`]), and resolution against an exhausted chain fails with
//! [`NoProviderFound`] — at mount, before anything renders with missing
//! state. Nested registries shadow outer ones.
//!
//! ## Components and the host
//!
//! [`Host`] is a minimal stand-in for a real rendering engine: it mounts a
//! [`Node`] tree, hands each [`Component`] a [`MountCx`] to create bindings
//! with, and re-renders components that stores marked dirty:
//!
//! ```rust
//! use trellis_core::prelude::*;
//!
//! #[derive(Clone)]
//! struct Counter { value: i32 }
//!
//! struct Label { binding: Option<StoreBinding<Counter>> }
//!
//! impl Component for Label {
//!     fn mount(&mut self, cx: &mut MountCx<'_>) -> Result<(), NoProviderFound> {
//!         self.binding = Some(cx.bind::<Counter>()?);
//!         Ok(())
//!     }
//!     fn view(&self) -> String {
//!         match &self.binding {
//!             Some(binding) => binding.read().value.to_string(),
//!             None => String::new(),
//!         }
//!     }
//!     fn unmount(&mut self) {
//!         if let Some(binding) = self.binding.take() {
//!             binding.unmount();
//!         }
//!     }
//! }
//!
//! let store = Store::new(Counter { value: 42 });
//! let tree = Node::provide(
//!     stores![store.clone()],
//!     vec![Node::component(Label { binding: None })],
//! ).unwrap();
//!
//! let mut host = Host::new();
//! host.mount(tree).unwrap();
//! let id = host.component_ids()[0];
//! assert_eq!(host.view_of(id), Some("42"));
//!
//! pollster::block_on(store.set_state(|c| Counter { value: c.value + 1 })).unwrap();
//! host.render_frame();
//! assert_eq!(host.view_of(id), Some("43"));
//!
//! host.unmount();
//! assert_eq!(store.observer_count(), 0);
//! ```
//!
//! Re-renders are scheduled, not immediate: store notifications mark the
//! owning component dirty, and marks coalesce until the next
//! [`Host::render_frame`]. Unmounting cancels every binding's subscription,
//! so observer counts drop back to zero.

pub mod binding;
pub mod error;
pub mod host;
pub mod prelude;
pub mod provider;
pub mod registry;
pub mod store;
pub mod tests;

pub use binding::*;
pub use error::*;
pub use host::*;
pub use provider::*;
pub use registry::*;
pub use store::*;

pub use crate::binding::StoreBinding;
pub use crate::error::{DuplicateType, MutationFailure, NoProviderFound, NotFound};
pub use crate::host::{Component, Host, MountCx, Node, NodeId};
pub use crate::provider::ProviderChain;
pub use crate::registry::{AnyStore, Registry};
pub use crate::store::{Store, Subscription};
pub use crate::stores;

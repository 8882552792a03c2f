use thiserror::Error;

/// Two stores with the same state type were handed to one registry.
///
/// Raised eagerly at registry construction; a duplicate would make
/// by-type lookup ambiguous, so it never becomes a silent shadow.
#[derive(Debug, Error)]
#[error("duplicate store type `{type_name}` in one registry")]
pub struct DuplicateType {
    pub(crate) type_name: &'static str,
}

impl DuplicateType {
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

/// A single registry does not hold the requested store type.
///
/// Recovered by [`ProviderChain::resolve`](crate::provider::ProviderChain::resolve),
/// which moves on to the next enclosing registry; application code only ever
/// sees [`NoProviderFound`].
#[derive(Debug, Error)]
#[error("registry holds no store of type `{type_name}`")]
pub struct NotFound {
    pub(crate) type_name: &'static str,
}

impl NotFound {
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

/// No enclosing provider supplies the requested store type.
///
/// Surfaces at mount, before anything renders with missing state.
#[derive(Debug, Error)]
#[error("no enclosing provider supplies a store of type `{type_name}`")]
pub struct NoProviderFound {
    pub(crate) type_name: &'static str,
}

impl NoProviderFound {
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

/// An updater failed, so the mutation was discarded.
///
/// The store's state is untouched and no observer was invoked.
#[derive(Debug, Error)]
#[error("store mutation failed: {source}")]
pub struct MutationFailure {
    source: Box<dyn std::error::Error + 'static>,
}

impl MutationFailure {
    pub(crate) fn new(source: Box<dyn std::error::Error + 'static>) -> Self {
        Self { source }
    }

    pub fn into_source(self) -> Box<dyn std::error::Error + 'static> {
        self.source
    }
}

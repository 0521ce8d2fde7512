//! Error types for resource construction and registry operations.
//!
//! Not-found and already-present conditions are never errors here; the
//! registry reports them through its boolean and optional results. The
//! variants below cover the two genuine failure paths: a resource built
//! without its required fields, and a lifecycle hook that failed.

use crate::key::ResourceKey;
use thiserror::Error;

/// Errors from [`Resource::new`](crate::resource::Resource::new).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResourceError {
    /// The resource name was empty.
    #[error("resource name must not be empty")]
    EmptyName,

    /// The resource kind was empty.
    #[error("resource kind must not be empty")]
    EmptyKind,
}

/// Failure raised by a lifecycle hook.
///
/// Hook implementations build one with [`HookError::new`], or wrap an
/// underlying error with [`HookError::with_source`].
#[derive(Debug, Error)]
#[error("{message}")]
pub struct HookError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl HookError {
    /// Creates a hook error from a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a hook error wrapping an underlying error.
    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Errors surfaced by [`ResourceRegistry`](crate::registry::ResourceRegistry)
/// operations.
///
/// Hook failures are propagated to the caller rather than swallowed; in both
/// cases the entry remains registered so the caller can decide how to clean
/// up the failed transition.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The on-register hook failed. The entry remains registered.
    #[error("on-register hook failed for '{key}'")]
    RegisterHook {
        /// Key of the resource whose hook failed.
        key: ResourceKey,
        /// The hook's error.
        #[source]
        source: HookError,
    },

    /// The on-unregister hook failed. The entry remains registered.
    #[error("on-unregister hook failed for '{key}'")]
    UnregisterHook {
        /// Key of the resource whose hook failed.
        key: ResourceKey,
        /// The hook's error.
        #[source]
        source: HookError,
    },
}

impl RegistryError {
    /// Returns the key of the resource whose hook failed.
    #[must_use]
    pub fn key(&self) -> &ResourceKey {
        match self {
            Self::RegisterHook { key, .. } | Self::UnregisterHook { key, .. } => key,
        }
    }
}

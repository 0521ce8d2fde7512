//! Registrable resources and the concrete [`Resource`] value.
//!
//! This module provides the [`Registrable`] trait, the unit a
//! [`ResourceRegistry`](crate::registry::ResourceRegistry) stores, and
//! [`Resource`], the standard registrable kind carrying a payload slot and
//! lifecycle timestamps.
//!
//! # Custom kinds
//!
//! A concrete resource kind implements [`Registrable`] directly instead of
//! subclassing anything. Kinds that want the standard name/kind/payload
//! bookkeeping embed a [`Resource`] and delegate to it:
//!
//! ```
//! use anchorage_registry::error::HookError;
//! use anchorage_registry::key::ResourceKey;
//! use anchorage_registry::resource::{Registrable, Resource};
//! use anchorage_registry::time::Timestamp;
//!
//! struct Connection {
//!     inner: Resource,
//! }
//!
//! impl Registrable for Connection {
//!     fn key(&self) -> ResourceKey {
//!         self.inner.key()
//!     }
//!
//!     fn on_register(&self) -> Result<(), HookError> {
//!         // open the connection
//!         Ok(())
//!     }
//!
//!     fn on_unregister(&self) -> Result<(), HookError> {
//!         // close the connection
//!         Ok(())
//!     }
//!
//!     fn mark_unregistered(&self, at: Timestamp) {
//!         self.inner.mark_unregistered(at);
//!     }
//! }
//! ```

use crate::error::{HookError, ResourceError};
use crate::key::ResourceKey;
use crate::time::Timestamp;
use core::any::Any;
use core::sync::atomic::{AtomicU64, Ordering};
use indexmap::IndexMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Category metadata attached to a resource: tags mapped to arbitrary values.
///
/// Required at construction but may be empty. The registry never inspects it.
pub type Metadata = IndexMap<String, serde_json::Value>;

/// Capability interface every registrable entity implements.
///
/// The registry stores entries as `Arc<dyn Registrable>` and drives their
/// lifecycle through this interface:
///
/// - [`key()`](Registrable::key) must be pure and stable: computable without
///   the entity being registered, and unchanged for its entire lifetime.
/// - [`on_register()`](Registrable::on_register) is invoked exactly once per
///   successful registration, immediately after the entry becomes visible to
///   lookups.
/// - [`on_unregister()`](Registrable::on_unregister) is invoked exactly once
///   per successful unregistration, immediately before the entry is removed
///   (the hook still observes itself as registered while running).
/// - [`mark_unregistered()`](Registrable::mark_unregistered) lets the
///   registry record teardown time on kinds that track it; minimal kinds can
///   leave the default no-op.
///
/// A hook that fails is propagated to the `register`/`unregister` caller and
/// never retried or suppressed by the registry.
pub trait Registrable: Any + Send + Sync {
    /// Returns the stable identity used as the registry key.
    fn key(&self) -> ResourceKey;

    /// Invoked by the registry immediately after this entry is inserted.
    fn on_register(&self) -> Result<(), HookError> {
        Ok(())
    }

    /// Invoked by the registry immediately before this entry is removed.
    fn on_unregister(&self) -> Result<(), HookError> {
        Ok(())
    }

    /// Records when the registry retired this entry.
    fn mark_unregistered(&self, _at: Timestamp) {}
}

/// Serializable summary of a [`Resource`]. The payload is excluded; the
/// registry treats it as opaque.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceInfo {
    /// Identifying name.
    pub name: String,
    /// Kind discriminator (e.g. `service`, `data_connection`, `queryset`).
    pub kind: String,
    /// Derived registry key.
    pub key: ResourceKey,
    /// Category metadata.
    pub category: Metadata,
    /// Creation time.
    pub created_at: Timestamp,
    /// Teardown time; equals `created_at` until unregistration.
    pub unregistered_at: Timestamp,
}

/// A named, typed holder of one opaque payload.
///
/// The standard registrable kind. A resource is constructed with a name, a
/// kind, and category metadata; a payload of any `Send + Sync` shape can be
/// attached with [`set`](Self::set) and replaced at will (no history is
/// kept). Name, kind, and category are immutable after construction — only
/// the payload slot and the unregistration timestamp ever change.
///
/// # Example
///
/// ```
/// use anchorage_registry::resource::{Metadata, Resource};
///
/// let resource = Resource::new("sessions", "data_connection", Metadata::new()).unwrap();
/// assert!(!resource.has_payload());
///
/// resource.set(vec![1u32, 2, 3]);
/// let payload = resource.payload::<Vec<u32>>().unwrap();
/// assert_eq!(payload.len(), 3);
/// ```
pub struct Resource {
    name: String,
    kind: String,
    category: Metadata,
    payload: RwLock<Option<Arc<dyn Any + Send + Sync>>>,
    created_at: Timestamp,
    unregistered_at: AtomicU64,
}

impl core::fmt::Debug for Resource {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Resource")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("has_payload", &self.has_payload())
            .finish()
    }
}

impl Resource {
    /// Creates a resource with no payload attached.
    ///
    /// Both timestamps start at the current time.
    ///
    /// # Errors
    ///
    /// - [`ResourceError::EmptyName`] if `name` is empty
    /// - [`ResourceError::EmptyKind`] if `kind` is empty
    pub fn new(
        name: impl Into<String>,
        kind: impl Into<String>,
        category: Metadata,
    ) -> Result<Self, ResourceError> {
        let name = name.into();
        let kind = kind.into();
        if name.is_empty() {
            return Err(ResourceError::EmptyName);
        }
        if kind.is_empty() {
            return Err(ResourceError::EmptyKind);
        }

        let created_at = Timestamp::now();
        Ok(Self {
            name,
            kind,
            category,
            payload: RwLock::new(None),
            created_at,
            unregistered_at: AtomicU64::new(created_at.as_millis()),
        })
    }

    /// Returns the identifying name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the kind discriminator.
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Returns the category metadata.
    #[must_use]
    pub fn category(&self) -> &Metadata {
        &self.category
    }

    /// Returns the creation time.
    #[must_use]
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Returns the teardown time; equals [`created_at`](Self::created_at)
    /// until the registry unregisters this resource.
    #[must_use]
    pub fn unregistered_at(&self) -> Timestamp {
        Timestamp::from_millis(self.unregistered_at.load(Ordering::Acquire))
    }

    /// Attaches or replaces the payload.
    ///
    /// At most one payload is held at a time; the previous one is dropped
    /// with no retained history. Ownership of the value stays with the
    /// caller's domain — the registry never inspects it.
    pub fn set<P: Any + Send + Sync>(&self, payload: P) {
        *self.payload.write() = Some(Arc::new(payload));
    }

    /// Returns the payload when one of type `P` is attached.
    ///
    /// `None` when no payload was ever [`set`](Self::set), or when the
    /// attached payload has a different type. Never an error.
    #[must_use]
    pub fn payload<P: Any + Send + Sync>(&self) -> Option<Arc<P>> {
        let guard = self.payload.read();
        guard.as_ref().and_then(|p| Arc::clone(p).downcast::<P>().ok())
    }

    /// Returns the payload without assuming its type.
    #[must_use]
    pub fn payload_any(&self) -> Option<Arc<dyn Any + Send + Sync>> {
        self.payload.read().clone()
    }

    /// Returns whether a payload is attached.
    #[must_use]
    pub fn has_payload(&self) -> bool {
        self.payload.read().is_some()
    }

    /// Returns a serializable summary of this resource.
    #[must_use]
    pub fn info(&self) -> ResourceInfo {
        ResourceInfo {
            name: self.name.clone(),
            kind: self.kind.clone(),
            key: self.key(),
            category: self.category.clone(),
            created_at: self.created_at,
            unregistered_at: self.unregistered_at(),
        }
    }
}

impl Registrable for Resource {
    fn key(&self) -> ResourceKey {
        ResourceKey::derive(&self.kind, &self.name)
    }

    fn mark_unregistered(&self, at: Timestamp) {
        self.unregistered_at.store(at.as_millis(), Ordering::Release);
    }
}

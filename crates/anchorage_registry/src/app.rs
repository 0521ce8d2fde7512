//! Application handles and registry binding.
//!
//! Each application instance owns exactly one [`ResourceRegistry`]. The
//! registry is not a process-wide global: two [`AppHandle`]s in the same
//! process own fully independent registries. The registry is created lazily
//! on first use and stays bound to its handle for the rest of the handle's
//! life.

use crate::registry::ResourceRegistry;
use std::sync::OnceLock;
use tracing::debug;

/// Identity of one application instance, owning that instance's
/// [`ResourceRegistry`].
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use anchorage_registry::app::AppHandle;
/// use anchorage_registry::resource::{Metadata, Registrable, Resource};
///
/// let app = AppHandle::new();
/// let resource = Resource::new("sessions", "data_connection", Metadata::new()).unwrap();
/// let key = resource.key();
///
/// app.registry().register(Arc::new(resource)).unwrap();
/// assert!(app.registry().is_registered(&key));
///
/// // A second instance does not see the first instance's resources.
/// let other = AppHandle::new();
/// assert!(!other.registry().is_registered(&key));
/// ```
#[derive(Default)]
pub struct AppHandle {
    registry: OnceLock<ResourceRegistry>,
}

impl core::fmt::Debug for AppHandle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AppHandle")
            .field("initialized", &self.has_registry())
            .finish()
    }
}

impl AppHandle {
    /// Creates a handle with no registry yet.
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: OnceLock::new(),
        }
    }

    /// Returns this instance's registry, creating it on first use.
    ///
    /// Idempotent: every call returns the same registry, and redundant calls
    /// from concurrent initialization paths are safe.
    pub fn registry(&self) -> &ResourceRegistry {
        self.registry.get_or_init(|| {
            debug!("created resource registry for application instance");
            ResourceRegistry::new()
        })
    }

    /// Returns whether the registry has been created yet.
    #[must_use]
    pub fn has_registry(&self) -> bool {
        self.registry.get().is_some()
    }
}

//! Typed "service" resources.
//!
//! A [`ServiceEndpoint`] is the registrable kind a service client stores in
//! the registry: one endpoint per remote service address, carrying the
//! service's [`ServiceInfo`] as its payload. The lifecycle hooks track
//! connection state; no transport is opened here — sockets belong to the
//! messaging layer, not the registry.

use anchorage_registry::error::{HookError, ResourceError};
use anchorage_registry::key::ResourceKey;
use anchorage_registry::resource::{Metadata, Registrable, Resource};
use anchorage_registry::time::Timestamp;
use core::sync::atomic::{AtomicBool, Ordering};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Resource kind under which service endpoints are registered.
pub const SERVICE_KIND: &str = "service";

/// Connection details for a remote service.
///
/// # Example
///
/// ```
/// use anchorage_service::ServiceInfo;
///
/// let info = ServiceInfo {
///     address: "ipc://run/slow".into(),
///     response_address: "ipc://run/slow_response".into(),
///     passphrase: "my_shared_secret".into(),
/// };
/// assert_eq!(info.address, "ipc://run/slow");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInfo {
    /// Address requests are sent to.
    pub address: String,
    /// Address responses come back on.
    pub response_address: String,
    /// Shared secret presented with every request.
    pub passphrase: String,
}

/// A service held in the registry, keyed by its address under
/// [`SERVICE_KIND`].
///
/// Embeds a [`Resource`] whose payload is the [`ServiceInfo`]; the hooks
/// mark the endpoint live on registration and dead on unregistration.
pub struct ServiceEndpoint {
    resource: Resource,
    connected: AtomicBool,
}

impl core::fmt::Debug for ServiceEndpoint {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ServiceEndpoint")
            .field("address", &self.resource.name())
            .field("connected", &self.is_connected())
            .finish()
    }
}

impl ServiceEndpoint {
    /// Creates an endpoint for `info`, keyed by its address.
    ///
    /// # Errors
    ///
    /// [`ResourceError::EmptyName`] if the address is empty.
    pub fn new(info: ServiceInfo) -> Result<Arc<Self>, ResourceError> {
        let resource = Resource::new(info.address.clone(), SERVICE_KIND, Metadata::new())?;
        resource.set(info);
        Ok(Arc::new(Self {
            resource,
            connected: AtomicBool::new(false),
        }))
    }

    /// Derives the registry key for a service address.
    #[must_use]
    pub fn key_for(address: &str) -> ResourceKey {
        ResourceKey::derive(SERVICE_KIND, address)
    }

    /// Returns the endpoint's connection details.
    #[must_use]
    pub fn info(&self) -> Arc<ServiceInfo> {
        self.resource
            .payload::<ServiceInfo>()
            .expect("service payload is set at construction")
    }

    /// Returns the underlying resource.
    #[must_use]
    pub fn resource(&self) -> &Resource {
        &self.resource
    }

    /// Returns whether the endpoint is currently marked live.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }
}

impl Registrable for ServiceEndpoint {
    fn key(&self) -> ResourceKey {
        self.resource.key()
    }

    fn on_register(&self) -> Result<(), HookError> {
        self.connected.store(true, Ordering::Release);
        info!(address = %self.resource.name(), "service endpoint connected");
        Ok(())
    }

    fn on_unregister(&self) -> Result<(), HookError> {
        self.connected.store(false, Ordering::Release);
        info!(address = %self.resource.name(), "service endpoint disconnected");
        Ok(())
    }

    fn mark_unregistered(&self, at: Timestamp) {
        self.resource.mark_unregistered(at);
    }
}

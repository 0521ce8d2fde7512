//! Idempotent service registration for one application instance.

use crate::endpoint::{ServiceEndpoint, ServiceInfo};
use anchorage_registry::app::AppHandle;
use anchorage_registry::error::{RegistryError, ResourceError};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Errors surfaced by [`ServiceClient`] operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The endpoint resource could not be constructed.
    #[error(transparent)]
    Resource(#[from] ResourceError),

    /// A registry operation failed.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Registers and resolves service endpoints for one application instance.
///
/// The client goes through the registry's public operations only, never the
/// backing mapping. Registration is idempotent per address: registering an
/// address that is already present is a no-op that hands back the existing
/// endpoint.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use anchorage_registry::app::AppHandle;
/// use anchorage_service::{ServiceClient, ServiceInfo};
///
/// let app = Arc::new(AppHandle::new());
/// let client = ServiceClient::new(Arc::clone(&app));
///
/// let info = ServiceInfo {
///     address: "ipc://run/slow".into(),
///     response_address: "ipc://run/slow_response".into(),
///     passphrase: "my_shared_secret".into(),
/// };
///
/// let endpoint = client.register_service(info.clone()).unwrap();
/// let again = client.register_service(info).unwrap();
/// assert!(Arc::ptr_eq(&endpoint, &again));
/// ```
#[derive(Clone)]
pub struct ServiceClient {
    app: Arc<AppHandle>,
}

impl core::fmt::Debug for ServiceClient {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ServiceClient").field("app", &self.app).finish()
    }
}

impl ServiceClient {
    /// Creates a client bound to `app`.
    #[must_use]
    pub fn new(app: Arc<AppHandle>) -> Self {
        Self { app }
    }

    /// Registers a service endpoint, or returns the endpoint already
    /// registered under the same address.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::Resource`] when `info` has an empty address
    /// - [`ServiceError::Registry`] when the on-register hook fails
    pub fn register_service(&self, info: ServiceInfo) -> Result<Arc<ServiceEndpoint>, ServiceError> {
        let registry = self.app.registry();
        let key = ServiceEndpoint::key_for(&info.address);

        if let Some(existing) = registry.get_as::<ServiceEndpoint>(&key) {
            debug!(key = %key, "service already registered");
            return Ok(existing);
        }

        let endpoint = ServiceEndpoint::new(info)?;
        if registry.register(endpoint.clone())? {
            Ok(endpoint)
        } else {
            // Lost a race against a concurrent registration for the same
            // address; hand back the entry that won.
            Ok(registry.get_as::<ServiceEndpoint>(&key).unwrap_or(endpoint))
        }
    }

    /// Returns the endpoint registered under `address`, if any.
    #[must_use]
    pub fn service(&self, address: &str) -> Option<Arc<ServiceEndpoint>> {
        self.app
            .registry()
            .get_as::<ServiceEndpoint>(&ServiceEndpoint::key_for(address))
    }

    /// Unregisters the endpoint under `address`.
    ///
    /// Returns `Ok(false)` when no endpoint is registered there.
    ///
    /// # Errors
    ///
    /// [`ServiceError::Registry`] when the on-unregister hook fails.
    pub fn unregister_service(&self, address: &str) -> Result<bool, ServiceError> {
        Ok(self
            .app
            .registry()
            .unregister(&ServiceEndpoint::key_for(address))?)
    }
}

//! A per-application registry of named, typed resources in Rust.
//!

/// Core registry: keys, resources, lifecycle hooks, application handles.
pub use anchorage_registry as registry;

/// Service-client layer built on the registry.
pub use anchorage_service as service;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use anchorage_registry::prelude::*;
    pub use anchorage_service::{ServiceClient, ServiceEndpoint, ServiceError, ServiceInfo};
}

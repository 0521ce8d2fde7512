//! Service-client layer over the Anchorage resource registry.
//!
//! This crate shows the registry consumed from the outside: services are
//! registered as typed resources and resolved by address, all through the
//! registry's public operations. No transport lives here — message framing
//! and socket management belong to the messaging layer.
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use anchorage_registry::app::AppHandle;
//! use anchorage_service::{ServiceClient, ServiceInfo};
//!
//! let app = Arc::new(AppHandle::new());
//! let client = ServiceClient::new(Arc::clone(&app));
//!
//! let endpoint = client
//!     .register_service(ServiceInfo {
//!         address: "ipc://run/slow".into(),
//!         response_address: "ipc://run/slow_response".into(),
//!         passphrase: "my_shared_secret".into(),
//!     })
//!     .unwrap();
//! assert!(endpoint.is_connected());
//!
//! client.unregister_service("ipc://run/slow").unwrap();
//! assert!(!endpoint.is_connected());
//! ```
//!
//! # Architecture
//!
//! - [`ServiceInfo`] — connection details carried as the resource payload
//! - [`ServiceEndpoint`] — the registrable "service" kind with
//!   connection-tracking hooks
//! - [`ServiceClient`] — idempotent register/lookup/unregister per
//!   application instance

pub mod client;
pub mod endpoint;

// Re-export core types at crate root.
pub use client::{ServiceClient, ServiceError};
pub use endpoint::{SERVICE_KIND, ServiceEndpoint, ServiceInfo};

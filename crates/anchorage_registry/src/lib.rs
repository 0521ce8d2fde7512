//! The core resource registry for Anchorage applications.
//!
//! `anchorage_registry` provides the primitives for managing named, typed
//! resources over the life of an application instance:
//!
//! - [`app`] - Application handles owning their registry
//! - [`error`] - Construction, hook, and registry errors
//! - [`key`] - Key derivation from `(kind, name)` pairs
//! - [`registry`] - The key-to-resource mapping with hook dispatch
//! - [`resource`] - The `Registrable` trait and concrete `Resource` value
//! - [`time`] - Epoch-millisecond timestamps
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use anchorage_registry::prelude::*;
//!
//! let app = AppHandle::new();
//!
//! let resource = Resource::new("slow", "service", Metadata::new()).unwrap();
//! resource.set("tcp://127.0.0.1:9999".to_string());
//! let key = resource.key();
//!
//! assert!(app.registry().register(Arc::new(resource)).unwrap());
//!
//! let fetched = app.registry().get_as::<Resource>(&key).unwrap();
//! assert_eq!(*fetched.payload::<String>().unwrap(), "tcp://127.0.0.1:9999");
//!
//! assert!(app.registry().unregister(&key).unwrap());
//! assert!(!app.registry().is_registered(&key));
//! ```

/// Application handles owning their registry.
pub mod app;

/// Error types for resource construction and registry operations.
pub mod error;

/// Key derivation for registered resources.
pub mod key;

/// The per-application resource registry.
pub mod registry;

/// Registrable resources and the concrete resource value.
pub mod resource;

/// Wall-clock timestamps for lifecycle bookkeeping.
pub mod time;

pub use app::AppHandle;
pub use error::{HookError, RegistryError, ResourceError};
pub use key::ResourceKey;
pub use registry::ResourceRegistry;
pub use resource::{Metadata, Registrable, Resource, ResourceInfo};
pub use time::Timestamp;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::app::*;
    pub use crate::error::*;
    pub use crate::key::*;
    pub use crate::registry::*;
    pub use crate::resource::*;
    pub use crate::time::*;
}

//! Example service client CLI.
//!
//! Registers a couple of resources against one application instance, looks
//! them up, and tears them down again. Run with `RUST_LOG=debug` to watch
//! the registry's hook dispatch.
//!
//! # Usage
//!
//! ```bash
//! service_client
//! ```

use anchorage_registry::app::AppHandle;
use anchorage_registry::key::ResourceKey;
use anchorage_registry::resource::{Metadata, Registrable, Resource};
use anchorage_service::{ServiceClient, ServiceInfo};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn main() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().compact())
        .init();

    let app = Arc::new(AppHandle::new());
    let client = ServiceClient::new(Arc::clone(&app));

    // Register a remote service; repeating the call is a no-op that hands
    // back the endpoint already held by the registry.
    let info = ServiceInfo {
        address: "ipc://run/slow".into(),
        response_address: "ipc://run/slow_response".into(),
        passphrase: "my_shared_secret".into(),
    };
    let endpoint = client
        .register_service(info.clone())
        .expect("register service");
    let again = client.register_service(info).expect("register service again");
    assert!(Arc::ptr_eq(&endpoint, &again));

    let summary = serde_json::to_string(&endpoint.resource().info()).expect("serialize summary");
    tracing::info!(connected = endpoint.is_connected(), %summary, "service ready");

    // A plain data resource with an opaque payload, registered directly.
    let sessions = Resource::new("sessions", "data_connection", Metadata::new())
        .expect("construct resource");
    sessions.set(vec!["alpha".to_string(), "beta".to_string()]);
    let sessions_key = sessions.key();
    app.registry()
        .register(Arc::new(sessions))
        .expect("register sessions");

    let fetched = app
        .registry()
        .get_as::<Resource>(&sessions_key)
        .expect("sessions resource present");
    let names = fetched
        .payload::<Vec<String>>()
        .expect("sessions payload present");
    tracing::info!(count = names.len(), "session store attached");

    // A second application instance sees none of the above.
    let other = AppHandle::new();
    assert!(
        !other
            .registry()
            .is_registered(&ResourceKey::derive("service", "ipc://run/slow"))
    );

    // Teardown: the service hook flips the endpoint back to disconnected,
    // then the remaining entries drain through shutdown.
    client
        .unregister_service("ipc://run/slow")
        .expect("unregister service");
    assert!(!endpoint.is_connected());

    app.registry().shutdown().expect("shutdown registry");
    tracing::info!(remaining = app.registry().len(), "registry drained");
}

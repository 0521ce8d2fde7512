//! End-to-end lifecycle tests exercising the public registry API.

use core::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anchorage_registry::app::AppHandle;
use anchorage_registry::error::HookError;
use anchorage_registry::key::ResourceKey;
use anchorage_registry::registry::ResourceRegistry;
use anchorage_registry::resource::{Metadata, Registrable, Resource};
use parking_lot::Mutex;

/// The full register / double-register / lookup / unregister flow for a
/// payload-carrying resource.
#[test]
fn service_resource_full_lifecycle() {
    let app = AppHandle::new();
    let registry = app.registry();

    let resource = Arc::new(Resource::new("slow", "service", Metadata::new()).unwrap());
    resource.set("ipc://run/slow".to_string());
    let key = resource.key();

    assert!(registry.register(resource.clone()).unwrap());
    assert!(!registry.register(resource.clone()).unwrap());

    let fetched = registry.get_as::<Resource>(&key).unwrap();
    assert_eq!(fetched.key(), key);
    assert_eq!(*fetched.payload::<String>().unwrap(), "ipc://run/slow");

    assert!(registry.unregister(&key).unwrap());
    assert!(registry.get(&key).is_none());
    assert!(resource.unregistered_at() >= resource.created_at());
}

/// Registrable whose on-register hook looks its own key up.
struct SelfObserving {
    key: ResourceKey,
    registry: Mutex<Option<Arc<ResourceRegistry>>>,
    observed_present: AtomicBool,
}

impl Registrable for SelfObserving {
    fn key(&self) -> ResourceKey {
        self.key.clone()
    }

    fn on_register(&self) -> Result<(), HookError> {
        let guard = self.registry.lock();
        let registry = guard.as_ref().expect("registry handle set before register");
        self.observed_present
            .store(registry.is_registered(&self.key), Ordering::SeqCst);
        Ok(())
    }
}

/// An on-register hook observes its own entry as already present.
#[test]
fn register_hook_observes_itself() {
    let registry = Arc::new(ResourceRegistry::new());
    let resource = Arc::new(SelfObserving {
        key: ResourceKey::derive("service", "introspective"),
        registry: Mutex::new(Some(Arc::clone(&registry))),
        observed_present: AtomicBool::new(false),
    });

    assert!(registry.register(resource.clone()).unwrap());
    assert!(resource.observed_present.load(Ordering::SeqCst));
}

/// Registrable whose startup hook fails but whose teardown succeeds.
struct FlakyStartup {
    key: ResourceKey,
    torn_down: AtomicBool,
}

impl Registrable for FlakyStartup {
    fn key(&self) -> ResourceKey {
        self.key.clone()
    }

    fn on_register(&self) -> Result<(), HookError> {
        Err(HookError::new("upstream not reachable"))
    }

    fn on_unregister(&self) -> Result<(), HookError> {
        self.torn_down.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// After a failed on-register hook the caller can unregister to clean up,
/// and the teardown hook still fires exactly once.
#[test]
fn caller_cleans_up_after_failed_register_hook() {
    let registry = ResourceRegistry::new();
    let resource = Arc::new(FlakyStartup {
        key: ResourceKey::derive("service", "flaky"),
        torn_down: AtomicBool::new(false),
    });
    let key = resource.key();

    let err = registry.register(resource.clone()).unwrap_err();
    assert!(err.to_string().contains("serviceflaky"));
    assert!(registry.is_registered(&key));

    assert!(registry.unregister(&key).unwrap());
    assert!(!registry.is_registered(&key));
    assert!(resource.torn_down.load(Ordering::SeqCst));
}

/// Teardown timestamps stay untouched until unregistration happens.
#[test]
fn teardown_time_advances_only_on_unregister() {
    let registry = ResourceRegistry::new();
    let resource = Arc::new(Resource::new("sessions", "data_connection", Metadata::new()).unwrap());
    let key = resource.key();

    registry.register(resource.clone()).unwrap();
    assert_eq!(resource.unregistered_at(), resource.created_at());

    registry.unregister(&key).unwrap();
    assert!(resource.unregistered_at() >= resource.created_at());
}

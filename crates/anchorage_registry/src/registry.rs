//! The per-application resource registry.
//!
//! A [`ResourceRegistry`] maps [`ResourceKey`]s to registered entries and
//! drives their lifecycle hooks at the defined points of the protocol:
//!
//! - `register` inserts the entry, then invokes its on-register hook. The
//!   entry is visible to lookups before the hook runs, so a hook that checks
//!   its own key observes itself as present.
//! - `unregister` records the teardown time, invokes the on-unregister hook
//!   exactly once, then removes the entry. The hook still observes the entry
//!   as registered while it runs.
//!
//! Double registration and unknown-key unregistration are not errors; they
//! are reported through the boolean results. The only error paths are
//! propagated hook failures, in which case the entry stays registered and
//! the caller decides how to clean up.
//!
//! # Concurrency
//!
//! All operations are local in-memory map accesses plus a caller-supplied
//! hook call; the registry never blocks on I/O of its own. A reentrant lock
//! is held across each structural mutation and the adjacent hook call, so
//! from any other thread the two appear atomic, while the hook's own thread
//! can still re-enter lookups (or further registrations) on the same
//! registry.

use crate::error::RegistryError;
use crate::key::ResourceKey;
use crate::resource::Registrable;
use crate::time::Timestamp;
use core::any::Any;
use core::cell::RefCell;
use hashbrown::HashMap;
use parking_lot::ReentrantMutex;
use std::sync::Arc;
use tracing::debug;

/// Mapping from key to registered resource, owned by one application
/// instance.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use anchorage_registry::registry::ResourceRegistry;
/// use anchorage_registry::resource::{Metadata, Registrable, Resource};
///
/// let registry = ResourceRegistry::new();
/// let resource = Resource::new("slow", "service", Metadata::new()).unwrap();
/// let key = resource.key();
///
/// assert!(registry.register(Arc::new(resource)).unwrap());
/// assert!(registry.is_registered(&key));
/// assert!(registry.unregister(&key).unwrap());
/// assert!(!registry.is_registered(&key));
/// ```
#[derive(Default)]
pub struct ResourceRegistry {
    // ReentrantMutex keeps other threads out for the duration of a mutation
    // plus its hook call, while the hook's own thread may re-enter; RefCell
    // supplies the interior mutability the reentrant guard cannot.
    entries: ReentrantMutex<RefCell<HashMap<ResourceKey, Arc<dyn Registrable>>>>,
}

impl core::fmt::Debug for ResourceRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ResourceRegistry")
            .field("keys", &self.keys())
            .finish()
    }
}

impl ResourceRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: ReentrantMutex::new(RefCell::new(HashMap::new())),
        }
    }

    /// Registers a resource under its own key.
    ///
    /// Returns `Ok(true)` when the resource was newly registered and
    /// `Ok(false)` when the key was already present (the call is then a
    /// no-op; the existing entry is untouched and no hook fires).
    ///
    /// On success the on-register hook has been invoked exactly once, after
    /// the entry became visible to lookups.
    ///
    /// # Errors
    ///
    /// [`RegistryError::RegisterHook`] when the hook fails. The entry
    /// remains registered; unregister it to clean up.
    pub fn register(&self, resource: Arc<dyn Registrable>) -> Result<bool, RegistryError> {
        let key = resource.key();
        let guard = self.entries.lock();
        {
            let mut entries = guard.borrow_mut();
            if entries.contains_key(&key) {
                debug!(key = %key, "register ignored: already registered");
                return Ok(false);
            }
            entries.insert(key.clone(), Arc::clone(&resource));
        }

        // Visible to lookups from here on; the guard keeps other threads
        // out until after the hook.
        if let Err(source) = resource.on_register() {
            return Err(RegistryError::RegisterHook { key, source });
        }

        debug!(key = %key, "resource registered");
        Ok(true)
    }

    /// Unregisters the resource stored under `key`.
    ///
    /// Returns `Ok(true)` when an entry was removed and `Ok(false)` when the
    /// key was not registered (the call is then a no-op and no hook fires).
    ///
    /// On success the entry's teardown time has been recorded and its
    /// on-unregister hook invoked exactly once, before removal.
    ///
    /// # Errors
    ///
    /// [`RegistryError::UnregisterHook`] when the hook fails. The entry
    /// remains registered (with its teardown time already advanced); a later
    /// call retries the transition.
    pub fn unregister(&self, key: &ResourceKey) -> Result<bool, RegistryError> {
        let guard = self.entries.lock();
        let Some(resource) = guard.borrow().get(key).cloned() else {
            debug!(key = %key, "unregister ignored: not registered");
            return Ok(false);
        };

        resource.mark_unregistered(Timestamp::now());

        // The hook runs before removal and may still observe the entry.
        if let Err(source) = resource.on_unregister() {
            return Err(RegistryError::UnregisterHook {
                key: key.clone(),
                source,
            });
        }

        guard.borrow_mut().remove(key);
        debug!(key = %key, "resource unregistered");
        Ok(true)
    }

    /// Returns the resource stored under `key`, if any.
    #[must_use]
    pub fn get(&self, key: &ResourceKey) -> Option<Arc<dyn Registrable>> {
        self.entries.lock().borrow().get(key).cloned()
    }

    /// Returns the resource stored under `key` as its concrete kind.
    ///
    /// `None` when the key is not registered or the entry is a different
    /// concrete kind.
    #[must_use]
    pub fn get_as<R: Registrable>(&self, key: &ResourceKey) -> Option<Arc<R>> {
        self.get(key).and_then(|entry| {
            let entry: Arc<dyn Any + Send + Sync> = entry;
            entry.downcast::<R>().ok()
        })
    }

    /// Returns whether a resource is registered under `key`.
    #[must_use]
    pub fn is_registered(&self, key: &ResourceKey) -> bool {
        self.entries.lock().borrow().contains_key(key)
    }

    /// Returns the number of registered resources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().borrow().len()
    }

    /// Returns `true` if no resources are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().borrow().is_empty()
    }

    /// Returns the keys of all registered resources.
    #[must_use]
    pub fn keys(&self) -> Vec<ResourceKey> {
        self.entries.lock().borrow().keys().cloned().collect()
    }

    /// Unregisters every remaining resource.
    ///
    /// Each entry goes through the full unregistration protocol, so every
    /// on-unregister hook fires exactly once.
    ///
    /// # Errors
    ///
    /// Stops at the first hook failure; the failed entry and any not yet
    /// reached remain registered.
    pub fn shutdown(&self) -> Result<(), RegistryError> {
        let guard = self.entries.lock();
        loop {
            let next = guard.borrow().keys().next().cloned();
            let Some(key) = next else { break };
            self.unregister(&key)?;
        }
        debug!("registry shut down");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HookError;
    use crate::resource::{Metadata, Resource};
    use core::sync::atomic::{AtomicUsize, Ordering};

    /// Registrable that counts hook invocations.
    struct Counting {
        key: ResourceKey,
        registered: AtomicUsize,
        unregistered: AtomicUsize,
    }

    impl Counting {
        fn new(kind: &str, name: &str) -> Arc<Self> {
            Arc::new(Self {
                key: ResourceKey::derive(kind, name),
                registered: AtomicUsize::new(0),
                unregistered: AtomicUsize::new(0),
            })
        }
    }

    impl Registrable for Counting {
        fn key(&self) -> ResourceKey {
            self.key.clone()
        }

        fn on_register(&self) -> Result<(), HookError> {
            self.registered.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn on_unregister(&self) -> Result<(), HookError> {
            self.unregistered.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    /// Registrable whose hooks always fail.
    struct Failing {
        key: ResourceKey,
    }

    impl Registrable for Failing {
        fn key(&self) -> ResourceKey {
            self.key.clone()
        }

        fn on_register(&self) -> Result<(), HookError> {
            Err(HookError::new("refused to come up"))
        }

        fn on_unregister(&self) -> Result<(), HookError> {
            Err(HookError::new("refused to go down"))
        }
    }

    #[test]
    fn register_then_get_round_trips() {
        let registry = ResourceRegistry::new();
        let resource = Resource::new("slow", "service", Metadata::new()).unwrap();
        resource.set("conn".to_string());
        let key = resource.key();

        assert!(registry.register(Arc::new(resource)).unwrap());

        let fetched = registry.get_as::<Resource>(&key).unwrap();
        assert_eq!(fetched.key(), key);
        assert_eq!(*fetched.payload::<String>().unwrap(), "conn");
    }

    #[test]
    fn double_registration_is_a_no_op() {
        let registry = ResourceRegistry::new();
        let counting = Counting::new("service", "slow");

        assert!(registry.register(counting.clone()).unwrap());
        assert!(!registry.register(counting.clone()).unwrap());

        assert_eq!(registry.len(), 1);
        assert_eq!(counting.registered.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn double_unregistration_is_a_no_op() {
        let registry = ResourceRegistry::new();
        let counting = Counting::new("service", "slow");
        let key = counting.key();

        registry.register(counting.clone()).unwrap();

        assert!(registry.unregister(&key).unwrap());
        assert!(!registry.unregister(&key).unwrap());
        assert_eq!(counting.unregistered.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn absent_after_unregister() {
        let registry = ResourceRegistry::new();
        let resource = Resource::new("slow", "service", Metadata::new()).unwrap();
        let key = resource.key();

        registry.register(Arc::new(resource)).unwrap();
        registry.unregister(&key).unwrap();

        assert!(!registry.is_registered(&key));
        assert!(registry.get(&key).is_none());
    }

    #[test]
    fn same_name_different_kinds_coexist() {
        let registry = ResourceRegistry::new();
        let service = Resource::new("primary", "service", Metadata::new()).unwrap();
        let queryset = Resource::new("primary", "queryset", Metadata::new()).unwrap();
        let service_key = service.key();
        let queryset_key = queryset.key();

        assert!(registry.register(Arc::new(service)).unwrap());
        assert!(registry.register(Arc::new(queryset)).unwrap());

        assert_ne!(service_key, queryset_key);
        assert!(registry.is_registered(&service_key));
        assert!(registry.is_registered(&queryset_key));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn unregister_records_teardown_time() {
        let registry = ResourceRegistry::new();
        let resource = Arc::new(Resource::new("slow", "service", Metadata::new()).unwrap());
        let key = resource.key();

        registry.register(resource.clone()).unwrap();
        registry.unregister(&key).unwrap();

        assert!(resource.unregistered_at() >= resource.created_at());
    }

    #[test]
    fn failed_register_hook_leaves_entry_registered() {
        let registry = ResourceRegistry::new();
        let failing = Arc::new(Failing {
            key: ResourceKey::derive("service", "broken"),
        });
        let key = failing.key();

        let err = registry.register(failing).unwrap_err();
        assert!(matches!(err, RegistryError::RegisterHook { .. }));
        assert!(registry.is_registered(&key));
    }

    #[test]
    fn failed_unregister_hook_leaves_entry_registered() {
        let registry = ResourceRegistry::new();
        let failing = Arc::new(Failing {
            key: ResourceKey::derive("service", "stuck"),
        });
        let key = failing.key();

        // The entry lands despite the failing on-register hook.
        registry.register(failing).unwrap_err();
        assert!(registry.is_registered(&key));

        let err = registry.unregister(&key).unwrap_err();
        assert!(matches!(err, RegistryError::UnregisterHook { .. }));
        assert!(registry.is_registered(&key));
    }

    #[test]
    fn shutdown_unregisters_everything_once() {
        let registry = ResourceRegistry::new();
        let first = Counting::new("service", "first");
        let second = Counting::new("service", "second");

        registry.register(first.clone()).unwrap();
        registry.register(second.clone()).unwrap();

        registry.shutdown().unwrap();

        assert!(registry.is_empty());
        assert_eq!(first.unregistered.load(Ordering::SeqCst), 1);
        assert_eq!(second.unregistered.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn keys_lists_registered_entries() {
        let registry = ResourceRegistry::new();
        let resource = Resource::new("slow", "service", Metadata::new()).unwrap();
        let key = resource.key();

        registry.register(Arc::new(resource)).unwrap();

        assert_eq!(registry.keys(), vec![key]);
    }
}

/// Generic keyed store for one kind of GPU resource.
///
/// Every concrete resource kind (buffer, texture, shader, material, primitive,
/// font) lives in exactly one `ResourceManager`. Callers hold keys, never
/// references: a key of a deleted resource simply stops resolving.
///
/// Two key schemes exist:
/// - `u32`: auto-incremented on every `add`, starting at 1, never reused
/// - `String`: the resource's own name; adding a second resource with the
///   same name frees and replaces the first one

use std::fmt;
use std::hash::Hash;
use rustc_hash::FxHashMap;

use crate::graphics_device::GraphicsDevice;
use crate::{engine_debug, engine_trace};

// ===== RESOURCE TRAIT =====

/// A value whose lifetime is bound to device-side state
pub trait Resource {
    /// Resource name (used as key by name-keyed managers)
    fn name(&self) -> &str;

    /// Release device-side state. Must be safe to call twice.
    fn free(&mut self, device: &mut dyn GraphicsDevice);
}

// ===== KEY TRAIT =====

/// Key scheme of a manager
pub trait ResourceKey: Clone + Eq + Hash + fmt::Debug {
    /// Produce the key for a resource about to be added
    fn assign<T: Resource>(last_id: &mut u32, resource: &T) -> Self;
}

impl ResourceKey for u32 {
    fn assign<T: Resource>(last_id: &mut u32, _resource: &T) -> Self {
        *last_id += 1;
        *last_id
    }
}

impl ResourceKey for String {
    fn assign<T: Resource>(_last_id: &mut u32, resource: &T) -> Self {
        resource.name().to_string()
    }
}

// ===== MANAGED ENTRY =====

/// A stored resource together with the key it was stored under
struct ManagedEntry<T, K> {
    key: K,
    value: T,
}

// ===== RESOURCE MANAGER =====

pub struct ResourceManager<T: Resource, K: ResourceKey> {
    entries: FxHashMap<K, ManagedEntry<T, K>>,
    last_id: u32,
    /// Log source, e.g. "tse::TextureManager"
    source: &'static str,
}

impl<T: Resource, K: ResourceKey> ResourceManager<T, K> {
    /// Create an empty manager
    pub fn new(source: &'static str) -> Self {
        Self {
            entries: FxHashMap::default(),
            last_id: 0,
            source,
        }
    }

    /// Store a resource and return its key
    ///
    /// For name-keyed managers an existing entry with the same name is freed
    /// and replaced.
    pub fn add(&mut self, device: &mut dyn GraphicsDevice, value: T) -> K {
        let key = K::assign(&mut self.last_id, &value);
        let entry = ManagedEntry { key: key.clone(), value };

        if let Some(mut previous) = self.entries.insert(key.clone(), entry) {
            engine_debug!(self.source, "Replacing resource {:?}", previous.key);
            previous.value.free(device);
        }
        engine_trace!(self.source, "Added resource {:?}", key);
        key
    }

    /// Look a resource up. Never creates.
    pub fn find(&self, key: &K) -> Option<&T> {
        self.entries.get(key).map(|e| &e.value)
    }

    pub fn find_mut(&mut self, key: &K) -> Option<&mut T> {
        self.entries.get_mut(key).map(|e| &mut e.value)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Free a resource and drop its entry
    ///
    /// Returns false (and does nothing) when the key is unknown, which makes
    /// repeated deletes harmless.
    pub fn delete(&mut self, device: &mut dyn GraphicsDevice, key: &K) -> bool {
        match self.entries.remove(key) {
            Some(mut entry) => {
                entry.value.free(device);
                engine_trace!(self.source, "Deleted resource {:?}", entry.key);
                true
            }
            None => false,
        }
    }

    /// Free and drop every entry
    pub fn clear(&mut self, device: &mut dyn GraphicsDevice) {
        if !self.entries.is_empty() {
            engine_debug!(self.source, "Releasing {} resource(s)", self.entries.len());
        }
        for (_, mut entry) in self.entries.drain() {
            entry.value.free(device);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot of the live keys (unordered)
    pub fn keys(&self) -> Vec<K> {
        self.entries.values().map(|e| e.key.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &T)> {
        self.entries.values().map(|e| (&e.key, &e.value))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&K, &mut T)> {
        self.entries.values_mut().map(|e| (&e.key, &mut e.value))
    }
}

#[cfg(test)]
#[path = "resource_manager_tests.rs"]
mod tests;

//! Descriptor and converter caches
//!
//! Both caches are keyed by type identity and filled on first use. Entries are
//! never replaced once inserted, so every caller sees the same instance.
//!
//! # Concurrency
//!
//! Looking up an existing entry never takes a lock: entries live in a fixed
//! table of [`OnceCell`] slots that are written once and then only read. Only
//! the first use of a type synchronizes, and only on the slot it claims. A
//! registry holding more types than the table has slots keeps the rest in a
//! locked overflow map.

use crate::description::{AsnType, TypeDescription};
use asn_core::{AsnError, AsnResult};
use log::trace;
use once_cell::sync::{Lazy, OnceCell};
use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::collections::hash_map::{DefaultHasher, Entry};
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

type Shared = Arc<dyn Any + Send + Sync>;

/// Slots per table, more than the described types of a typical protocol
const SLOTS: usize = 256;

static GLOBAL: Lazy<Arc<Registry>> = Lazy::new(|| Arc::new(Registry::new()));

/// Insert-only map from type identity to a shared value
///
/// Open addressing with linear probing. Since slots are never cleared, a key
/// is always found before the first empty slot of its probe sequence.
struct TypeMap {
    slots: Box<[OnceCell<(TypeId, Shared)>]>,
    overflow: RwLock<HashMap<TypeId, Shared>>,
    len: AtomicUsize,
}

impl TypeMap {
    fn with_slots(slots: usize) -> Self {
        Self {
            slots: (0..slots).map(|_| OnceCell::new()).collect(),
            overflow: RwLock::new(HashMap::new()),
            len: AtomicUsize::new(0),
        }
    }

    fn probe(&self, key: TypeId) -> impl Iterator<Item = &OnceCell<(TypeId, Shared)>> {
        let slots = self.slots.len();
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        let start = (hasher.finish() as usize) % slots.max(1);
        (0..slots).map(move |i| &self.slots[(start + i) % slots])
    }

    fn get(&self, key: TypeId) -> Option<Shared> {
        for slot in self.probe(key) {
            match slot.get() {
                Some((stored, value)) if *stored == key => return Some(Arc::clone(value)),
                Some(_) => continue,
                None => return None,
            }
        }
        self.overflow
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .cloned()
    }

    /// Insert `value` unless `key` is present, returning the stored value
    fn insert(&self, key: TypeId, value: Shared) -> Shared {
        for slot in self.probe(key) {
            let mut claimed = false;
            let (stored, current) = slot.get_or_init(|| {
                claimed = true;
                (key, Arc::clone(&value))
            });
            if *stored == key {
                if claimed {
                    self.len.fetch_add(1, Ordering::Relaxed);
                }
                return Arc::clone(current);
            }
        }

        let mut overflow = self.overflow.write().unwrap_or_else(PoisonError::into_inner);
        match overflow.entry(key) {
            Entry::Occupied(entry) => Arc::clone(entry.get()),
            Entry::Vacant(entry) => {
                self.len.fetch_add(1, Ordering::Relaxed);
                Arc::clone(entry.insert(value))
            }
        }
    }

    fn len(&self) -> usize {
        self.len.load(Ordering::Relaxed)
    }
}

impl Default for TypeMap {
    fn default() -> Self {
        Self::with_slots(SLOTS)
    }
}

/// Look `V` up in `map`, building and inserting it when missing
///
/// `build` runs before the entry is claimed. When two threads race, the entry
/// inserted first wins and both return it.
fn get_or_build<V: Send + Sync + 'static>(
    map: &TypeMap,
    build: impl FnOnce() -> AsnResult<V>,
) -> AsnResult<Arc<V>> {
    let key = TypeId::of::<V>();

    let entry = match map.get(key) {
        Some(entry) => entry,
        None => {
            let built: Shared = Arc::new(build()?);
            trace!("Caching {}", type_name::<V>());
            map.insert(key, built)
        }
    };

    entry.downcast::<V>().map_err(|_| {
        AsnError::Configuration(format!("Cache entry is not a {}", type_name::<V>()))
    })
}

/// Shared converter instances, one per converter type
#[derive(Default)]
pub struct ConverterCache {
    converters: TypeMap,
}

impl ConverterCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The shared instance of converter `C`
    pub fn converter<C: Default + Send + Sync + 'static>(&self) -> AsnResult<Arc<C>> {
        get_or_build(&self.converters, || Ok(C::default()))
    }

    pub fn len(&self) -> usize {
        self.converters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Holds the descriptor tables of every described type and the converters
/// they use
///
/// Decoders and encoders share one registry; [`Registry::global`] is used
/// unless another one is given.
#[derive(Default)]
pub struct Registry {
    descriptions: TypeMap,
    converters: ConverterCache,
}

impl Registry {
    /// An empty registry, independent of the global one
    pub fn new() -> Self {
        Self::default()
    }

    /// The process wide registry
    pub fn global() -> Arc<Registry> {
        Arc::clone(&GLOBAL)
    }

    pub fn converters(&self) -> &ConverterCache {
        &self.converters
    }

    /// The descriptor table of `T`, built by [`AsnType::describe`] on first use
    pub fn description<T: AsnType>(&self) -> AsnResult<Arc<TypeDescription<T>>> {
        get_or_build(&self.descriptions, || T::describe(&self.converters))
    }

    /// Number of cached descriptor tables
    pub fn len(&self) -> usize {
        self.descriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("descriptions", &self.len())
            .field("converters", &self.converters.len())
            .finish()
    }
}

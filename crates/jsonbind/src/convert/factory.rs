//! The shared registry of compiled binding tables and container adapters.

use std::any::{Any, TypeId};
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;
use std::sync::Arc;

use ahash::AHashMap;
use bigdecimal::BigDecimal;
use parking_lot::RwLock;

use super::bindings::{take_host, BindingSet, BindingSetBuilder, Identity, NamingPolicy};
use super::capability::{AnyHost, TargetType};
use crate::error::ConversionError;

/// Erased access to one sequence container type (`Vec<V>`).
///
/// The function pointers are monomorphized per element type at registration;
/// no per-call allocation beyond the borrowed item list.
pub(crate) struct SequenceAdapter {
    pub(crate) element: TargetType,
    pub(crate) iter: for<'a> fn(&'a dyn AnyHost) -> Result<Vec<&'a dyn AnyHost>, ConversionError>,
    pub(crate) collect: fn(Vec<Option<Box<dyn AnyHost>>>) -> Result<Box<dyn AnyHost>, ConversionError>,
}

impl SequenceAdapter {
    fn of<V: Any>() -> Self {
        SequenceAdapter {
            element: TargetType::of::<V>(),
            iter: sequence_iter::<V>,
            collect: sequence_collect::<V>,
        }
    }
}

fn sequence_iter<V: Any>(host: &dyn AnyHost) -> Result<Vec<&dyn AnyHost>, ConversionError> {
    let found = host.type_name();
    let items = host
        .as_any()
        .downcast_ref::<Vec<V>>()
        .ok_or_else(|| ConversionError::type_mismatch(std::any::type_name::<Vec<V>>(), found))?;
    Ok(items.iter().map(|item| item as &dyn AnyHost).collect())
}

fn sequence_collect<V: Any>(
    items: Vec<Option<Box<dyn AnyHost>>>,
) -> Result<Box<dyn AnyHost>, ConversionError> {
    let mut out: Vec<V> = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Some(value) => out.push(take_host::<V>(value)?),
            None => return Err(ConversionError::null_not_allowed(std::any::type_name::<V>())),
        }
    }
    Ok(Box::new(out))
}

/// Erased access to one map container type (`HashMap<K, V>` or
/// `BTreeMap<K, V>`).
pub(crate) struct MapAdapter {
    pub(crate) key: TargetType,
    pub(crate) value: TargetType,
    pub(crate) iter: for<'a> fn(
        &'a dyn AnyHost,
    )
        -> Result<Vec<(&'a dyn AnyHost, &'a dyn AnyHost)>, ConversionError>,
    pub(crate) collect:
        fn(Vec<(Box<dyn AnyHost>, Box<dyn AnyHost>)>) -> Result<Box<dyn AnyHost>, ConversionError>,
}

fn hash_map_iter<K: Any + Eq + Hash, V: Any>(
    host: &dyn AnyHost,
) -> Result<Vec<(&dyn AnyHost, &dyn AnyHost)>, ConversionError> {
    let found = host.type_name();
    let map = host
        .as_any()
        .downcast_ref::<HashMap<K, V>>()
        .ok_or_else(|| {
            ConversionError::type_mismatch(std::any::type_name::<HashMap<K, V>>(), found)
        })?;
    Ok(map
        .iter()
        .map(|(k, v)| (k as &dyn AnyHost, v as &dyn AnyHost))
        .collect())
}

fn hash_map_collect<K: Any + Eq + Hash, V: Any>(
    entries: Vec<(Box<dyn AnyHost>, Box<dyn AnyHost>)>,
) -> Result<Box<dyn AnyHost>, ConversionError> {
    let mut out: HashMap<K, V> = HashMap::with_capacity(entries.len());
    for (key, value) in entries {
        out.insert(take_host::<K>(key)?, take_host::<V>(value)?);
    }
    Ok(Box::new(out))
}

fn btree_map_iter<K: Any + Ord, V: Any>(
    host: &dyn AnyHost,
) -> Result<Vec<(&dyn AnyHost, &dyn AnyHost)>, ConversionError> {
    let found = host.type_name();
    let map = host
        .as_any()
        .downcast_ref::<BTreeMap<K, V>>()
        .ok_or_else(|| {
            ConversionError::type_mismatch(std::any::type_name::<BTreeMap<K, V>>(), found)
        })?;
    Ok(map
        .iter()
        .map(|(k, v)| (k as &dyn AnyHost, v as &dyn AnyHost))
        .collect())
}

fn btree_map_collect<K: Any + Ord, V: Any>(
    entries: Vec<(Box<dyn AnyHost>, Box<dyn AnyHost>)>,
) -> Result<Box<dyn AnyHost>, ConversionError> {
    let mut out: BTreeMap<K, V> = BTreeMap::new();
    for (key, value) in entries {
        out.insert(take_host::<K>(key)?, take_host::<V>(value)?);
    }
    Ok(Box::new(out))
}

/// Thread-safe registry of compiled [`BindingSet`]s plus sequence and map
/// container adapters, keyed by `TypeId`.
///
/// Registration normally happens once at startup; lookups take a read lock
/// only.
pub struct BindingFactory {
    policy: Arc<dyn NamingPolicy>,
    sets: RwLock<AHashMap<TypeId, Arc<BindingSet>>>,
    sequences: RwLock<AHashMap<TypeId, Arc<SequenceAdapter>>>,
    maps: RwLock<AHashMap<TypeId, Arc<MapAdapter>>>,
}

impl Default for BindingFactory {
    fn default() -> Self {
        BindingFactory::new()
    }
}

impl BindingFactory {
    /// A factory with the identity naming policy and the primitive sequence
    /// adapters pre-registered.
    #[must_use]
    pub fn new() -> Self {
        BindingFactory::with_naming(Arc::new(Identity))
    }

    #[must_use]
    pub fn with_naming(policy: Arc<dyn NamingPolicy>) -> Self {
        let factory = BindingFactory {
            policy,
            sets: RwLock::new(AHashMap::new()),
            sequences: RwLock::new(AHashMap::new()),
            maps: RwLock::new(AHashMap::new()),
        };
        factory.register_sequence::<String>();
        factory.register_sequence::<bool>();
        factory.register_sequence::<i64>();
        factory.register_sequence::<f64>();
        factory.register_sequence::<BigDecimal>();
        factory
    }

    /// Compile and cache the binding table for `T`, and make `Vec<T>`
    /// convertible alongside it.
    pub fn register<T, F>(&self, label: &'static str, configure: F)
    where
        T: Any,
        F: FnOnce(BindingSetBuilder<T>) -> BindingSetBuilder<T>,
    {
        let builder = BindingSetBuilder::new(Arc::clone(&self.policy));
        let set = configure(builder).build(label);
        self.sets.write().insert(TypeId::of::<T>(), Arc::new(set));
        self.register_sequence::<T>();
    }

    pub fn register_sequence<V: Any>(&self) {
        self.sequences
            .write()
            .insert(TypeId::of::<Vec<V>>(), Arc::new(SequenceAdapter::of::<V>()));
    }

    /// Make `HashMap<K, V>` and `BTreeMap<K, V>` convertible.
    pub fn register_map<K, V>(&self)
    where
        K: Any + Eq + Hash + Ord,
        V: Any,
    {
        let mut maps = self.maps.write();
        maps.insert(
            TypeId::of::<HashMap<K, V>>(),
            Arc::new(MapAdapter {
                key: TargetType::of::<K>(),
                value: TargetType::of::<V>(),
                iter: hash_map_iter::<K, V>,
                collect: hash_map_collect::<K, V>,
            }),
        );
        maps.insert(
            TypeId::of::<BTreeMap<K, V>>(),
            Arc::new(MapAdapter {
                key: TargetType::of::<K>(),
                value: TargetType::of::<V>(),
                iter: btree_map_iter::<K, V>,
                collect: btree_map_collect::<K, V>,
            }),
        );
    }

    #[must_use]
    pub fn contains(&self, id: TypeId) -> bool {
        self.sets.read().contains_key(&id)
    }

    #[must_use]
    pub fn lookup(&self, id: TypeId) -> Option<Arc<BindingSet>> {
        self.sets.read().get(&id).cloned()
    }

    pub(crate) fn sequence(&self, id: TypeId) -> Option<Arc<SequenceAdapter>> {
        self.sequences.read().get(&id).cloned()
    }

    pub(crate) fn map_adapter(&self, id: TypeId) -> Option<Arc<MapAdapter>> {
        self.maps.read().get(&id).cloned()
    }
}

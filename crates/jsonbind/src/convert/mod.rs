//! Conversion between [`Value`] trees and host object graphs.
//!
//! The engine is a chain of responsibility: a [`ConversionContext`] owns
//! ordered lists of [`Serializer`], [`Deserializer`], [`Instantiator`] and
//! [`KeyConverter`] capabilities and consults each list in registration
//! order until one claims the input. Registration order is semantically
//! load-bearing: the null handler must run before the compiled fallback,
//! which claims every registered non-null value.
//!
//! A context is built once and shared freely across threads; all per-call
//! state (the cycle-visited set) lives in a [`ConversionScope`] allocated
//! fresh for every top-level call and threaded through the recursion as an
//! explicit parameter.

mod bindings;
mod capability;
mod defaults;
mod factory;

use std::any::{Any, TypeId};
use std::sync::Arc;

use ahash::AHashSet;
use jsonbind_value::Value;

pub use bindings::{
    BindingSet, BindingSetBuilder, CamelCase, CompiledBinding, Identity, NamingPolicy,
};
pub use capability::{
    AnyHost, Capability, Deserializer, Instantiator, KeyConverter, Serializer, TargetType,
};
pub use defaults::{
    BooleanCapability, CompiledCapability, DateCapability, DefaultInstantiator,
    DefaultKeyConverter, MapCapability, NullCapability, NumberCapability, SequenceCapability,
    StringCapability, ValueTreeCapability, ValueView, ValueViewCapability,
};
pub use factory::BindingFactory;

use crate::error::ConversionError;

/// Per-top-level-call conversion state: the identity set of host values
/// currently being serialized along the ownership path.
///
/// Never stored on the shared context; allocated by each top-level call and
/// passed down by `&mut`, so one context serves concurrent conversions.
#[derive(Debug, Default)]
pub struct ConversionScope {
    visiting: AHashSet<usize>,
}

impl ConversionScope {
    #[must_use]
    pub fn new() -> Self {
        ConversionScope::default()
    }

    /// Mark a host identity as in progress. Returns `false` when the
    /// identity is already on the current path.
    pub fn enter(&mut self, identity: usize) -> bool {
        self.visiting.insert(identity)
    }

    pub fn leave(&mut self, identity: usize) {
        self.visiting.remove(&identity);
    }
}

/// Ordered capability chains plus the two global conversion policies.
///
/// Immutable once built; intended to be constructed once at startup and
/// reused across many conversion calls.
pub struct ConversionContext {
    serializers: Vec<Arc<dyn Capability>>,
    deserializers: Vec<Arc<dyn Capability>>,
    instantiators: Vec<Arc<dyn Capability>>,
    key_converters: Vec<Arc<dyn Capability>>,
    bindings: Arc<BindingFactory>,
    stop_at_cycles: bool,
    skip_null_values: bool,
}

impl ConversionContext {
    #[must_use]
    pub fn builder() -> ConversionContextBuilder {
        ConversionContextBuilder::new()
    }

    /// Whether serialization short-circuits values already on the current
    /// ownership path instead of recursing without bound.
    #[must_use]
    pub fn stop_at_cycles(&self) -> bool {
        self.stop_at_cycles
    }

    /// Whether null-valued properties are omitted instead of written.
    #[must_use]
    pub fn skip_null_values(&self) -> bool {
        self.skip_null_values
    }

    /// The compiled property-binding tables backing the generic fallback.
    #[must_use]
    pub fn bindings(&self) -> &BindingFactory {
        &self.bindings
    }

    /// Serialize a host value into a [`Value`] tree.
    ///
    /// # Errors
    ///
    /// Fails when no serializer in the chain claims the value or a claiming
    /// capability fails.
    pub fn serialize<T: Any>(&self, value: &T) -> Result<Value, ConversionError> {
        let mut scope = ConversionScope::new();
        self.serialize_erased(Some(value), &mut scope)
    }

    /// Serialize the host null.
    ///
    /// # Errors
    ///
    /// Fails when no serializer claims the null value, which only happens
    /// on a chain without the default null handler.
    pub fn serialize_null(&self) -> Result<Value, ConversionError> {
        let mut scope = ConversionScope::new();
        self.serialize_erased(None, &mut scope)
    }

    /// Walk the serializer chain in registration order; the first claiming
    /// capability performs the conversion.
    ///
    /// # Errors
    ///
    /// Fails when no capability claims the value.
    pub fn serialize_erased(
        &self,
        host: Option<&dyn AnyHost>,
        scope: &mut ConversionScope,
    ) -> Result<Value, ConversionError> {
        for capability in &self.serializers {
            if let Some(serializer) = capability.as_serializer() {
                if serializer.can_serialize(self, host) {
                    return serializer.serialize(self, scope, host);
                }
            }
        }
        Err(ConversionError::no_serializer(
            host.map_or("null", AnyHost::type_name),
        ))
    }

    /// Deserialize a [`Value`] tree into a host value.
    ///
    /// # Errors
    ///
    /// Fails when no deserializer claims the (type, value) pair, when the
    /// target cannot be instantiated, or when the value is null (a concrete
    /// `T` cannot hold the null result).
    pub fn deserialize<T: Any>(&self, value: &Value) -> Result<T, ConversionError> {
        let mut scope = ConversionScope::new();
        let target = TargetType::of::<T>();
        match self.deserialize_erased(target, value, &mut scope)? {
            Some(host) => {
                let found = host.type_name();
                host.into_any()
                    .downcast::<T>()
                    .map(|boxed| *boxed)
                    .map_err(|_| ConversionError::type_mismatch(target.name(), found))
            }
            None => Err(ConversionError::null_not_allowed(target.name())),
        }
    }

    /// Walk the deserializer chain; `Ok(None)` is the null result.
    ///
    /// # Errors
    ///
    /// Fails when no capability claims the pair.
    pub fn deserialize_erased(
        &self,
        target: TargetType,
        value: &Value,
        scope: &mut ConversionScope,
    ) -> Result<Option<Box<dyn AnyHost>>, ConversionError> {
        for capability in &self.deserializers {
            if let Some(deserializer) = capability.as_deserializer() {
                if deserializer.can_deserialize(self, target, value) {
                    return deserializer.deserialize(self, scope, target, value);
                }
            }
        }
        Err(ConversionError::no_deserializer(target.name()))
    }

    /// Obtain a blank target instance from the instantiator chain.
    ///
    /// # Errors
    ///
    /// Fails when no instantiator claims the target type.
    pub fn new_instance(&self, target: TargetType) -> Result<Box<dyn AnyHost>, ConversionError> {
        for capability in &self.instantiators {
            if let Some(instantiator) = capability.as_instantiator() {
                if instantiator.can_instantiate(self, target) {
                    return instantiator.new_instance(self, target);
                }
            }
        }
        Err(ConversionError::cannot_instantiate(target.name()))
    }

    #[must_use]
    pub fn can_instantiate(&self, target: TargetType) -> bool {
        self.instantiators.iter().any(|capability| {
            capability
                .as_instantiator()
                .is_some_and(|instantiator| instantiator.can_instantiate(self, target))
        })
    }

    /// Derive a JSON member name from a host map key.
    ///
    /// # Errors
    ///
    /// Fails when no key converter claims the key type.
    pub fn member_name_for_key(&self, key: &dyn AnyHost) -> Result<String, ConversionError> {
        for capability in &self.key_converters {
            if let Some(converter) = capability.as_key_converter() {
                if converter.can_make_member_name(self, key) {
                    return converter.member_name(self, key);
                }
            }
        }
        Err(ConversionError::no_member_name_for_key(key.type_name()))
    }

    #[must_use]
    pub fn can_make_member_name(&self, key: &dyn AnyHost) -> bool {
        self.key_converters.iter().any(|capability| {
            capability
                .as_key_converter()
                .is_some_and(|converter| converter.can_make_member_name(self, key))
        })
    }

    /// Rebuild a host map key from a JSON member name.
    ///
    /// # Errors
    ///
    /// Fails when no key converter claims the target key type or the name
    /// does not parse as that type.
    pub fn map_key(
        &self,
        target: TargetType,
        name: &str,
    ) -> Result<Box<dyn AnyHost>, ConversionError> {
        for capability in &self.key_converters {
            if let Some(converter) = capability.as_key_converter() {
                if converter.can_make_map_key(self, target, name) {
                    return converter.map_key(self, target, name);
                }
            }
        }
        Err(ConversionError::invalid_key(target.name(), name))
    }

    #[must_use]
    pub fn can_make_map_key(&self, target: TargetType, name: &str) -> bool {
        self.key_converters.iter().any(|capability| {
            capability
                .as_key_converter()
                .is_some_and(|converter| converter.can_make_map_key(self, target, name))
        })
    }
}

/// Accumulates capabilities in registration order and the two policies.
///
/// A single object may implement several capabilities; it is tested against
/// each capability list independently at build time.
pub struct ConversionContextBuilder {
    capabilities: Vec<Arc<dyn Capability>>,
    bindings: Arc<BindingFactory>,
    stop_at_cycles: bool,
    skip_null_values: bool,
}

impl Default for ConversionContextBuilder {
    fn default() -> Self {
        ConversionContextBuilder::new()
    }
}

impl ConversionContextBuilder {
    #[must_use]
    pub fn new() -> Self {
        ConversionContextBuilder {
            capabilities: Vec::new(),
            bindings: Arc::new(BindingFactory::new()),
            stop_at_cycles: false,
            skip_null_values: false,
        }
    }

    /// Append a capability. Earlier registrations win: chains are walked in
    /// registration order and the first claiming capability is used.
    #[must_use]
    pub fn register(mut self, capability: Arc<dyn Capability>) -> Self {
        self.capabilities.push(capability);
        self
    }

    #[must_use]
    pub fn stop_at_cycles(mut self, enabled: bool) -> Self {
        self.stop_at_cycles = enabled;
        self
    }

    #[must_use]
    pub fn skip_null_values(mut self, enabled: bool) -> Self {
        self.skip_null_values = enabled;
        self
    }

    /// Use the given compiled-binding tables for the generic fallback.
    #[must_use]
    pub fn bindings(mut self, factory: Arc<BindingFactory>) -> Self {
        self.bindings = factory;
        self
    }

    /// Register the built-in capabilities.
    ///
    /// Order matters: null handling comes first (the only capability allowed
    /// to claim a host null), the compiled reflective fallback last (it
    /// claims every registered non-null value).
    #[must_use]
    pub fn install_defaults(self) -> Self {
        self.register(Arc::new(NullCapability))
            .register(Arc::new(ValueTreeCapability))
            .register(Arc::new(DateCapability))
            .register(Arc::new(BooleanCapability))
            .register(Arc::new(NumberCapability))
            .register(Arc::new(StringCapability))
            .register(Arc::new(SequenceCapability))
            .register(Arc::new(MapCapability))
            .register(Arc::new(CompiledCapability))
            .register(Arc::new(DefaultInstantiator))
            .register(Arc::new(DefaultKeyConverter))
    }

    #[must_use]
    pub fn build(self) -> ConversionContext {
        let mut serializers = Vec::new();
        let mut deserializers = Vec::new();
        let mut instantiators = Vec::new();
        let mut key_converters = Vec::new();
        for capability in self.capabilities {
            if capability.as_serializer().is_some() {
                serializers.push(Arc::clone(&capability));
            }
            if capability.as_deserializer().is_some() {
                deserializers.push(Arc::clone(&capability));
            }
            if capability.as_instantiator().is_some() {
                instantiators.push(Arc::clone(&capability));
            }
            if capability.as_key_converter().is_some() {
                key_converters.push(Arc::clone(&capability));
            }
        }
        ConversionContext {
            serializers,
            deserializers,
            instantiators,
            key_converters,
            bindings: self.bindings,
            stop_at_cycles: self.stop_at_cycles,
            skip_null_values: self.skip_null_values,
        }
    }
}

pub(crate) fn host_identity(host: &dyn AnyHost) -> usize {
    std::ptr::from_ref(host).cast::<()>() as usize
}

pub(crate) fn type_id_of(host: &dyn AnyHost) -> TypeId {
    host.as_any().type_id()
}

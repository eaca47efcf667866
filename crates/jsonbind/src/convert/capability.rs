//! Capability contracts consulted by the conversion chains.

use std::any::{Any, TypeId};

use jsonbind_value::Value;

use crate::error::ConversionError;

use super::{ConversionContext, ConversionScope};

/// A type-erased host value that keeps its type name for diagnostics.
///
/// Blanket-implemented for every `'static` type; this is the registration
/// surface that replaces runtime type introspection.
pub trait AnyHost: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
    fn type_name(&self) -> &'static str;
}

impl<T: Any> AnyHost for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

/// An erased handle to a deserialization target type.
#[derive(Debug, Clone, Copy)]
pub struct TargetType {
    id: TypeId,
    name: &'static str,
}

impl TargetType {
    #[must_use]
    pub fn of<T: Any>() -> Self {
        TargetType {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    #[must_use]
    pub fn id(&self) -> TypeId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn is<T: Any>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for TargetType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TargetType {}

impl std::hash::Hash for TargetType {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Converts host values into [`Value`] trees.
pub trait Serializer: Send + Sync {
    /// Whether this capability claims the host value (`None` is the host
    /// null).
    fn can_serialize(&self, ctx: &ConversionContext, host: Option<&dyn AnyHost>) -> bool;

    /// Perform the conversion. Recursive conversions go back through
    /// [`ConversionContext::serialize_erased`] with the same scope.
    ///
    /// # Errors
    ///
    /// Implementations fail when the claimed value cannot be converted.
    fn serialize(
        &self,
        ctx: &ConversionContext,
        scope: &mut ConversionScope,
        host: Option<&dyn AnyHost>,
    ) -> Result<Value, ConversionError>;
}

/// Converts [`Value`] trees into host values.
pub trait Deserializer: Send + Sync {
    fn can_deserialize(&self, ctx: &ConversionContext, target: TargetType, value: &Value) -> bool;

    /// Perform the conversion; `Ok(None)` is the null result.
    ///
    /// # Errors
    ///
    /// Implementations fail when the claimed pair cannot be converted.
    fn deserialize(
        &self,
        ctx: &ConversionContext,
        scope: &mut ConversionScope,
        target: TargetType,
        value: &Value,
    ) -> Result<Option<Box<dyn AnyHost>>, ConversionError>;
}

/// Produces blank target instances prior to population.
pub trait Instantiator: Send + Sync {
    fn can_instantiate(&self, ctx: &ConversionContext, target: TargetType) -> bool;

    /// # Errors
    ///
    /// Implementations fail when construction of the claimed type fails.
    fn new_instance(
        &self,
        ctx: &ConversionContext,
        target: TargetType,
    ) -> Result<Box<dyn AnyHost>, ConversionError>;
}

/// Round-trips host map keys through textual JSON member names.
pub trait KeyConverter: Send + Sync {
    fn can_make_member_name(&self, ctx: &ConversionContext, key: &dyn AnyHost) -> bool;

    /// # Errors
    ///
    /// Implementations fail when the claimed key cannot be rendered.
    fn member_name(
        &self,
        ctx: &ConversionContext,
        key: &dyn AnyHost,
    ) -> Result<String, ConversionError>;

    fn can_make_map_key(&self, ctx: &ConversionContext, target: TargetType, name: &str) -> bool;

    /// # Errors
    ///
    /// Implementations fail when the name does not parse as the claimed key
    /// type.
    fn map_key(
        &self,
        ctx: &ConversionContext,
        target: TargetType,
        name: &str,
    ) -> Result<Box<dyn AnyHost>, ConversionError>;
}

/// Umbrella trait for registration.
///
/// One object may answer several capability roles; the builder tests each
/// accessor independently and files the object into every chain it answers.
pub trait Capability: Send + Sync {
    fn as_serializer(&self) -> Option<&dyn Serializer> {
        None
    }

    fn as_deserializer(&self) -> Option<&dyn Deserializer> {
        None
    }

    fn as_instantiator(&self) -> Option<&dyn Instantiator> {
        None
    }

    fn as_key_converter(&self) -> Option<&dyn KeyConverter> {
        None
    }
}

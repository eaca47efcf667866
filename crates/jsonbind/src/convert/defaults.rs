//! The built-in capability set installed by
//! [`ConversionContextBuilder::install_defaults`](super::ConversionContextBuilder::install_defaults).
//!
//! Each capability claims a narrow shape of input; the compiled fallback at
//! the end of the chain covers every type registered with the
//! [`BindingFactory`](super::BindingFactory).

use std::any::Any;
use std::marker::PhantomData;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use jsonbind_value::{Object, Value};
use num_traits::{FromPrimitive, ToPrimitive};

use super::bindings::expect_host;
use super::capability::{
    AnyHost, Capability, Deserializer, Instantiator, KeyConverter, Serializer, TargetType,
};
use super::{type_id_of, ConversionContext, ConversionScope};
use crate::error::ConversionError;

fn require_host(host: Option<&dyn AnyHost>) -> Result<&dyn AnyHost, ConversionError> {
    host.ok_or_else(|| ConversionError::no_serializer("null"))
}

/// Maps the host null to JSON null in both directions. Must sit first in the
/// chain: it is the only capability allowed to claim a host null.
pub struct NullCapability;

impl Serializer for NullCapability {
    fn can_serialize(&self, _ctx: &ConversionContext, host: Option<&dyn AnyHost>) -> bool {
        host.is_none()
    }

    fn serialize(
        &self,
        _ctx: &ConversionContext,
        _scope: &mut ConversionScope,
        _host: Option<&dyn AnyHost>,
    ) -> Result<Value, ConversionError> {
        Ok(Value::Null)
    }
}

impl Deserializer for NullCapability {
    fn can_deserialize(&self, _ctx: &ConversionContext, target: TargetType, value: &Value) -> bool {
        // A raw `Value` target is the one type that can hold null itself;
        // leave it to the value-tree passthrough.
        value.is_null() && !target.is::<Value>()
    }

    fn deserialize(
        &self,
        _ctx: &ConversionContext,
        _scope: &mut ConversionScope,
        _target: TargetType,
        _value: &Value,
    ) -> Result<Option<Box<dyn AnyHost>>, ConversionError> {
        Ok(None)
    }
}

impl Capability for NullCapability {
    fn as_serializer(&self) -> Option<&dyn Serializer> {
        Some(self)
    }

    fn as_deserializer(&self) -> Option<&dyn Deserializer> {
        Some(self)
    }
}

/// Passes [`Value`] hosts through unchanged, so a conversion target may keep
/// part of the document as a raw tree.
pub struct ValueTreeCapability;

impl Serializer for ValueTreeCapability {
    fn can_serialize(&self, _ctx: &ConversionContext, host: Option<&dyn AnyHost>) -> bool {
        host.is_some_and(|host| host.as_any().is::<Value>())
    }

    fn serialize(
        &self,
        _ctx: &ConversionContext,
        _scope: &mut ConversionScope,
        host: Option<&dyn AnyHost>,
    ) -> Result<Value, ConversionError> {
        expect_host::<Value>(require_host(host)?).cloned()
    }
}

impl Deserializer for ValueTreeCapability {
    fn can_deserialize(&self, _ctx: &ConversionContext, target: TargetType, _value: &Value) -> bool {
        target.is::<Value>()
    }

    fn deserialize(
        &self,
        _ctx: &ConversionContext,
        _scope: &mut ConversionScope,
        _target: TargetType,
        value: &Value,
    ) -> Result<Option<Box<dyn AnyHost>>, ConversionError> {
        Ok(Some(Box::new(value.clone())))
    }
}

impl Capability for ValueTreeCapability {
    fn as_serializer(&self) -> Option<&dyn Serializer> {
        Some(self)
    }

    fn as_deserializer(&self) -> Option<&dyn Deserializer> {
        Some(self)
    }
}

/// A host type that converts itself to and from a [`Value`] tree.
///
/// The typed counterpart of [`ValueTreeCapability`]: implement this for
/// wrapper types that interpret a document lazily instead of binding every
/// member to a slot.
pub trait ValueView: Any + Sized {
    /// # Errors
    ///
    /// Fails when the tree does not have the shape the view requires.
    fn from_value(value: Value) -> Result<Self, ConversionError>;

    fn to_value(&self) -> Value;
}

/// Bridges one [`ValueView`] implementor into the capability chains.
pub struct ValueViewCapability<T> {
    marker: PhantomData<fn() -> T>,
}

impl<T> ValueViewCapability<T> {
    #[must_use]
    pub fn new() -> Self {
        ValueViewCapability {
            marker: PhantomData,
        }
    }
}

impl<T> Default for ValueViewCapability<T> {
    fn default() -> Self {
        ValueViewCapability::new()
    }
}

impl<T: ValueView> Serializer for ValueViewCapability<T> {
    fn can_serialize(&self, _ctx: &ConversionContext, host: Option<&dyn AnyHost>) -> bool {
        host.is_some_and(|host| host.as_any().is::<T>())
    }

    fn serialize(
        &self,
        _ctx: &ConversionContext,
        _scope: &mut ConversionScope,
        host: Option<&dyn AnyHost>,
    ) -> Result<Value, ConversionError> {
        Ok(expect_host::<T>(require_host(host)?)?.to_value())
    }
}

impl<T: ValueView> Deserializer for ValueViewCapability<T> {
    fn can_deserialize(&self, _ctx: &ConversionContext, target: TargetType, _value: &Value) -> bool {
        target.is::<T>()
    }

    fn deserialize(
        &self,
        _ctx: &ConversionContext,
        _scope: &mut ConversionScope,
        _target: TargetType,
        value: &Value,
    ) -> Result<Option<Box<dyn AnyHost>>, ConversionError> {
        T::from_value(value.clone()).map(|view| Some(Box::new(view) as Box<dyn AnyHost>))
    }
}

impl<T: ValueView> Capability for ValueViewCapability<T> {
    fn as_serializer(&self) -> Option<&dyn Serializer> {
        Some(self)
    }

    fn as_deserializer(&self) -> Option<&dyn Deserializer> {
        Some(self)
    }
}

/// Timestamps as RFC 3339 strings, accepting epoch milliseconds on input.
pub struct DateCapability;

impl Serializer for DateCapability {
    fn can_serialize(&self, _ctx: &ConversionContext, host: Option<&dyn AnyHost>) -> bool {
        host.is_some_and(|host| host.as_any().is::<DateTime<Utc>>())
    }

    fn serialize(
        &self,
        _ctx: &ConversionContext,
        _scope: &mut ConversionScope,
        host: Option<&dyn AnyHost>,
    ) -> Result<Value, ConversionError> {
        let timestamp = expect_host::<DateTime<Utc>>(require_host(host)?)?;
        Ok(Value::String(timestamp.to_rfc3339()))
    }
}

impl Deserializer for DateCapability {
    fn can_deserialize(&self, _ctx: &ConversionContext, target: TargetType, value: &Value) -> bool {
        target.is::<DateTime<Utc>>()
            && matches!(value, Value::String(_) | Value::Number(_))
    }

    fn deserialize(
        &self,
        _ctx: &ConversionContext,
        _scope: &mut ConversionScope,
        _target: TargetType,
        value: &Value,
    ) -> Result<Option<Box<dyn AnyHost>>, ConversionError> {
        let timestamp = match value {
            Value::String(text) => DateTime::parse_from_rfc3339(text)
                .map(|parsed| parsed.with_timezone(&Utc))
                .map_err(|error| ConversionError::invalid_date(error.to_string()))?,
            Value::Number(number) => number
                .to_i64()
                .and_then(DateTime::from_timestamp_millis)
                .ok_or_else(|| {
                    ConversionError::invalid_date(format!(
                        "{number} is not a valid epoch-millisecond timestamp"
                    ))
                })?,
            _ => {
                return Err(ConversionError::invalid_date(
                    "expected a string or a number".to_owned(),
                ))
            }
        };
        Ok(Some(Box::new(timestamp)))
    }
}

impl Capability for DateCapability {
    fn as_serializer(&self) -> Option<&dyn Serializer> {
        Some(self)
    }

    fn as_deserializer(&self) -> Option<&dyn Deserializer> {
        Some(self)
    }
}

pub struct BooleanCapability;

impl Serializer for BooleanCapability {
    fn can_serialize(&self, _ctx: &ConversionContext, host: Option<&dyn AnyHost>) -> bool {
        host.is_some_and(|host| host.as_any().is::<bool>())
    }

    fn serialize(
        &self,
        _ctx: &ConversionContext,
        _scope: &mut ConversionScope,
        host: Option<&dyn AnyHost>,
    ) -> Result<Value, ConversionError> {
        Ok(Value::Bool(*expect_host::<bool>(require_host(host)?)?))
    }
}

impl Deserializer for BooleanCapability {
    fn can_deserialize(&self, _ctx: &ConversionContext, target: TargetType, value: &Value) -> bool {
        target.is::<bool>() && matches!(value, Value::Bool(_))
    }

    fn deserialize(
        &self,
        _ctx: &ConversionContext,
        _scope: &mut ConversionScope,
        target: TargetType,
        value: &Value,
    ) -> Result<Option<Box<dyn AnyHost>>, ConversionError> {
        match value {
            Value::Bool(flag) => Ok(Some(Box::new(*flag))),
            other => Err(ConversionError::type_mismatch(
                target.name(),
                value_kind(other),
            )),
        }
    }
}

impl Capability for BooleanCapability {
    fn as_serializer(&self) -> Option<&dyn Serializer> {
        Some(self)
    }

    fn as_deserializer(&self) -> Option<&dyn Deserializer> {
        Some(self)
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

macro_rules! numeric_targets {
    ($macro:ident) => {
        $macro!(i8, i16, i32, i64, u8, u16, u32, u64, f64)
    };
}

fn is_numeric(any: &dyn Any) -> bool {
    macro_rules! check {
        ($($ty:ty),*) => { any.is::<BigDecimal>() $( || any.is::<$ty>() )* };
    }
    numeric_targets!(check)
}

fn is_numeric_target(target: TargetType) -> bool {
    macro_rules! check {
        ($($ty:ty),*) => { target.is::<BigDecimal>() $( || target.is::<$ty>() )* };
    }
    numeric_targets!(check)
}

fn host_decimal(any: &dyn Any) -> Result<BigDecimal, ConversionError> {
    if let Some(number) = any.downcast_ref::<BigDecimal>() {
        return Ok(number.clone());
    }
    macro_rules! from_int {
        ($($ty:ty),*) => {
            $(
                if let Some(number) = any.downcast_ref::<$ty>() {
                    return Ok(BigDecimal::from(*number));
                }
            )*
        };
    }
    from_int!(i8, i16, i32, i64, u8, u16, u32, u64);
    if let Some(number) = any.downcast_ref::<f64>() {
        return BigDecimal::from_f64(*number)
            .ok_or_else(|| ConversionError::number_out_of_range("f64"));
    }
    Err(ConversionError::no_serializer("non-numeric host"))
}

/// Arbitrary-precision numbers plus every primitive numeric type.
///
/// Non-finite floats fail with a range error rather than producing a token
/// JSON cannot represent.
pub struct NumberCapability;

impl Serializer for NumberCapability {
    fn can_serialize(&self, _ctx: &ConversionContext, host: Option<&dyn AnyHost>) -> bool {
        host.is_some_and(|host| is_numeric(host.as_any()))
    }

    fn serialize(
        &self,
        _ctx: &ConversionContext,
        _scope: &mut ConversionScope,
        host: Option<&dyn AnyHost>,
    ) -> Result<Value, ConversionError> {
        host_decimal(require_host(host)?.as_any()).map(Value::Number)
    }
}

impl Deserializer for NumberCapability {
    fn can_deserialize(&self, _ctx: &ConversionContext, target: TargetType, value: &Value) -> bool {
        is_numeric_target(target) && matches!(value, Value::Number(_))
    }

    fn deserialize(
        &self,
        _ctx: &ConversionContext,
        _scope: &mut ConversionScope,
        target: TargetType,
        value: &Value,
    ) -> Result<Option<Box<dyn AnyHost>>, ConversionError> {
        let Value::Number(number) = value else {
            return Err(ConversionError::type_mismatch(
                target.name(),
                value_kind(value),
            ));
        };
        if target.is::<BigDecimal>() {
            return Ok(Some(Box::new(number.clone())));
        }
        macro_rules! narrow {
            ($($ty:ty => $method:ident),* $(,)?) => {
                $(
                    if target.is::<$ty>() {
                        return number
                            .$method()
                            .map(|narrowed| Some(Box::new(narrowed) as Box<dyn AnyHost>))
                            .ok_or_else(|| ConversionError::number_out_of_range(target.name()));
                    }
                )*
            };
        }
        narrow!(
            i8 => to_i8,
            i16 => to_i16,
            i32 => to_i32,
            i64 => to_i64,
            u8 => to_u8,
            u16 => to_u16,
            u32 => to_u32,
            u64 => to_u64,
            f64 => to_f64,
        );
        Err(ConversionError::no_deserializer(target.name()))
    }
}

impl Capability for NumberCapability {
    fn as_serializer(&self) -> Option<&dyn Serializer> {
        Some(self)
    }

    fn as_deserializer(&self) -> Option<&dyn Deserializer> {
        Some(self)
    }
}

/// Strings and single characters.
pub struct StringCapability;

impl Serializer for StringCapability {
    fn can_serialize(&self, _ctx: &ConversionContext, host: Option<&dyn AnyHost>) -> bool {
        host.is_some_and(|host| {
            let any = host.as_any();
            any.is::<String>() || any.is::<&'static str>() || any.is::<char>()
        })
    }

    fn serialize(
        &self,
        _ctx: &ConversionContext,
        _scope: &mut ConversionScope,
        host: Option<&dyn AnyHost>,
    ) -> Result<Value, ConversionError> {
        let any = require_host(host)?.as_any();
        if let Some(text) = any.downcast_ref::<String>() {
            return Ok(Value::String(text.clone()));
        }
        if let Some(text) = any.downcast_ref::<&'static str>() {
            return Ok(Value::String((*text).to_owned()));
        }
        if let Some(c) = any.downcast_ref::<char>() {
            return Ok(Value::String(c.to_string()));
        }
        Err(ConversionError::no_serializer("non-string host"))
    }
}

impl Deserializer for StringCapability {
    fn can_deserialize(&self, _ctx: &ConversionContext, target: TargetType, value: &Value) -> bool {
        (target.is::<String>() || target.is::<char>()) && matches!(value, Value::String(_))
    }

    fn deserialize(
        &self,
        _ctx: &ConversionContext,
        _scope: &mut ConversionScope,
        target: TargetType,
        value: &Value,
    ) -> Result<Option<Box<dyn AnyHost>>, ConversionError> {
        let Value::String(text) = value else {
            return Err(ConversionError::type_mismatch(
                target.name(),
                value_kind(value),
            ));
        };
        if target.is::<String>() {
            return Ok(Some(Box::new(text.clone())));
        }
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(Some(Box::new(c))),
            _ => Err(ConversionError::type_mismatch(
                target.name(),
                "multi-character string",
            )),
        }
    }
}

impl Capability for StringCapability {
    fn as_serializer(&self) -> Option<&dyn Serializer> {
        Some(self)
    }

    fn as_deserializer(&self) -> Option<&dyn Deserializer> {
        Some(self)
    }
}

/// Sequence containers registered with the binding factory, as JSON arrays.
pub struct SequenceCapability;

impl Serializer for SequenceCapability {
    fn can_serialize(&self, ctx: &ConversionContext, host: Option<&dyn AnyHost>) -> bool {
        host.is_some_and(|host| ctx.bindings().sequence(type_id_of(host)).is_some())
    }

    fn serialize(
        &self,
        ctx: &ConversionContext,
        scope: &mut ConversionScope,
        host: Option<&dyn AnyHost>,
    ) -> Result<Value, ConversionError> {
        let host = require_host(host)?;
        let adapter = ctx
            .bindings()
            .sequence(type_id_of(host))
            .ok_or_else(|| ConversionError::no_serializer(host.type_name()))?;
        let items = (adapter.iter)(host)?;
        let mut out = Vec::with_capacity(items.len());
        for item in items {
            out.push(ctx.serialize_erased(Some(item), scope)?);
        }
        Ok(Value::Array(out))
    }
}

impl Deserializer for SequenceCapability {
    fn can_deserialize(&self, ctx: &ConversionContext, target: TargetType, value: &Value) -> bool {
        matches!(value, Value::Array(_)) && ctx.bindings().sequence(target.id()).is_some()
    }

    fn deserialize(
        &self,
        ctx: &ConversionContext,
        scope: &mut ConversionScope,
        target: TargetType,
        value: &Value,
    ) -> Result<Option<Box<dyn AnyHost>>, ConversionError> {
        let adapter = ctx
            .bindings()
            .sequence(target.id())
            .ok_or_else(|| ConversionError::no_deserializer(target.name()))?;
        let Value::Array(items) = value else {
            return Err(ConversionError::type_mismatch(
                target.name(),
                value_kind(value),
            ));
        };
        let mut converted = Vec::with_capacity(items.len());
        for item in items {
            converted.push(ctx.deserialize_erased(adapter.element, item, scope)?);
        }
        (adapter.collect)(converted).map(Some)
    }
}

impl Capability for SequenceCapability {
    fn as_serializer(&self) -> Option<&dyn Serializer> {
        Some(self)
    }

    fn as_deserializer(&self) -> Option<&dyn Deserializer> {
        Some(self)
    }
}

/// Map containers registered with the binding factory, as JSON objects.
///
/// Keys round-trip through the key-converter chain. Null entries obey the
/// `skip_null_values` policy on output and are always dropped on input,
/// since the container value slot cannot hold null.
pub struct MapCapability;

impl Serializer for MapCapability {
    fn can_serialize(&self, ctx: &ConversionContext, host: Option<&dyn AnyHost>) -> bool {
        host.is_some_and(|host| ctx.bindings().map_adapter(type_id_of(host)).is_some())
    }

    fn serialize(
        &self,
        ctx: &ConversionContext,
        scope: &mut ConversionScope,
        host: Option<&dyn AnyHost>,
    ) -> Result<Value, ConversionError> {
        let host = require_host(host)?;
        let adapter = ctx
            .bindings()
            .map_adapter(type_id_of(host))
            .ok_or_else(|| ConversionError::no_serializer(host.type_name()))?;
        let mut members = Object::new();
        for (key, entry) in (adapter.iter)(host)? {
            let name = ctx.member_name_for_key(key)?;
            let converted = ctx.serialize_erased(Some(entry), scope)?;
            if converted.is_null() && ctx.skip_null_values() {
                continue;
            }
            members.insert(name, converted);
        }
        Ok(Value::Object(members))
    }
}

impl Deserializer for MapCapability {
    fn can_deserialize(&self, ctx: &ConversionContext, target: TargetType, value: &Value) -> bool {
        matches!(value, Value::Object(_)) && ctx.bindings().map_adapter(target.id()).is_some()
    }

    fn deserialize(
        &self,
        ctx: &ConversionContext,
        scope: &mut ConversionScope,
        target: TargetType,
        value: &Value,
    ) -> Result<Option<Box<dyn AnyHost>>, ConversionError> {
        let adapter = ctx
            .bindings()
            .map_adapter(target.id())
            .ok_or_else(|| ConversionError::no_deserializer(target.name()))?;
        let Value::Object(object) = value else {
            return Err(ConversionError::type_mismatch(
                target.name(),
                value_kind(value),
            ));
        };
        let mut entries = Vec::with_capacity(object.len());
        for member in object.iter() {
            let key = ctx.map_key(adapter.key, &member.name)?;
            if let Some(entry) = ctx.deserialize_erased(adapter.value, &member.value, scope)? {
                entries.push((key, entry));
            }
        }
        (adapter.collect)(entries).map(Some)
    }
}

impl Capability for MapCapability {
    fn as_serializer(&self) -> Option<&dyn Serializer> {
        Some(self)
    }

    fn as_deserializer(&self) -> Option<&dyn Deserializer> {
        Some(self)
    }
}

/// The compiled-binding fallback. Claims every host type with a registered
/// [`BindingSet`](super::BindingSet); sits last among the built-in
/// serializers and deserializers.
///
/// Property failures are contained: a property that cannot be read or
/// converted is logged and skipped, and the remaining properties still
/// convert. Top-level failures (an unclaimed root, a target that cannot be
/// instantiated) propagate as errors.
pub struct CompiledCapability;

impl Serializer for CompiledCapability {
    fn can_serialize(&self, ctx: &ConversionContext, host: Option<&dyn AnyHost>) -> bool {
        host.is_some_and(|host| ctx.bindings().contains(type_id_of(host)))
    }

    fn serialize(
        &self,
        ctx: &ConversionContext,
        scope: &mut ConversionScope,
        host: Option<&dyn AnyHost>,
    ) -> Result<Value, ConversionError> {
        let host = require_host(host)?;
        let set = ctx
            .bindings()
            .lookup(type_id_of(host))
            .ok_or_else(|| ConversionError::no_serializer(host.type_name()))?;
        let identity = set.identity_of(host);
        let entered = scope.enter(identity);
        if !entered && ctx.stop_at_cycles() {
            return Ok(Value::Null);
        }
        let mut members = Object::new();
        for binding in set.bindings() {
            let Some(read) = binding.read() else {
                continue;
            };
            let property = match read(host) {
                Ok(property) => property,
                Err(error) => {
                    tracing::warn!(
                        host = set.label(),
                        property = binding.member(),
                        %error,
                        "skipping unreadable property"
                    );
                    continue;
                }
            };
            match ctx.serialize_erased(property.as_deref(), scope) {
                Ok(converted) => {
                    if converted.is_null() && ctx.skip_null_values() {
                        continue;
                    }
                    members.insert(binding.member(), converted);
                }
                Err(error) => {
                    tracing::warn!(
                        host = set.label(),
                        property = binding.member(),
                        %error,
                        "skipping unconvertible property"
                    );
                }
            }
        }
        if entered {
            scope.leave(identity);
        }
        Ok(Value::Object(members))
    }
}

impl Deserializer for CompiledCapability {
    fn can_deserialize(&self, ctx: &ConversionContext, target: TargetType, value: &Value) -> bool {
        matches!(value, Value::Object(_)) && ctx.bindings().contains(target.id())
    }

    fn deserialize(
        &self,
        ctx: &ConversionContext,
        scope: &mut ConversionScope,
        target: TargetType,
        value: &Value,
    ) -> Result<Option<Box<dyn AnyHost>>, ConversionError> {
        let set = ctx
            .bindings()
            .lookup(target.id())
            .ok_or_else(|| ConversionError::no_deserializer(target.name()))?;
        let Value::Object(object) = value else {
            return Err(ConversionError::type_mismatch(
                target.name(),
                value_kind(value),
            ));
        };
        let mut instance = ctx.new_instance(target)?;
        for binding in set.bindings() {
            let Some(write) = binding.write() else {
                continue;
            };
            let Some(member) = object.get(binding.member()) else {
                continue;
            };
            let outcome = match ctx.deserialize_erased(binding.target(), member, scope) {
                Ok(None) if binding.non_null() || ctx.skip_null_values() => continue,
                Ok(converted) => write(&mut *instance, converted),
                Err(error) => Err(error),
            };
            if let Err(error) = outcome {
                tracing::warn!(
                    host = set.label(),
                    property = binding.member(),
                    %error,
                    "skipping unconvertible member"
                );
            }
        }
        Ok(Some(instance))
    }
}

impl Capability for CompiledCapability {
    fn as_serializer(&self) -> Option<&dyn Serializer> {
        Some(self)
    }

    fn as_deserializer(&self) -> Option<&dyn Deserializer> {
        Some(self)
    }
}

/// Instantiates blank targets through the constructors registered on their
/// binding sets.
pub struct DefaultInstantiator;

impl Instantiator for DefaultInstantiator {
    fn can_instantiate(&self, ctx: &ConversionContext, target: TargetType) -> bool {
        ctx.bindings()
            .lookup(target.id())
            .is_some_and(|set| set.can_instantiate())
    }

    fn new_instance(
        &self,
        ctx: &ConversionContext,
        target: TargetType,
    ) -> Result<Box<dyn AnyHost>, ConversionError> {
        ctx.bindings()
            .lookup(target.id())
            .and_then(|set| set.instantiate())
            .ok_or_else(|| ConversionError::cannot_instantiate(target.name()))
    }
}

impl Capability for DefaultInstantiator {
    fn as_instantiator(&self) -> Option<&dyn Instantiator> {
        Some(self)
    }
}

/// String keys pass through unchanged; integer keys round-trip through their
/// decimal rendering.
pub struct DefaultKeyConverter;

macro_rules! integer_keys {
    ($macro:ident) => {
        $macro!(i8, i16, i32, i64, u8, u16, u32, u64)
    };
}

impl KeyConverter for DefaultKeyConverter {
    fn can_make_member_name(&self, _ctx: &ConversionContext, key: &dyn AnyHost) -> bool {
        let any = key.as_any();
        macro_rules! check {
            ($($ty:ty),*) => { any.is::<String>() $( || any.is::<$ty>() )* };
        }
        integer_keys!(check)
    }

    fn member_name(
        &self,
        _ctx: &ConversionContext,
        key: &dyn AnyHost,
    ) -> Result<String, ConversionError> {
        let any = key.as_any();
        if let Some(text) = any.downcast_ref::<String>() {
            return Ok(text.clone());
        }
        macro_rules! render {
            ($($ty:ty),*) => {
                $(
                    if let Some(number) = any.downcast_ref::<$ty>() {
                        return Ok(number.to_string());
                    }
                )*
            };
        }
        integer_keys!(render);
        Err(ConversionError::no_member_name_for_key(key.type_name()))
    }

    fn can_make_map_key(&self, _ctx: &ConversionContext, target: TargetType, _name: &str) -> bool {
        macro_rules! check {
            ($($ty:ty),*) => { target.is::<String>() $( || target.is::<$ty>() )* };
        }
        integer_keys!(check)
    }

    fn map_key(
        &self,
        _ctx: &ConversionContext,
        target: TargetType,
        name: &str,
    ) -> Result<Box<dyn AnyHost>, ConversionError> {
        if target.is::<String>() {
            return Ok(Box::new(name.to_owned()));
        }
        macro_rules! parse {
            ($($ty:ty),*) => {
                $(
                    if target.is::<$ty>() {
                        return name
                            .parse::<$ty>()
                            .map(|key| Box::new(key) as Box<dyn AnyHost>)
                            .map_err(|_| ConversionError::invalid_key(target.name(), name));
                    }
                )*
            };
        }
        integer_keys!(parse);
        Err(ConversionError::invalid_key(target.name(), name))
    }
}

impl Capability for DefaultKeyConverter {
    fn as_key_converter(&self) -> Option<&dyn KeyConverter> {
        Some(self)
    }
}

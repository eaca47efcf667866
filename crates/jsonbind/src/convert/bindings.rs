//! Compiled property bindings: the registration table that replaces
//! runtime type introspection.
//!
//! A [`BindingSet`] is built exactly once per host type, cached by the
//! [`BindingFactory`](super::BindingFactory), and reused by the compiled
//! fallback capabilities for every subsequent conversion.

use std::any::Any;
use std::marker::PhantomData;
use std::sync::Arc;

use super::capability::{AnyHost, TargetType};
use super::host_identity;
use crate::error::ConversionError;

/// Derives a JSON member name from a host property name.
pub trait NamingPolicy: Send + Sync {
    fn member_name(&self, property: &str) -> String;
}

/// Keep property names as they are. The default.
pub struct Identity;

impl NamingPolicy for Identity {
    fn member_name(&self, property: &str) -> String {
        property.to_owned()
    }
}

/// Turn `snake_case` property names into `camelCase` member names.
pub struct CamelCase;

impl NamingPolicy for CamelCase {
    fn member_name(&self, property: &str) -> String {
        let mut out = String::with_capacity(property.len());
        let mut upper_next = false;
        for c in property.chars() {
            if c == '_' {
                upper_next = true;
            } else if upper_next {
                out.extend(c.to_uppercase());
                upper_next = false;
            } else {
                out.push(c);
            }
        }
        out
    }
}

pub(crate) type ReadFn =
    Box<dyn Fn(&dyn AnyHost) -> Result<Option<Box<dyn AnyHost>>, ConversionError> + Send + Sync>;
pub(crate) type WriteFn = Box<
    dyn Fn(&mut dyn AnyHost, Option<Box<dyn AnyHost>>) -> Result<(), ConversionError>
        + Send
        + Sync,
>;
type MakeFn = Box<dyn Fn() -> Box<dyn AnyHost> + Send + Sync>;
type IdentityFn = Box<dyn Fn(&dyn AnyHost) -> usize + Send + Sync>;

/// One named property of a host type.
///
/// Carries the JSON member name, the erased read and/or write function,
/// and whether the underlying slot cannot hold null (a plain field, as
/// opposed to an `Option`).
pub struct CompiledBinding {
    member: String,
    target: TargetType,
    non_null: bool,
    read: Option<ReadFn>,
    write: Option<WriteFn>,
}

impl CompiledBinding {
    #[must_use]
    pub fn member(&self) -> &str {
        &self.member
    }

    /// The property's value type, used for recursive deserialization.
    #[must_use]
    pub fn target(&self) -> TargetType {
        self.target
    }

    /// Whether a null deserialization result must leave the slot untouched.
    #[must_use]
    pub fn non_null(&self) -> bool {
        self.non_null
    }

    pub(crate) fn read(&self) -> Option<&ReadFn> {
        self.read.as_ref()
    }

    pub(crate) fn write(&self) -> Option<&WriteFn> {
        self.write.as_ref()
    }
}

/// The compiled binding table of one host type.
pub struct BindingSet {
    label: &'static str,
    target: TargetType,
    bindings: Vec<CompiledBinding>,
    make: Option<MakeFn>,
    identity: Option<IdentityFn>,
}

impl BindingSet {
    #[must_use]
    pub fn label(&self) -> &'static str {
        self.label
    }

    #[must_use]
    pub fn target(&self) -> TargetType {
        self.target
    }

    #[must_use]
    pub fn bindings(&self) -> &[CompiledBinding] {
        &self.bindings
    }

    #[must_use]
    pub fn can_instantiate(&self) -> bool {
        self.make.is_some()
    }

    pub(crate) fn instantiate(&self) -> Option<Box<dyn AnyHost>> {
        self.make.as_ref().map(|make| make())
    }

    /// The identity used for cycle detection.
    ///
    /// Defaults to the reference address, which is sufficient for types
    /// that cannot alias; shared-ownership types register an explicit
    /// identity function instead.
    pub(crate) fn identity_of(&self, host: &dyn AnyHost) -> usize {
        match &self.identity {
            Some(identity) => identity(host),
            None => host_identity(host),
        }
    }
}

/// Builds the binding table of one host type.
pub struct BindingSetBuilder<T> {
    policy: Arc<dyn NamingPolicy>,
    bindings: Vec<CompiledBinding>,
    make: Option<MakeFn>,
    identity: Option<IdentityFn>,
    marker: PhantomData<fn() -> T>,
}

impl<T: Any> BindingSetBuilder<T> {
    pub(crate) fn new(policy: Arc<dyn NamingPolicy>) -> Self {
        BindingSetBuilder {
            policy,
            bindings: Vec::new(),
            make: None,
            identity: None,
            marker: PhantomData,
        }
    }

    fn push(
        &mut self,
        property: &str,
        target: TargetType,
        non_null: bool,
        read: Option<ReadFn>,
        write: Option<WriteFn>,
    ) {
        let member = self.policy.member_name(property);
        self.bindings.push(CompiledBinding {
            member,
            target,
            non_null,
            read,
            write,
        });
    }

    /// A property whose slot cannot hold null: a null deserialization
    /// result leaves it untouched.
    #[must_use]
    pub fn required<V, G, S>(mut self, property: &str, get: G, set: S) -> Self
    where
        V: Any,
        G: Fn(&T) -> V + Send + Sync + 'static,
        S: Fn(&mut T, V) + Send + Sync + 'static,
    {
        let read: ReadFn = Box::new(move |host| {
            let host = expect_host::<T>(host)?;
            Ok(Some(Box::new(get(host)) as Box<dyn AnyHost>))
        });
        let write: WriteFn = Box::new(move |host, value| {
            let host = expect_host_mut::<T>(host)?;
            if let Some(value) = value {
                set(host, take_host::<V>(value)?);
            }
            Ok(())
        });
        self.push(property, TargetType::of::<V>(), true, Some(read), Some(write));
        self
    }

    /// A nullable property backed by an `Option` slot.
    #[must_use]
    pub fn optional<V, G, S>(mut self, property: &str, get: G, set: S) -> Self
    where
        V: Any,
        G: Fn(&T) -> Option<V> + Send + Sync + 'static,
        S: Fn(&mut T, Option<V>) + Send + Sync + 'static,
    {
        let read: ReadFn = Box::new(move |host| {
            let host = expect_host::<T>(host)?;
            Ok(get(host).map(|value| Box::new(value) as Box<dyn AnyHost>))
        });
        let write: WriteFn = Box::new(move |host, value| {
            let host = expect_host_mut::<T>(host)?;
            match value {
                Some(value) => set(host, Some(take_host::<V>(value)?)),
                None => set(host, None),
            }
            Ok(())
        });
        self.push(
            property,
            TargetType::of::<V>(),
            false,
            Some(read),
            Some(write),
        );
        self
    }

    /// A serialize-only property with no backing slot to populate.
    #[must_use]
    pub fn read_only<V, G>(mut self, property: &str, get: G) -> Self
    where
        V: Any,
        G: Fn(&T) -> V + Send + Sync + 'static,
    {
        let read: ReadFn = Box::new(move |host| {
            let host = expect_host::<T>(host)?;
            Ok(Some(Box::new(get(host)) as Box<dyn AnyHost>))
        });
        self.push(property, TargetType::of::<V>(), true, Some(read), None);
        self
    }

    /// Override the member name of the most recently added property,
    /// bypassing the naming policy.
    #[must_use]
    pub fn renamed(mut self, member: &str) -> Self {
        if let Some(last) = self.bindings.last_mut() {
            last.member = member.to_owned();
        }
        self
    }

    /// Identity function for cycle detection. Required for shared-ownership
    /// types (`Rc`/`Arc` graphs), which are the only host shapes that can
    /// form cycles.
    #[must_use]
    pub fn identity<F>(mut self, identity: F) -> Self
    where
        F: Fn(&T) -> usize + Send + Sync + 'static,
    {
        self.identity = Some(Box::new(move |host| {
            expect_host::<T>(host).map_or(0, &identity)
        }));
        self
    }

    /// Blank-target constructor consumed by the default instantiator.
    #[must_use]
    pub fn instantiate_with<F>(mut self, make: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.make = Some(Box::new(move || Box::new(make()) as Box<dyn AnyHost>));
        self
    }

    /// Use `T::default()` as the blank-target constructor.
    #[must_use]
    pub fn instantiate_default(self) -> Self
    where
        T: Default,
    {
        self.instantiate_with(T::default)
    }

    pub(crate) fn build(self, label: &'static str) -> BindingSet {
        BindingSet {
            label,
            target: TargetType::of::<T>(),
            bindings: self.bindings,
            make: self.make,
            identity: self.identity,
        }
    }
}

pub(crate) fn expect_host<T: Any>(host: &dyn AnyHost) -> Result<&T, ConversionError> {
    let found = host.type_name();
    host.as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| ConversionError::type_mismatch(std::any::type_name::<T>(), found))
}

pub(crate) fn expect_host_mut<T: Any>(host: &mut dyn AnyHost) -> Result<&mut T, ConversionError> {
    let found = (*host).type_name();
    host.as_any_mut()
        .downcast_mut::<T>()
        .ok_or_else(|| ConversionError::type_mismatch(std::any::type_name::<T>(), found))
}

pub(crate) fn take_host<V: Any>(host: Box<dyn AnyHost>) -> Result<V, ConversionError> {
    let found = host.type_name();
    host.into_any()
        .downcast::<V>()
        .map(|boxed| *boxed)
        .map_err(|_| ConversionError::type_mismatch(std::any::type_name::<V>(), found))
}

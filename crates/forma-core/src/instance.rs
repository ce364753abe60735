//! # Type-Erased Construction Results
//!
//! A dispatcher builds whatever its target produces. [`Instance`] holds that
//! value behind a trait object so callers can downcast to the concrete type
//! they expect, and still print it for diagnostics.

use std::any::{self, Any};
use std::fmt;

/// Any value a constructor may return: `'static`, thread-safe, printable.
pub trait Object: Any + fmt::Debug + Send + Sync {
    /// Upcast to `&dyn Any` for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Upcast a box to `Box<dyn Any>` for owned downcasting.
    fn into_any(self: Box<Self>) -> Box<dyn Any + Send + Sync>;
}

impl<T: Any + fmt::Debug + Send + Sync> Object for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send + Sync> {
        self
    }
}

/// A constructed value of some type known only at run time.
pub struct Instance {
    type_name: &'static str,
    value: Box<dyn Object>,
}

impl Instance {
    /// Erase a concrete value.
    pub fn new<T: Object>(value: T) -> Self {
        Self {
            type_name: any::type_name::<T>(),
            value: Box::new(value),
        }
    }

    /// The Rust type name of the contained value.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Whether the contained value is a `T`.
    pub fn is<T: Any>(&self) -> bool {
        (*self.value).as_any().is::<T>()
    }

    /// Borrow the contained value as a `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        (*self.value).as_any().downcast_ref::<T>()
    }

    /// Take the contained value as a `T`, or get the instance back on mismatch.
    pub fn downcast<T: Any>(self) -> Result<T, Self> {
        if !self.is::<T>() {
            return Err(self);
        }
        match self.value.into_any().downcast::<T>() {
            Ok(value) => Ok(*value),
            // `is::<T>()` held above, so the downcast cannot fail.
            Err(_) => unreachable!("type checked before downcast"),
        }
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.value, f)
    }
}

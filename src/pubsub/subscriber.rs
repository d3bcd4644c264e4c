use std::{any::Any, fmt, sync::Arc};

use courier_error::BoxError;
use serde_json::Value;

/// Opaque receiver value attached to a subscription.
///
/// Compared by pointer identity: `cancel` only matches a subscription whose
/// context is a clone of the very same `Arc`.
pub type Context = Arc<dyn Any + Send + Sync>;

type HandlerFn<T> = dyn Fn(&Delivery<'_, T>) -> Result<(), BoxError> + Send + Sync;

/// Shared, cloneable subscriber callback.
///
/// Two handles are equal when one is a clone of the other. Keep a clone
/// around if the subscription needs to be cancelled later.
pub struct Handler<T = Value> {
    inner: Arc<HandlerFn<T>>,
}

impl<T> Handler<T> {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Delivery<'_, T>) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        Self { inner: Arc::new(f) }
    }

    /// `true` if both handles point at the same callback.
    pub fn ptr_eq(
        &self,
        other: &Handler<T>,
    ) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn call(
        &self,
        delivery: &Delivery<'_, T>,
    ) -> Result<(), BoxError> {
        (self.inner)(delivery)
    }
}

impl<T> Clone for Handler<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> PartialEq for Handler<T> {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        self.ptr_eq(other)
    }
}

impl<T> Eq for Handler<T> {}

impl<T> fmt::Debug for Handler<T> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_tuple("Handler")
            .field(&Arc::as_ptr(&self.inner).cast::<()>())
            .finish()
    }
}

/// One entry of a route: a handler plus its optional context.
pub struct Subscription<T = Value> {
    pub(crate) handler: Handler<T>,
    pub(crate) context: Option<Context>,
}

impl<T> Subscription<T> {
    pub fn new(
        handler: Handler<T>,
        context: Option<Context>,
    ) -> Self {
        Self { handler, context }
    }

    pub fn handler(&self) -> &Handler<T> {
        &self.handler
    }

    pub fn context(&self) -> Option<&Context> {
        self.context.as_ref()
    }

    /// Handler identity plus context identity; `None` only matches `None`.
    pub(crate) fn matches(
        &self,
        handler: &Handler<T>,
        context: Option<&Context>,
    ) -> bool {
        self.handler.ptr_eq(handler)
            && match (self.context.as_ref(), context) {
                (None, None) => true,
                (Some(a), Some(b)) => Arc::ptr_eq(a, b),
                _ => false,
            }
    }
}

impl<T> Clone for Subscription<T> {
    fn clone(&self) -> Self {
        Self {
            handler: self.handler.clone(),
            context: self.context.clone(),
        }
    }
}

impl<T> fmt::Debug for Subscription<T> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("handler", &self.handler)
            .field("has_context", &self.context.is_some())
            .finish()
    }
}

/// What a handler sees for a single invocation.
pub struct Delivery<'a, T = Value> {
    courier: &'a str,
    route: &'a str,
    context: Option<&'a Context>,
    args: &'a [T],
}

impl<'a, T> Delivery<'a, T> {
    pub(crate) fn new(
        courier: &'a str,
        route: &'a str,
        context: Option<&'a Context>,
        args: &'a [T],
    ) -> Self {
        Self {
            courier,
            route,
            context,
            args,
        }
    }

    pub fn courier(&self) -> &'a str {
        self.courier
    }

    pub fn route(&self) -> &'a str {
        self.route
    }

    pub fn context(&self) -> Option<&'a Context> {
        self.context
    }

    /// Downcasts the context to a concrete type.
    pub fn context_as<C: Any>(&self) -> Option<&'a C> {
        self.context.and_then(|ctx| ctx.downcast_ref::<C>())
    }

    pub fn args(&self) -> &'a [T] {
        self.args
    }

    pub fn arg(
        &self,
        index: usize,
    ) -> Option<&'a T> {
        self.args.get(index)
    }
}

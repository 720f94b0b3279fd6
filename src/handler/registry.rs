//! Method registry: name → invocation descriptor table.
//!
//! [`Registry::register`] turns a service object into table entries
//! keyed `"namespace.Method"`. Each entry pairs immutable metadata
//! ([`MethodSpec`]) with an adapter closure that decodes raw wire
//! parameters into the method's declared types, invokes the bound
//! service, and shapes the return value into a [`CallOutput`].
//!
//! The table has a single-writer-then-many-readers lifecycle: build it
//! fully during startup, then hand it to a dispatcher, after which it
//! is read-only and safe for concurrent lookups. Nothing enforces that
//! with a lock; registration during dispatch is a contract violation.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use jsonwire::{Namespace, Registry, RpcService};
//!
//! struct Math;
//!
//! impl RpcService for Math {
//!     fn register(self: Arc<Self>, scope: &mut Namespace<'_>) {
//!         scope.method("Add", |a: i64, b: i64| async move {
//!             Ok::<_, std::convert::Infallible>(a + b)
//!         });
//!     }
//! }
//!
//! let mut registry = Registry::new();
//! registry.register("math", Math);
//! assert!(registry.contains("math.Add"));
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::value::RawValue;

use super::context::Context;
use super::method::{BoxFuture, CallOutput, OutputShape, Params, RpcFn};
use crate::error::Result;

/// Adapter stored per method: decode parameters synchronously, then
/// return the invocation future. A parameter decode error comes back as
/// `Err` before any future exists, so a malformed parameter provably
/// never invokes the handler.
pub(crate) type Adapter = Box<
    dyn Fn(
            Context,
            &[Box<RawValue>],
        ) -> std::result::Result<BoxFuture<'static, Result<CallOutput>>, serde_json::Error>
        + Send
        + Sync,
>;

/// Registration-time metadata for one method. Immutable after
/// registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSpec {
    /// Number of positional parameters.
    pub param_count: usize,
    /// Native type name of each parameter, in wire order.
    pub param_types: Vec<&'static str>,
    /// Whether the handler takes a leading [`Context`].
    pub expects_ctx: bool,
    /// What the return value contributes to the response.
    pub output: OutputShape,
}

/// Entry for a registered method.
pub(crate) struct MethodEntry {
    pub(crate) spec: MethodSpec,
    pub(crate) adapter: Adapter,
}

/// A service object exposing callable methods.
///
/// `register` is the explicit, typed stand-in for runtime method
/// enumeration: the implementation lists each method once, with the
/// closure capturing the `Arc`'d service as its bound receiver.
pub trait RpcService: Send + Sync + 'static {
    /// Add this service's methods to the given namespace scope.
    fn register(self: Arc<Self>, scope: &mut Namespace<'_>);
}

/// Registry mapping fully-qualified method names to entries.
#[derive(Default)]
pub struct Registry {
    methods: HashMap<String, MethodEntry>,
}

impl Registry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            methods: HashMap::new(),
        }
    }

    /// Register every method of `service` under `namespace`.
    ///
    /// Entries from multiple registrations merge into one table. A
    /// colliding key replaces the earlier entry (and logs a warning);
    /// last registration wins.
    pub fn register<S: RpcService>(&mut self, namespace: &str, service: S) {
        let service = Arc::new(service);
        let mut scope = Namespace {
            methods: &mut self.methods,
            namespace,
        };
        service.register(&mut scope);
    }

    /// Get the metadata for a method, if registered.
    pub fn spec(&self, method: &str) -> Option<&MethodSpec> {
        self.methods.get(method).map(|e| &e.spec)
    }

    /// Check whether a method is registered.
    pub fn contains(&self, method: &str) -> bool {
        self.methods.contains_key(method)
    }

    /// Number of registered methods.
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    /// True when no methods are registered.
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    /// Iterate over registered method names (unordered).
    pub fn method_names(&self) -> impl Iterator<Item = &str> {
        self.methods.keys().map(|s| s.as_str())
    }

    pub(crate) fn entry(&self, method: &str) -> Option<&MethodEntry> {
        self.methods.get(method)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.method_names().collect();
        names.sort_unstable();
        f.debug_struct("Registry").field("methods", &names).finish()
    }
}

/// Registration scope for one service under one namespace.
///
/// The four registration methods correspond to the four return shapes a
/// method can declare; each accepts both `Fn(P...)` and
/// `Fn(Context, P...)` handler signatures.
pub struct Namespace<'a> {
    methods: &'a mut HashMap<String, MethodEntry>,
    namespace: &'a str,
}

impl Namespace<'_> {
    /// Register a method returning `Result<T, E>`: result payload on
    /// success, error response on failure.
    pub fn method<Marker, Func, T, E>(&mut self, name: &str, f: Func)
    where
        Func: RpcFn<Marker, std::result::Result<T, E>>,
        T: Serialize + Send + 'static,
        E: fmt::Display + Send + 'static,
    {
        self.insert(name, OutputShape::Both, f, |ret: std::result::Result<T, E>| {
            match ret {
                Ok(v) => Ok(CallOutput::Value(serde_json::to_value(v)?)),
                Err(e) => Ok(CallOutput::Failure(e.to_string())),
            }
        });
    }

    /// Register a method returning a plain `T`: always produces a
    /// result payload, has no error output.
    pub fn method_infallible<Marker, Func, T>(&mut self, name: &str, f: Func)
    where
        Func: RpcFn<Marker, T>,
        T: Serialize + Send + 'static,
    {
        self.insert(name, OutputShape::Value, f, |v: T| {
            Ok(CallOutput::Value(serde_json::to_value(v)?))
        });
    }

    /// Register a method returning `Result<(), E>`: no result payload,
    /// error response on failure.
    pub fn method_unit<Marker, Func, E>(&mut self, name: &str, f: Func)
    where
        Func: RpcFn<Marker, std::result::Result<(), E>>,
        E: fmt::Display + Send + 'static,
    {
        self.insert(name, OutputShape::Error, f, |ret: std::result::Result<(), E>| {
            match ret {
                Ok(()) => Ok(CallOutput::Empty),
                Err(e) => Ok(CallOutput::Failure(e.to_string())),
            }
        });
    }

    /// Register a method returning `()`: runs for effect only.
    pub fn method_void<Marker, Func>(&mut self, name: &str, f: Func)
    where
        Func: RpcFn<Marker, ()>,
    {
        self.insert(name, OutputShape::Neither, f, |_| Ok(CallOutput::Empty));
    }

    fn insert<Marker, Func, Ret, Shape>(
        &mut self,
        name: &str,
        output: OutputShape,
        f: Func,
        shape: Shape,
    ) where
        Func: RpcFn<Marker, Ret>,
        Ret: Send + 'static,
        Shape: Fn(Ret) -> Result<CallOutput> + Clone + Send + Sync + 'static,
    {
        let spec = MethodSpec {
            param_count: <Func::Params as Params>::COUNT,
            param_types: <Func::Params as Params>::type_names(),
            expects_ctx: Func::EXPECTS_CTX,
            output,
        };

        let adapter: Adapter = Box::new(move |ctx: Context, raw: &[Box<RawValue>]| {
            let params = <Func::Params as Params>::decode(raw)?;
            let fut = f.invoke(ctx, params);
            let shape = shape.clone();
            let shaped: BoxFuture<'static, Result<CallOutput>> =
                Box::pin(async move { shape(fut.await) });
            Ok(shaped)
        });

        let key = format!("{}.{}", self.namespace, name);
        if self.methods.insert(key.clone(), MethodEntry { spec, adapter }).is_some() {
            tracing::warn!(method = %key, "method re-registered, previous handler replaced");
        }
    }
}

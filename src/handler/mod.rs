//! Handler module - method registration and invocation descriptors.
//!
//! Provides:
//! - [`Registry`] - maps fully-qualified method names to entries
//! - [`Namespace`] - per-service registration scope
//! - [`Context`] - ambient cancellation value passed to handlers
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use jsonwire::{Context, Namespace, Registry, RpcService};
//!
//! struct Math;
//!
//! impl RpcService for Math {
//!     fn register(self: Arc<Self>, scope: &mut Namespace<'_>) {
//!         scope.method("Add", |a: i64, b: i64| async move {
//!             Ok::<_, std::convert::Infallible>(a + b)
//!         });
//!         scope.method("Wait", |ctx: Context, secs: u64| async move {
//!             ctx.cancelled().await;
//!             Ok::<_, std::convert::Infallible>(secs)
//!         });
//!     }
//! }
//!
//! let mut registry = Registry::new();
//! registry.register("math", Math);
//! assert!(registry.spec("math.Wait").unwrap().expects_ctx);
//! ```

mod context;
mod method;
mod registry;

pub use context::{CancelHandle, Context};
pub use method::{BoxFuture, CallOutput, NoCtx, OutputShape, Params, RpcFn, WithCtx};
pub use registry::{MethodSpec, Namespace, Registry, RpcService};

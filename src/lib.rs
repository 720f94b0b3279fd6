//! # jsonwire
//!
//! JSON-RPC 2.0 service registry and request dispatcher.
//!
//! This crate is the dispatch core of a JSON-RPC server: it knows
//! nothing about sockets or processes. A transport hands it one encoded
//! request at a time and a sink to write into; everything between —
//! method lookup, typed parameter decoding, invocation, response
//! framing — happens here.
//!
//! ## Architecture
//!
//! - **Registry** (build phase): services list their methods once,
//!   through typed registration calls that resolve an invocation
//!   descriptor per method. The table then freezes.
//! - **Dispatcher** (serve phase): per request, resolves the method,
//!   checks arity, decodes each positional parameter into its exact
//!   declared type, invokes the bound handler, and writes at most one
//!   response. Requests without an `id` are notifications and produce
//!   no response at all.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use jsonwire::{Context, Dispatcher, Namespace, Registry, RpcService};
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
//! # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
//! let mut registry = Registry::new();
//! registry.register("math", Math);
//!
//! let dispatcher = Dispatcher::new(registry);
//! let mut sink = Vec::new();
//! dispatcher
//!     .dispatch_bytes(
//!         Context::new(),
//!         br#"{"jsonrpc":"2.0","id":1,"method":"math.Add","params":[2,3]}"#,
//!         &mut sink,
//!     )
//!     .await
//!     .unwrap();
//! assert_eq!(sink, br#"{"jsonrpc":"2.0","result":5,"id":1}"#);
//! # });
//! ```

pub mod codec;
pub mod dispatch;
pub mod error;
pub mod handler;
pub mod protocol;

pub use dispatch::Dispatcher;
pub use error::{Result, RpcError};
pub use handler::{CancelHandle, Context, MethodSpec, Namespace, OutputShape, Registry, RpcService};

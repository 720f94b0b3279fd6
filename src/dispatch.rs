//! Request dispatcher.
//!
//! Consumes a frozen [`Registry`] plus one request per invocation:
//! decode the envelope, resolve the method, check arity, decode each
//! positional parameter into its declared type, invoke, and write at
//! most one response. Notifications (no `id`) run for effect only and
//! never produce output, regardless of outcome.
//!
//! The dispatcher introduces no concurrency of its own; the transport
//! decides how many dispatches run at once. Concurrent dispatches are
//! safe because the registry table is read-only after construction and
//! every call operates on its own envelopes.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use jsonwire::{Context, Dispatcher, Namespace, Registry, RpcService};
//!
//! struct Math;
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
//! let dispatcher = Dispatcher::new(registry);
//!
//! let request = br#"{"jsonrpc":"2.0","id":1,"method":"math.Add","params":[2,3]}"#;
//! let mut sink = Vec::new();
//! dispatcher
//!     .dispatch_bytes(Context::new(), request, &mut sink)
//!     .await
//!     .unwrap();
//! assert_eq!(sink, br#"{"jsonrpc":"2.0","result":5,"id":1}"#);
//! # });
//! ```

use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::codec::JsonCodec;
use crate::error::Result;
use crate::handler::{CallOutput, Context, Registry};
use crate::protocol::{codes, Request, Response};

/// Dispatches decoded requests against a frozen registry.
///
/// Cheap to clone; clones share the registry.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<Registry>,
}

impl Dispatcher {
    /// Freeze a registry and build a dispatcher over it.
    ///
    /// Taking the registry by value is what closes the registration
    /// phase: no handler can be added once dispatch begins.
    pub fn new(registry: Registry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    /// Build a dispatcher over an already-shared registry.
    ///
    /// The single-writer-then-many-readers contract is the caller's to
    /// uphold: no registration may race with dispatch.
    pub fn from_shared(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    /// Access the underlying registry (read-only).
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Read one encoded request from `reader` and dispatch it.
    ///
    /// The reader is consumed to EOF; the transport owns framing and
    /// hands this method exactly one request's bytes.
    pub async fn dispatch_read<R, W>(
        &self,
        ctx: Context,
        mut reader: R,
        sink: &mut W,
    ) -> Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).await?;
        self.dispatch_bytes(ctx, &buf, sink).await
    }

    /// Dispatch one encoded request.
    ///
    /// If the envelope itself cannot be decoded, a parse-error response
    /// is written against whatever `id` a lenient re-parse can salvage,
    /// or against a zero-value envelope (`id` 0) when none can.
    pub async fn dispatch_bytes<W>(&self, ctx: Context, bytes: &[u8], sink: &mut W) -> Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        let req: Request = match JsonCodec::decode(bytes) {
            Ok(req) => req,
            Err(e) => {
                let id = recover_id(bytes).unwrap_or(0);
                tracing::debug!(id, error = %e, "failed to decode request envelope");
                return self
                    .emit_error(sink, Some(id), codes::PARSE_ERROR, e.to_string())
                    .await;
            }
        };

        self.dispatch(ctx, req, sink).await
    }

    /// Dispatch an already-decoded request envelope.
    pub async fn dispatch<W>(&self, ctx: Context, req: Request, sink: &mut W) -> Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        let Some(entry) = self.registry.entry(&req.method) else {
            return self
                .emit_error(
                    sink,
                    req.id,
                    codes::METHOD_NOT_FOUND,
                    format!("method '{}' not found", req.method),
                )
                .await;
        };

        if req.params.len() != entry.spec.param_count {
            return self
                .emit_error(
                    sink,
                    req.id,
                    codes::INVALID_PARAMS,
                    format!(
                        "wrong param count (method '{}' expects {}, got {})",
                        req.method,
                        entry.spec.param_count,
                        req.params.len()
                    ),
                )
                .await;
        }

        // Parameter decode happens inside the adapter, synchronously:
        // on failure no handler future ever exists.
        let fut = match (entry.adapter)(ctx, &req.params) {
            Ok(fut) => fut,
            Err(e) => {
                return self
                    .emit_error(sink, req.id, codes::PARSE_ERROR, e.to_string())
                    .await;
            }
        };

        let output = fut.await;

        let Some(id) = req.id else {
            // Notification: ran for effect only, never respond.
            match output {
                Ok(CallOutput::Failure(message)) => {
                    tracing::debug!(method = %req.method, error = %message,
                        "notification handler reported an error, dropped");
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::debug!(method = %req.method, error = %e,
                        "notification result discarded");
                }
            }
            return Ok(());
        };

        let output = match output {
            Ok(output) => output,
            Err(e) => {
                // Result payload failed to serialize. The exchange is
                // over; report to the caller, write nothing.
                tracing::error!(method = %req.method, id, error = %e,
                    "failed to encode result payload");
                return Err(e);
            }
        };

        let resp = match output {
            CallOutput::Failure(message) => Response::error(id, codes::HANDLER_ERROR, message),
            CallOutput::Value(value) => Response::result(id, value),
            CallOutput::Empty => Response::empty(id),
        };

        self.emit(sink, &resp).await
    }

    /// Write an error response, unless the request was a notification.
    async fn emit_error<W>(
        &self,
        sink: &mut W,
        id: Option<i64>,
        code: i64,
        message: String,
    ) -> Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        let Some(id) = id else {
            tracing::debug!(code, message = %message,
                "suppressing error response for notification");
            return Ok(());
        };

        self.emit(sink, &Response::error(id, code, message)).await
    }

    /// Encode and write one response envelope.
    async fn emit<W>(&self, sink: &mut W, resp: &Response) -> Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        let bytes = match JsonCodec::encode(resp) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::error!(id = resp.id, error = %e, "failed to encode response");
                return Err(e);
            }
        };

        sink.write_all(&bytes).await?;
        sink.flush().await?;
        Ok(())
    }
}

/// Try to salvage a request id from bytes that failed envelope decode.
fn recover_id(bytes: &[u8]) -> Option<i64> {
    serde_json::from_slice::<serde_json::Value>(bytes)
        .ok()?
        .get("id")?
        .as_i64()
}

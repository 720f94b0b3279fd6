//! Method adapters: the typed decode/invoke/shape machinery.
//!
//! Rust has no runtime method reflection, so the registry stores one
//! adapter closure per method instead of inspecting callables at
//! dispatch time. Everything a dispatch needs to know about a method is
//! resolved once, at registration:
//!
//! - [`Params`] describes the positional parameter tuple: count, native
//!   type names, and how to decode each raw wire value into its exact
//!   declared type.
//! - [`RpcFn`] is implemented for plain async fns/closures and for ones
//!   taking a leading [`Context`]; the marker types keep the two
//!   families apart during trait resolution (a `Context` first argument
//!   is possible precisely because `Context` is not deserializable).
//! - [`OutputShape`] is the registration-time tag for what the return
//!   value contributes to the response, replacing positional
//!   error/value indices.

use std::future::Future;
use std::pin::Pin;

use serde::de::DeserializeOwned;
use serde_json::value::RawValue;

use super::context::Context;

/// Boxed future used by method adapters.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Which response fields a method's return value can populate.
///
/// Resolved at registration from the handler's return type and stored
/// in the method descriptor; dispatch branches on the stored tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputShape {
    /// `()` — runs for effect, response carries neither field.
    Neither,
    /// `T` — always produces a result payload, cannot fail.
    Value,
    /// `Result<(), E>` — may fail, never produces a result payload.
    Error,
    /// `Result<T, E>` — result payload on success, error on failure.
    Both,
}

/// What one invocation produced, before response framing.
#[derive(Debug)]
pub enum CallOutput {
    /// Serialized result payload.
    Value(serde_json::Value),
    /// Completed with no result payload.
    Empty,
    /// The handler's error output was set; message preserved verbatim.
    Failure(String),
}

/// Positional parameter tuple decoded from raw wire values.
///
/// Implemented for tuples up to eight elements of `DeserializeOwned`
/// types. Order is significant and matches wire parameter order.
pub trait Params: Sized + Send + 'static {
    /// Number of positional parameters.
    const COUNT: usize;

    /// Native type name of each parameter, in wire order.
    fn type_names() -> Vec<&'static str>;

    /// Decode every raw value into its declared native type.
    ///
    /// Callers must have checked arity already; `raw` holds exactly
    /// [`Self::COUNT`] values.
    fn decode(raw: &[Box<RawValue>]) -> serde_json::Result<Self>;
}

macro_rules! impl_params {
    ($count:expr $(, $ty:ident => $idx:tt)*) => {
        impl<$($ty,)*> Params for ($($ty,)*)
        where
            $($ty: DeserializeOwned + Send + 'static,)*
        {
            const COUNT: usize = $count;

            fn type_names() -> Vec<&'static str> {
                vec![$(std::any::type_name::<$ty>(),)*]
            }

            fn decode(raw: &[Box<RawValue>]) -> serde_json::Result<Self> {
                debug_assert_eq!(raw.len(), Self::COUNT);
                Ok(($(serde_json::from_str::<$ty>(raw[$idx].get())?,)*))
            }
        }
    };
}

impl_params!(0);
impl_params!(1, P0 => 0);
impl_params!(2, P0 => 0, P1 => 1);
impl_params!(3, P0 => 0, P1 => 1, P2 => 2);
impl_params!(4, P0 => 0, P1 => 1, P2 => 2, P3 => 3);
impl_params!(5, P0 => 0, P1 => 1, P2 => 2, P3 => 3, P4 => 4);
impl_params!(6, P0 => 0, P1 => 1, P2 => 2, P3 => 3, P4 => 4, P5 => 5);
impl_params!(7, P0 => 0, P1 => 1, P2 => 2, P3 => 3, P4 => 4, P5 => 5, P6 => 6);
impl_params!(8, P0 => 0, P1 => 1, P2 => 2, P3 => 3, P4 => 4, P5 => 5, P6 => 6, P7 => 7);

/// Marker: the function takes only positional parameters.
pub struct NoCtx(());

/// Marker: the function takes a leading [`Context`].
pub struct WithCtx(());

/// A function usable as a method body.
///
/// `Marker` pins down the calling convention (context or not, parameter
/// tuple); `Ret` is the raw return type. Response shaping is chosen by
/// the registration call, not here, so the same trait serves all four
/// output shapes.
pub trait RpcFn<Marker, Ret>: Send + Sync + 'static {
    /// True when the function takes a leading [`Context`].
    const EXPECTS_CTX: bool;

    /// The positional parameter tuple.
    type Params: Params;

    /// Invoke with an already-decoded parameter tuple.
    fn invoke(&self, ctx: Context, params: Self::Params) -> BoxFuture<'static, Ret>;
}

macro_rules! impl_rpc_fn {
    ($($ty:ident),*) => {
        impl<Func, Fut, Ret, $($ty,)*> RpcFn<(NoCtx, ($($ty,)*)), Ret> for Func
        where
            Func: Fn($($ty),*) -> Fut + Send + Sync + 'static,
            Fut: Future<Output = Ret> + Send + 'static,
            Ret: Send + 'static,
            $($ty: DeserializeOwned + Send + 'static,)*
        {
            const EXPECTS_CTX: bool = false;
            type Params = ($($ty,)*);

            #[allow(non_snake_case)]
            fn invoke(&self, _ctx: Context, params: Self::Params) -> BoxFuture<'static, Ret> {
                let ($($ty,)*) = params;
                Box::pin((self)($($ty),*))
            }
        }

        impl<Func, Fut, Ret, $($ty,)*> RpcFn<(WithCtx, ($($ty,)*)), Ret> for Func
        where
            Func: Fn(Context $(, $ty)*) -> Fut + Send + Sync + 'static,
            Fut: Future<Output = Ret> + Send + 'static,
            Ret: Send + 'static,
            $($ty: DeserializeOwned + Send + 'static,)*
        {
            const EXPECTS_CTX: bool = true;
            type Params = ($($ty,)*);

            #[allow(non_snake_case)]
            fn invoke(&self, ctx: Context, params: Self::Params) -> BoxFuture<'static, Ret> {
                let ($($ty,)*) = params;
                Box::pin((self)(ctx $(, $ty)*))
            }
        }
    };
}

impl_rpc_fn!();
impl_rpc_fn!(P0);
impl_rpc_fn!(P0, P1);
impl_rpc_fn!(P0, P1, P2);
impl_rpc_fn!(P0, P1, P2, P3);
impl_rpc_fn!(P0, P1, P2, P3, P4);
impl_rpc_fn!(P0, P1, P2, P3, P4, P5);
impl_rpc_fn!(P0, P1, P2, P3, P4, P5, P6);
impl_rpc_fn!(P0, P1, P2, P3, P4, P5, P6, P7);

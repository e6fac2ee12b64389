//! # sigminer-core
//!
//! Canonical function signatures from DWARF debug information.
//!
//! Given a shared object (or executable) and a symbol name, this crate finds
//! the function's `DW_TAG_subprogram` entry and reduces its return type and
//! parameters to a small, debug-format-agnostic taxonomy:
//!
//! ```text
//! int add(const int a, float b, char *s, ...)
//!     => fn(i32, f32, pointer(8), ...) -> i32
//! ```
//!
//! ## Layout
//!
//! - [`types`]: the public data model (`TypeEntry`, `Signature`, `SignatureResult`)
//! - [`symbols`]: object file loading, symbol lookup and the DWARF entry graph
//! - [`signature`]: wrapper stripping, type classification, signature assembly
//! - [`query`]: the one-call API and the configurable [`SignatureQuery`]
//!
//! ## Error model
//!
//! Internal plumbing returns [`Result`]. At the public boundary every error is
//! reduced to a [`ReturnCode`](types::ReturnCode); no query panics.

pub mod error;
pub mod prelude;
pub mod query;
pub mod signature;
pub mod symbols;
pub mod types;

#[cfg(test)]
mod testing;

pub use error::{Result, SigminerError};
pub use query::{get_signature_from_shared_object_by_symbol, SignatureQuery, UnknownTypePolicy};
pub use symbols::BinaryImage;
pub use types::{PrimitiveKind, ReturnCode, Signature, SignatureResult, TypeEntry};

//! # Signature
//!
//! The type-classification core, leaves first:
//!
//! 1. [`strip`]: follow typedef/qualifier chains to the underlying type
//! 2. [`classify`]: collapse an entry into a [`TypeEntry`](crate::types::TypeEntry)
//! 3. [`builder`]: walk a subprogram and assemble a [`Signature`](crate::types::Signature)
//!
//! Nothing in this module fails on a malformed type. Unclassifiable shapes
//! become [`PrimitiveKind::Unknown`](crate::types::PrimitiveKind::Unknown) and
//! it is up to the caller's [`UnknownTypePolicy`](crate::query::UnknownTypePolicy)
//! whether that is acceptable.

pub mod builder;
pub mod classify;
pub mod strip;

pub use builder::SignatureBuilder;
pub use classify::{classify, TypeTag};
pub use strip::{is_type_wrapper, strip_type_wrappers};

//! # Types
//!
//! Public data model of the crate: the canonical type taxonomy, signatures,
//! query results, and the small presentation types used when reporting
//! symbols.

pub mod address;
pub mod arch;
pub mod result;
pub mod signature;
pub mod symbols;

pub use address::Address;
pub use arch::Architecture;
pub use result::{ReturnCode, SignatureResult};
pub use signature::{PrimitiveKind, Signature, TypeEntry};
pub use symbols::{SourceLocation, SymbolLanguage, SymbolName};

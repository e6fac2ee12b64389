//! Common module for library exports

pub use crate::error::{Result, SigminerError};
pub use crate::query::{get_signature_from_shared_object_by_symbol, SignatureQuery, UnknownTypePolicy};
pub use crate::symbols::{BinaryImage, FunctionSymbol};
pub use crate::types::{
    Address, Architecture, PrimitiveKind, ReturnCode, Signature, SignatureResult, SourceLocation, SymbolName, TypeEntry,
};

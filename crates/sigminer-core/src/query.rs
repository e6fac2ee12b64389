//! # Query
//!
//! The one-call entry point, plus [`SignatureQuery`] for callers that want
//! a non-default [`UnknownTypePolicy`].
//!
//! Nothing in this module panics or returns an error: every failure ends up
//! as a [`ReturnCode`](crate::types::ReturnCode) inside the [`SignatureResult`].

use std::path::Path;

use tracing::debug;

use crate::error::{Result, SigminerError};
use crate::symbols::BinaryImage;
use crate::types::{Signature, SignatureResult};

/// What to do with a slot that classified as
/// [`PrimitiveKind::Unknown`](crate::types::PrimitiveKind::Unknown).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnknownTypePolicy
{
    /// Report the slot as unknown and succeed.
    #[default]
    Degrade,
    /// Fail the whole query with [`ReturnCode::UnsupportedType`](crate::types::ReturnCode::UnsupportedType).
    Strict,
}

impl UnknownTypePolicy
{
    /// Pass `signature` through, or reject it under the strict policy.
    ///
    /// ## Errors
    ///
    /// [`SigminerError::UnsupportedType`] naming the first unknown slot.
    pub fn enforce(self, signature: Signature) -> Result<Signature>
    {
        if self == UnknownTypePolicy::Degrade {
            return Ok(signature);
        }

        if signature.ret().is_unknown() {
            return Err(SigminerError::UnsupportedType {
                slot: String::from("return"),
            });
        }
        if let Some(index) = signature.params().iter().position(|param| param.is_unknown()) {
            return Err(SigminerError::UnsupportedType {
                slot: format!("parameter {index}"),
            });
        }
        Ok(signature)
    }
}

/// Configurable signature query.
///
/// ## Example
///
/// ```rust,no_run
/// use sigminer_core::query::{SignatureQuery, UnknownTypePolicy};
/// use sigminer_core::types::ReturnCode;
///
/// let result = SignatureQuery::new()
///     .unknown_types(UnknownTypePolicy::Strict)
///     .run("/usr/lib/libexample.so", "example_add");
/// if result.ret_code() == ReturnCode::Success {
///     println!("{}", result.signature().unwrap());
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct SignatureQuery
{
    policy: UnknownTypePolicy,
}

impl SignatureQuery
{
    #[must_use]
    pub fn new() -> Self
    {
        Self::default()
    }

    #[must_use]
    pub fn unknown_types(mut self, policy: UnknownTypePolicy) -> Self
    {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> UnknownTypePolicy
    {
        self.policy
    }

    /// Load `path` and build the signature of `symbol`.
    pub fn run(&self, path: impl AsRef<Path>, symbol: &str) -> SignatureResult
    {
        self.try_run(path.as_ref(), symbol).into()
    }

    /// Build the signature of `symbol` in an image that is already open.
    ///
    /// Use this to answer several queries without reloading the binary.
    pub fn run_on(&self, image: &BinaryImage, symbol: &str) -> SignatureResult
    {
        self.try_run_on(image, symbol).into()
    }

    fn try_run(&self, path: &Path, symbol: &str) -> Result<Signature>
    {
        if path.as_os_str().is_empty() {
            return Err(SigminerError::InvalidInput(String::from("empty binary path")));
        }
        check_symbol(symbol)?;

        debug!(path = %path.display(), symbol, policy = ?self.policy, "signature query");
        self.try_run_on(&BinaryImage::open(path)?, symbol)
    }

    fn try_run_on(&self, image: &BinaryImage, symbol: &str) -> Result<Signature>
    {
        check_symbol(symbol)?;
        image.try_signature(symbol, self.policy)
    }
}

fn check_symbol(symbol: &str) -> Result<()>
{
    if symbol.is_empty() {
        return Err(SigminerError::InvalidInput(String::from("empty symbol name")));
    }
    Ok(())
}

/// Canonical signature of `symbol` in the binary at `path`.
///
/// Uses [`UnknownTypePolicy::Degrade`]. The result carries a signature if
/// and only if its code is [`ReturnCode::Success`](crate::types::ReturnCode::Success).
///
/// ```rust,no_run
/// use sigminer_core::get_signature_from_shared_object_by_symbol;
///
/// let result = get_signature_from_shared_object_by_symbol("libm.so.6", "ldexp");
/// println!("{}", result.ret_code());
/// ```
pub fn get_signature_from_shared_object_by_symbol(path: impl AsRef<Path>, symbol: &str) -> SignatureResult
{
    SignatureQuery::new().run(path, symbol)
}

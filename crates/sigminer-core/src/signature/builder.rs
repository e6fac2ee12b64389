//! Assemble a [`Signature`] from a `DW_TAG_subprogram` entry.

use std::collections::HashSet;

use gimli::constants;
use tracing::{debug, trace};

use super::classify::classify;
use super::strip::strip_type_wrappers;
use crate::error::{Result, SigminerError};
use crate::symbols::{DebugGraph, DieRef};
use crate::types::{Address, Signature, SignatureResult};

/// Builds signatures from subprogram entries of one [`DebugGraph`].
///
/// The builder holds no state beyond the borrowed graph; a single instance
/// can build any number of signatures.
pub struct SignatureBuilder<'g, 'a>
{
    graph: &'g DebugGraph<'a>,
}

impl<'g, 'a> SignatureBuilder<'g, 'a>
{
    #[must_use]
    pub fn new(graph: &'g DebugGraph<'a>) -> Self
    {
        Self { graph }
    }

    /// Build the signature of `function`, folding any failure into the result code.
    #[must_use]
    pub fn build(&self, function: Option<DieRef>) -> SignatureResult
    {
        self.try_build(function).into()
    }

    /// Build the signature of `function`.
    ///
    /// ## Errors
    ///
    /// - [`SigminerError::FunctionNotInRange`] if `function` is `None`
    /// - [`SigminerError::Dwarf`] if the parameter list cannot be walked
    pub fn try_build(&self, function: Option<DieRef>) -> Result<Signature>
    {
        let Some(function) = function else {
            return Err(SigminerError::FunctionNotInRange {
                symbol: String::from("<unresolved>"),
                address: Address::ZERO,
            });
        };

        let ret_type = self.return_type(function);
        let ret = classify(self.graph, strip_type_wrappers(self.graph, ret_type));

        let mut params = Vec::new();
        let mut has_var_args = false;
        for child in self.graph.children(function)? {
            match self.graph.tag(child) {
                Some(constants::DW_TAG_formal_parameter) => {
                    let ty = self.parameter_type(child);
                    params.push(classify(self.graph, strip_type_wrappers(self.graph, ty)));
                }
                Some(constants::DW_TAG_unspecified_parameters) => has_var_args = true,
                _ => {}
            }
        }

        trace!(?function, params = params.len(), has_var_args, "built signature");
        Ok(Signature::new(ret, params, has_var_args))
    }

    /// `DW_AT_type` of the subprogram, or of the declaration it completes.
    fn return_type(&self, function: DieRef) -> Option<DieRef>
    {
        let mut current = function;
        let mut seen = HashSet::new();

        while seen.insert(current) {
            if let Some(ty) = self.graph.reference(current, constants::DW_AT_type) {
                return Some(ty);
            }
            let origin = self
                .graph
                .reference(current, constants::DW_AT_specification)
                .or_else(|| self.graph.reference(current, constants::DW_AT_abstract_origin));
            match origin {
                Some(next) => current = next,
                None => return None,
            }
        }

        debug!(?function, "cycle in declaration links");
        None
    }

    fn parameter_type(&self, param: DieRef) -> Option<DieRef>
    {
        self.graph.reference(param, constants::DW_AT_type).or_else(|| {
            self.graph
                .reference(param, constants::DW_AT_abstract_origin)
                .and_then(|origin| self.graph.reference(origin, constants::DW_AT_type))
        })
    }
}

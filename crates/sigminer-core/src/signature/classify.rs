//! Collapse a DWARF type entry into a [`TypeEntry`].

use gimli::{constants, DwTag};
use tracing::debug;

use super::strip::{is_type_wrapper, strip_type_wrappers};
use crate::symbols::{DebugGraph, DieRef};
use crate::types::{PrimitiveKind, TypeEntry};

/// The tag families the classifier distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeTag
{
    /// Typedef or qualifier.
    Wrapper,
    Base,
    /// Pointer, lvalue reference or rvalue reference.
    Pointer,
    Enumeration,
    /// Structure, union, class or array.
    Aggregate,
    Other,
}

impl From<DwTag> for TypeTag
{
    fn from(tag: DwTag) -> Self
    {
        match tag {
            tag if is_type_wrapper(tag) => TypeTag::Wrapper,
            constants::DW_TAG_base_type => TypeTag::Base,
            constants::DW_TAG_pointer_type
            | constants::DW_TAG_reference_type
            | constants::DW_TAG_rvalue_reference_type => TypeTag::Pointer,
            constants::DW_TAG_enumeration_type => TypeTag::Enumeration,
            constants::DW_TAG_structure_type
            | constants::DW_TAG_union_type
            | constants::DW_TAG_class_type
            | constants::DW_TAG_array_type => TypeTag::Aggregate,
            _ => TypeTag::Other,
        }
    }
}

/// Classify a type entry. `None` is `void`.
///
/// Never fails: anything that cannot be read or does not fit the taxonomy
/// becomes [`PrimitiveKind::Unknown`] with size zero.
#[must_use]
pub fn classify(graph: &DebugGraph<'_>, die: Option<DieRef>) -> TypeEntry
{
    let Some(die) = die else {
        return TypeEntry::void();
    };
    let Some(tag) = graph.tag(die) else {
        return TypeEntry::unknown();
    };

    match TypeTag::from(tag) {
        TypeTag::Wrapper => classify_wrapped(graph, die),
        TypeTag::Base => classify_base(graph, die),
        TypeTag::Pointer => {
            let size = byte_size(graph, die)
                .or_else(|| graph.address_size(die).map(usize::from))
                .unwrap_or(0);
            TypeEntry::new(PrimitiveKind::Pointer, size)
        }
        TypeTag::Enumeration => classify_enum(graph, die),
        TypeTag::Aggregate => {
            match byte_size(graph, die) {
                Some(size) => TypeEntry::new(PrimitiveKind::Aggregate, size),
                None if graph.flag(die, constants::DW_AT_declaration) => {
                    debug!(?die, "aggregate is only declared here");
                    TypeEntry::unknown()
                }
                None => TypeEntry::new(PrimitiveKind::Aggregate, 0),
            }
        }
        TypeTag::Other => {
            debug!(?die, %tag, "unclassified type tag");
            TypeEntry::unknown()
        }
    }
}

fn classify_wrapped(graph: &DebugGraph<'_>, die: DieRef) -> TypeEntry
{
    let Some(stripped) = strip_type_wrappers(graph, Some(die)) else {
        return TypeEntry::unknown();
    };

    if !graph.tag(stripped).is_some_and(is_type_wrapper) {
        return classify(graph, Some(stripped));
    }

    // The chain ended on a wrapper: either it qualifies nothing or it never terminates.
    if graph.has_attr(stripped, constants::DW_AT_type) {
        debug!(?die, ?stripped, "wrapper chain is cyclic or broken");
        TypeEntry::unknown()
    } else {
        TypeEntry::void()
    }
}

fn classify_base(graph: &DebugGraph<'_>, die: DieRef) -> TypeEntry
{
    let size = byte_size(graph, die).unwrap_or(0);
    match graph.encoding(die) {
        Some(constants::DW_ATE_boolean) => TypeEntry::new(PrimitiveKind::Bool, size),
        Some(constants::DW_ATE_signed | constants::DW_ATE_signed_char) => TypeEntry::int(size, true),
        Some(constants::DW_ATE_unsigned | constants::DW_ATE_unsigned_char) => TypeEntry::int(size, false),
        Some(constants::DW_ATE_float | constants::DW_ATE_complex_float) => TypeEntry::new(PrimitiveKind::Float, size),
        other => {
            debug!(?die, encoding = ?other, "unsupported base type encoding");
            TypeEntry::unknown()
        }
    }
}

fn classify_enum(graph: &DebugGraph<'_>, die: DieRef) -> TypeEntry
{
    let underlying = strip_type_wrappers(graph, graph.reference(die, constants::DW_AT_type));

    let size = byte_size(graph, die)
        .or_else(|| underlying.and_then(|ty| byte_size(graph, ty)))
        .unwrap_or(0);
    // Only a base type carries signedness; the underlying entry is never classified recursively.
    let signed = underlying.is_some_and(|ty| {
        graph.tag(ty) == Some(constants::DW_TAG_base_type)
            && matches!(
                graph.encoding(ty),
                Some(constants::DW_ATE_signed | constants::DW_ATE_signed_char)
            )
    });
    TypeEntry::enumeration(size, signed)
}

fn byte_size(graph: &DebugGraph<'_>, die: DieRef) -> Option<usize>
{
    graph
        .udata(die, constants::DW_AT_byte_size)
        .and_then(|size| usize::try_from(size).ok())
}

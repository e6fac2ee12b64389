//! Read-only view over the DWARF entry graph.
//!
//! [`DebugGraph`] owns nothing but parsed unit headers; the section data
//! belongs to the [`OwnedDwarf`] it borrows. Entries are addressed with
//! [`DieRef`], which doubles as the identity key used to detect cycles.
//!
//! Attribute primitives never fail: a gimli error while reading one
//! attribute is logged and treated as if the attribute were absent, so one
//! malformed type cannot abort a whole signature. Walks that must be complete
//! to be meaningful ([`DebugGraph::children`],
//! [`DebugGraph::function_containing`]) do propagate errors.

use gimli::{
    constants, AttributeValue, DebugTypeSignature, DebuggingInformationEntry, DwAt, DwAte, DwTag, Reader, Unit,
    UnitOffset, UnitSectionOffset, UnitType,
};
use tracing::{debug, trace};

use super::{OwnedDwarf, OwnedReader};
use crate::error::{map_dwarf_error, Result};
use crate::types::Address;

/// Handle to one debugging information entry.
///
/// The pair (unit index within the graph, offset within that unit) is the
/// node's structural identity: two handles are equal if and only if they name
/// the same entry, whichever reference form led to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DieRef
{
    unit: usize,
    offset: usize,
}

impl DieRef
{
    /// Index of the owning unit in [`DebugGraph`] order.
    #[must_use]
    pub fn unit_index(self) -> usize
    {
        self.unit
    }

    /// Offset of the entry relative to its unit header.
    #[must_use]
    pub fn unit_offset(self) -> usize
    {
        self.offset
    }
}

/// All compilation and type units of one DWARF context.
pub struct DebugGraph<'a>
{
    dwarf: &'a OwnedDwarf,
    units: Vec<Unit<OwnedReader>>,
}

impl<'a> DebugGraph<'a>
{
    /// Parse every unit header in `.debug_info` and `.debug_types`.
    ///
    /// ## Errors
    ///
    /// Returns [`SigminerError::Dwarf`](crate::error::SigminerError::Dwarf) if
    /// a unit header or its abbreviations cannot be parsed.
    pub fn new(dwarf: &'a OwnedDwarf) -> Result<Self>
    {
        let mut units = Vec::new();
        let mut headers = dwarf.units();
        while let Some(header) = headers
            .next()
            .map_err(|err| map_dwarf_error("reading .debug_info unit header", err))?
        {
            units.push(
                dwarf
                    .unit(header)
                    .map_err(|err| map_dwarf_error("parsing compilation unit", err))?,
            );
        }

        let mut type_headers = dwarf.type_units();
        while let Some(header) = type_headers
            .next()
            .map_err(|err| map_dwarf_error("reading .debug_types unit header", err))?
        {
            units.push(dwarf.unit(header).map_err(|err| map_dwarf_error("parsing type unit", err))?);
        }

        debug!(units = units.len(), "loaded DWARF units");
        Ok(Self { dwarf, units })
    }

    #[must_use]
    pub fn unit_count(&self) -> usize
    {
        self.units.len()
    }

    /// Tag of the entry, or `None` if the entry cannot be parsed.
    #[must_use]
    pub fn tag(&self, die: DieRef) -> Option<DwTag>
    {
        self.with_entry(die, |_, entry| entry.tag())
    }

    /// Whether the attribute is present at all, whatever its value.
    #[must_use]
    pub fn has_attr(&self, die: DieRef, name: DwAt) -> bool
    {
        self.attr_value(die, name).is_some()
    }

    /// Unsigned constant value of an attribute.
    #[must_use]
    pub fn udata(&self, die: DieRef, name: DwAt) -> Option<u64>
    {
        self.attr_value(die, name).and_then(|value| value.udata_value())
    }

    /// Value of a flag attribute; absent means `false`.
    #[must_use]
    pub fn flag(&self, die: DieRef, name: DwAt) -> bool
    {
        matches!(self.attr_value(die, name), Some(AttributeValue::Flag(true)))
    }

    /// `DW_AT_encoding` of a base type.
    #[must_use]
    pub fn encoding(&self, die: DieRef) -> Option<DwAte>
    {
        match self.attr_value(die, constants::DW_AT_encoding)? {
            AttributeValue::Encoding(encoding) => Some(encoding),
            other => other
                .udata_value()
                .and_then(|value| u8::try_from(value).ok())
                .map(DwAte),
        }
    }

    /// Entry referenced by `name` (usually `DW_AT_type`).
    ///
    /// Returns `None` when the attribute is absent, is not a reference, or
    /// points at something that cannot be parsed.
    #[must_use]
    pub fn reference(&self, die: DieRef, name: DwAt) -> Option<DieRef>
    {
        let value = self.attr_value(die, name)?;
        let target = match value {
            AttributeValue::UnitRef(offset) => Some(DieRef {
                unit: die.unit,
                offset: offset.0,
            }),
            AttributeValue::DebugInfoRef(offset) => self.find_unit_for_offset(UnitSectionOffset::from(offset)),
            AttributeValue::DebugTypesRef(signature) => self.find_type_unit_entry(signature),
            other => {
                debug!(?die, attr = %name, value = ?other, "attribute is not a reference");
                None
            }
        }?;

        if self.tag(target).is_none() {
            debug!(?die, ?target, attr = %name, "reference does not resolve to a readable entry");
            return None;
        }
        Some(target)
    }

    /// Direct children of an entry, in the order they appear.
    ///
    /// ## Errors
    ///
    /// Returns [`SigminerError::Dwarf`](crate::error::SigminerError::Dwarf) if
    /// the entry tree cannot be walked. A partial child list would silently
    /// drop parameters, so it is never returned.
    pub fn children(&self, die: DieRef) -> Result<Vec<DieRef>>
    {
        let Some(unit) = self.units.get(die.unit) else {
            return Ok(Vec::new());
        };

        let mut tree = unit
            .entries_tree(Some(UnitOffset(die.offset)))
            .map_err(|err| map_dwarf_error("building entry tree", err))?;
        let root = tree.root().map_err(|err| map_dwarf_error("navigating entry root", err))?;
        let mut children = root.children();
        let mut found = Vec::new();
        while let Some(child) = children
            .next()
            .map_err(|err| map_dwarf_error("iterating entry children", err))?
        {
            found.push(DieRef {
                unit: die.unit,
                offset: child.entry().offset().0,
            });
        }
        Ok(found)
    }

    /// Address size (pointer width) of the unit owning `die`.
    #[must_use]
    pub fn address_size(&self, die: DieRef) -> Option<u8>
    {
        self.units.get(die.unit).map(|unit| unit.encoding().address_size)
    }

    /// `DW_AT_name`, falling back to `DW_AT_linkage_name`.
    #[must_use]
    pub fn name(&self, die: DieRef) -> Option<String>
    {
        let unit = self.units.get(die.unit)?;
        [constants::DW_AT_name, constants::DW_AT_linkage_name]
            .into_iter()
            .find_map(|attr| self.attr_value(die, attr))
            .and_then(|value| self.attr_to_string(unit, value))
    }

    /// First `DW_TAG_subprogram` whose code ranges contain `address`.
    ///
    /// An entry that only records `DW_AT_low_pc` matches when the address is
    /// exactly its entry point.
    ///
    /// ## Errors
    ///
    /// Returns [`SigminerError::Dwarf`](crate::error::SigminerError::Dwarf) if
    /// a unit's entry tree or range lists cannot be read.
    pub fn function_containing(&self, address: Address) -> Result<Option<DieRef>>
    {
        for (index, unit) in self.units.iter().enumerate() {
            let mut cursor = unit.entries();
            while let Some((_delta, entry)) = cursor
                .next_dfs()
                .map_err(|err| map_dwarf_error("traversing DIE tree", err))?
            {
                if entry.tag() != constants::DW_TAG_subprogram {
                    continue;
                }
                if self.covers(unit, entry, address)? {
                    let die = DieRef {
                        unit: index,
                        offset: entry.offset().0,
                    };
                    trace!(?die, %address, "subprogram covers address");
                    return Ok(Some(die));
                }
            }
        }
        Ok(None)
    }

    /// First entry, in any unit, whose name is `name`.
    #[cfg(test)]
    pub(crate) fn find_named(&self, name: &str) -> Option<DieRef>
    {
        for (index, unit) in self.units.iter().enumerate() {
            let mut cursor = unit.entries();
            while let Ok(Some((_delta, entry))) = cursor.next_dfs() {
                let die = DieRef {
                    unit: index,
                    offset: entry.offset().0,
                };
                if self.name(die).as_deref() == Some(name) {
                    return Some(die);
                }
            }
        }
        None
    }

    fn covers(
        &self,
        unit: &Unit<OwnedReader>,
        entry: &DebuggingInformationEntry<'_, '_, OwnedReader>,
        address: Address,
    ) -> Result<bool>
    {
        let mut ranges = self
            .dwarf
            .die_ranges(unit, entry)
            .map_err(|err| map_dwarf_error("reading subprogram ranges", err))?;
        while let Some(range) = ranges
            .next()
            .map_err(|err| map_dwarf_error("iterating subprogram ranges", err))?
        {
            if address.within(range.begin, range.end) {
                return Ok(true);
            }
        }

        let low_pc = match entry
            .attr_value(constants::DW_AT_low_pc)
            .map_err(|err| map_dwarf_error("reading DW_AT_low_pc", err))?
        {
            Some(value) => self
                .dwarf
                .attr_address(unit, value)
                .map_err(|err| map_dwarf_error("resolving DW_AT_low_pc", err))?,
            None => None,
        };
        Ok(low_pc == Some(address.value()))
    }

    fn with_entry<T>(
        &self,
        die: DieRef,
        f: impl FnOnce(&Unit<OwnedReader>, &DebuggingInformationEntry<'_, '_, OwnedReader>) -> T,
    ) -> Option<T>
    {
        let unit = self.units.get(die.unit)?;
        match unit.entry(UnitOffset(die.offset)) {
            Ok(entry) => Some(f(unit, &entry)),
            Err(err) => {
                debug!(?die, %err, "unreadable entry");
                None
            }
        }
    }

    fn attr_value(&self, die: DieRef, name: DwAt) -> Option<AttributeValue<OwnedReader>>
    {
        self.with_entry(die, |_, entry| match entry.attr_value(name) {
            Ok(value) => value,
            Err(err) => {
                debug!(?die, attr = %name, %err, "unreadable attribute");
                None
            }
        })
        .flatten()
    }

    fn attr_to_string(&self, unit: &Unit<OwnedReader>, value: AttributeValue<OwnedReader>) -> Option<String>
    {
        let reader = self.dwarf.attr_string(unit, value).ok()?;
        match Reader::to_string(&reader) {
            Ok(cow) => Some(cow.into_owned()),
            Err(_) => Reader::to_string_lossy(&reader).ok().map(std::borrow::Cow::into_owned),
        }
    }

    fn find_unit_for_offset(&self, target: UnitSectionOffset<usize>) -> Option<DieRef>
    {
        self.units.iter().enumerate().find_map(|(index, unit)| {
            target.to_unit_offset(unit).map(|offset| DieRef {
                unit: index,
                offset: offset.0,
            })
        })
    }

    fn find_type_unit_entry(&self, signature: DebugTypeSignature) -> Option<DieRef>
    {
        self.units.iter().enumerate().find_map(|(index, unit)| match unit.header.type_() {
            UnitType::Type {
                type_signature,
                type_offset,
            }
            | UnitType::SplitType {
                type_signature,
                type_offset,
            } if type_signature == signature => Some(DieRef {
                unit: index,
                offset: type_offset.0,
            }),
            _ => None,
        })
    }
}

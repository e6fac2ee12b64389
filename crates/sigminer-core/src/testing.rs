//! In-memory DWARF fixtures for unit tests.
//!
//! Entries are written with `gimli::write`, serialised, and read back through
//! [`DebugSections`], so the code under test sees exactly what it would see in
//! a real binary. Every entry gets a `DW_AT_name` so tests can find it again
//! after the round trip.

use gimli::write::{Address, AttributeValue, DwarfUnit, EndianVec, Sections, UnitEntryId};
use gimli::{constants, DwAt, DwAte, DwTag, Encoding, Format, LittleEndian, RunTimeEndian};

use crate::symbols::{DebugGraph, DebugSections, DieRef};

pub(crate) struct DwarfFixture
{
    dwarf: DwarfUnit,
}

impl DwarfFixture
{
    pub(crate) fn new() -> Self
    {
        Self::with_address_size(8)
    }

    pub(crate) fn with_address_size(address_size: u8) -> Self
    {
        let encoding = Encoding {
            format: Format::Dwarf32,
            version: 4,
            address_size,
        };
        Self {
            dwarf: DwarfUnit::new(encoding),
        }
    }

    /// Named entry directly under the compilation unit.
    pub(crate) fn add(&mut self, name: &str, tag: DwTag) -> UnitEntryId
    {
        let root = self.dwarf.unit.root();
        self.add_child(root, name, tag)
    }

    pub(crate) fn add_child(&mut self, parent: UnitEntryId, name: &str, tag: DwTag) -> UnitEntryId
    {
        let id = self.dwarf.unit.add(parent, tag);
        self.set(id, constants::DW_AT_name, AttributeValue::String(name.as_bytes().to_vec()));
        id
    }

    pub(crate) fn set(&mut self, id: UnitEntryId, attr: DwAt, value: AttributeValue)
    {
        self.dwarf.unit.get_mut(id).set(attr, value);
    }

    pub(crate) fn set_type(&mut self, id: UnitEntryId, target: UnitEntryId)
    {
        self.set(id, constants::DW_AT_type, AttributeValue::UnitRef(target));
    }

    pub(crate) fn base(&mut self, name: &str, encoding: DwAte, size: u8) -> UnitEntryId
    {
        let id = self.add(name, constants::DW_TAG_base_type);
        self.set(id, constants::DW_AT_encoding, AttributeValue::Encoding(encoding));
        self.set(id, constants::DW_AT_byte_size, AttributeValue::Data1(size));
        id
    }

    /// Qualifier or typedef over `inner`; `None` leaves `DW_AT_type` off.
    pub(crate) fn wrapper(&mut self, name: &str, tag: DwTag, inner: Option<UnitEntryId>) -> UnitEntryId
    {
        let id = self.add(name, tag);
        if let Some(inner) = inner {
            self.set_type(id, inner);
        }
        id
    }

    /// Pointer without `DW_AT_byte_size`, so the unit address size applies.
    pub(crate) fn pointer(&mut self, name: &str, pointee: Option<UnitEntryId>) -> UnitEntryId
    {
        self.wrapper(name, constants::DW_TAG_pointer_type, pointee)
    }

    pub(crate) fn sized(&mut self, name: &str, tag: DwTag, size: u8) -> UnitEntryId
    {
        let id = self.add(name, tag);
        self.set(id, constants::DW_AT_byte_size, AttributeValue::Data1(size));
        id
    }

    /// `DW_TAG_subprogram` with one formal parameter per entry in `params`.
    ///
    /// `pc` is `(low_pc, length)`.
    pub(crate) fn function(
        &mut self,
        name: &str,
        ret: Option<UnitEntryId>,
        params: &[UnitEntryId],
        variadic: bool,
        pc: Option<(u64, u64)>,
    ) -> UnitEntryId
    {
        let id = self.add(name, constants::DW_TAG_subprogram);
        if let Some(ret) = ret {
            self.set_type(id, ret);
        }
        if let Some((low, len)) = pc {
            self.set(id, constants::DW_AT_low_pc, AttributeValue::Address(Address::Constant(low)));
            self.set(id, constants::DW_AT_high_pc, AttributeValue::Udata(len));
        }
        for (index, param) in params.iter().enumerate() {
            let child = self.add_child(id, &format!("{name}_arg{index}"), constants::DW_TAG_formal_parameter);
            self.set_type(child, *param);
        }
        if variadic {
            self.add_child(id, &format!("{name}_varargs"), constants::DW_TAG_unspecified_parameters);
        }
        id
    }

    pub(crate) fn finish(mut self) -> DebugSections
    {
        let mut sections = Sections::new(EndianVec::new(LittleEndian));
        self.dwarf.write(&mut sections).expect("failed to write fixture DWARF");

        let mut raw = Vec::new();
        sections
            .for_each(|id, data| {
                raw.push((id.name(), data.slice().to_vec()));
                Ok::<(), gimli::write::Error>(())
            })
            .expect("failed to collect fixture sections");
        DebugSections::from_raw(RunTimeEndian::Little, raw)
    }
}

/// Look up a fixture entry by the name it was given.
pub(crate) fn find(graph: &DebugGraph<'_>, name: &str) -> DieRef
{
    graph
        .find_named(name)
        .unwrap_or_else(|| panic!("fixture entry {name} not found"))
}

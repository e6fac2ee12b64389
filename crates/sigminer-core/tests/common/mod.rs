//! Builds a small x86-64 ELF object with hand-written DWARF.
//!
//! The layout mirrors what a C compiler emits for:
//!
//! ```c
//! int    add_numbers(int a, float b, char *s);
//! void   log_message(const char *fmt, ...);
//! void   noop(void);
//! double scaled(double x);          /* exported under a Rust mangled name */
//! int    consume_opaque(struct opaque o);
//! void   orphan(void);              /* symbol only, no debug entry */
//! ```

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use gimli::write::{Address, AttributeValue, DwarfUnit, EndianVec, Sections, UnitEntryId};
use gimli::{constants, DwAte, DwTag, Encoding, Format, LittleEndian};
use object::write::{Object, Symbol, SymbolSection};
use object::{Architecture, BinaryFormat, Endianness, SectionKind, SymbolFlags, SymbolKind, SymbolScope};
use tempfile::TempDir;

pub const SCALED_MANGLED: &str = "_ZN7sigdemo6scaled17h0123456789abcdefE";

/// (symbol, offset in .text, size)
const FUNCTIONS: [(&str, u64, u64); 6] = [
    ("add_numbers", 0x10, 0x20),
    ("log_message", 0x30, 0x20),
    ("noop", 0x50, 0x10),
    (SCALED_MANGLED, 0x60, 0x10),
    ("consume_opaque", 0x70, 0x10),
    ("orphan", 0x80, 0x10),
];

const TEXT_SIZE: usize = 0x90;

/// A fixture binary on disk; the directory is removed on drop.
pub struct Fixture
{
    _dir: TempDir,
    pub path: PathBuf,
}

/// Library with symbols and full debug information.
pub fn library() -> Fixture
{
    write_fixture("libsigdemo.so", &build_object(true))
}

/// The same library after `strip --strip-debug`.
pub fn stripped_library() -> Fixture
{
    write_fixture("libsigdemo-stripped.so", &build_object(false))
}

/// A file that is not an object file at all.
pub fn garbage() -> Fixture
{
    write_fixture("garbage.so", b"this is not an ELF file\n")
}

fn write_fixture(name: &str, bytes: &[u8]) -> Fixture
{
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = dir.path().join(name);
    fs::write(&path, bytes).expect("failed to write fixture");
    Fixture { _dir: dir, path }
}

fn build_object(with_debug: bool) -> Vec<u8>
{
    let mut obj = Object::new(BinaryFormat::Elf, Architecture::X86_64, Endianness::Little);

    let text = obj.section_id(object::write::StandardSection::Text);
    obj.append_section_data(text, &[0xc3; TEXT_SIZE], 16);

    for (name, offset, size) in FUNCTIONS {
        obj.add_symbol(Symbol {
            name: name.as_bytes().to_vec(),
            value: offset,
            size,
            kind: SymbolKind::Text,
            scope: SymbolScope::Dynamic,
            weak: false,
            section: SymbolSection::Section(text),
            flags: SymbolFlags::None,
        });
    }

    if with_debug {
        for (name, data) in debug_sections() {
            let section = obj.add_section(Vec::new(), name.as_bytes().to_vec(), SectionKind::Debug);
            obj.append_section_data(section, &data, 1);
        }
    }

    obj.write().expect("failed to write ELF fixture")
}

fn debug_sections() -> Vec<(&'static str, Vec<u8>)>
{
    let encoding = Encoding {
        format: Format::Dwarf32,
        version: 4,
        address_size: 8,
    };
    let mut dwarf = DwarfUnit::new(encoding);
    let root = dwarf.unit.root();
    dwarf
        .unit
        .get_mut(root)
        .set(constants::DW_AT_name, AttributeValue::String(b"sigdemo.c".to_vec()));

    let int = base(&mut dwarf, "int", constants::DW_ATE_signed, 4);
    let float = base(&mut dwarf, "float", constants::DW_ATE_float, 4);
    let double = base(&mut dwarf, "double", constants::DW_ATE_float, 8);
    let ch = base(&mut dwarf, "char", constants::DW_ATE_signed_char, 1);
    let const_char = typed(&mut dwarf, constants::DW_TAG_const_type, Some(ch));
    let char_ptr = typed(&mut dwarf, constants::DW_TAG_pointer_type, Some(ch));
    let const_char_ptr = typed(&mut dwarf, constants::DW_TAG_pointer_type, Some(const_char));

    let opaque = dwarf.unit.add(root, constants::DW_TAG_structure_type);
    let entry = dwarf.unit.get_mut(opaque);
    entry.set(constants::DW_AT_name, AttributeValue::String(b"opaque".to_vec()));
    entry.set(constants::DW_AT_declaration, AttributeValue::Flag(true));

    subprogram(&mut dwarf, "add_numbers", Some(int), &[int, float, char_ptr], false, (0x10, 0x20));
    subprogram(&mut dwarf, "log_message", None, &[const_char_ptr], true, (0x30, 0x20));
    subprogram(&mut dwarf, "noop", None, &[], false, (0x50, 0x10));
    subprogram(&mut dwarf, "scaled", Some(double), &[double], false, (0x60, 0x10));
    subprogram(&mut dwarf, "consume_opaque", Some(int), &[opaque], false, (0x70, 0x10));

    let mut sections = Sections::new(EndianVec::new(LittleEndian));
    dwarf.write(&mut sections).expect("failed to write DWARF");

    let mut raw = Vec::new();
    sections
        .for_each(|id, data| {
            if !data.slice().is_empty() {
                raw.push((id.name(), data.slice().to_vec()));
            }
            Ok::<(), gimli::write::Error>(())
        })
        .expect("failed to collect DWARF sections");
    raw
}

fn base(dwarf: &mut DwarfUnit, name: &str, encoding: DwAte, size: u8) -> UnitEntryId
{
    let root = dwarf.unit.root();
    let id = dwarf.unit.add(root, constants::DW_TAG_base_type);
    let entry = dwarf.unit.get_mut(id);
    entry.set(constants::DW_AT_name, AttributeValue::String(name.as_bytes().to_vec()));
    entry.set(constants::DW_AT_encoding, AttributeValue::Encoding(encoding));
    entry.set(constants::DW_AT_byte_size, AttributeValue::Data1(size));
    id
}

fn typed(dwarf: &mut DwarfUnit, tag: DwTag, inner: Option<UnitEntryId>) -> UnitEntryId
{
    let root = dwarf.unit.root();
    let id = dwarf.unit.add(root, tag);
    if let Some(inner) = inner {
        dwarf.unit.get_mut(id).set(constants::DW_AT_type, AttributeValue::UnitRef(inner));
    }
    id
}

fn subprogram(
    dwarf: &mut DwarfUnit,
    name: &str,
    ret: Option<UnitEntryId>,
    params: &[UnitEntryId],
    variadic: bool,
    (low, len): (u64, u64),
)
{
    let root = dwarf.unit.root();
    let id = dwarf.unit.add(root, constants::DW_TAG_subprogram);
    let entry = dwarf.unit.get_mut(id);
    entry.set(constants::DW_AT_name, AttributeValue::String(name.as_bytes().to_vec()));
    entry.set(constants::DW_AT_external, AttributeValue::Flag(true));
    entry.set(constants::DW_AT_low_pc, AttributeValue::Address(Address::Constant(low)));
    entry.set(constants::DW_AT_high_pc, AttributeValue::Udata(len));
    if let Some(ret) = ret {
        entry.set(constants::DW_AT_type, AttributeValue::UnitRef(ret));
    }

    for param in params {
        let child = dwarf.unit.add(id, constants::DW_TAG_formal_parameter);
        dwarf.unit.get_mut(child).set(constants::DW_AT_type, AttributeValue::UnitRef(*param));
    }
    if variadic {
        dwarf.unit.add(id, constants::DW_TAG_unspecified_parameters);
    }
}

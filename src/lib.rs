// SPDX-FileCopyrightText: © 2025 TTKB, LLC
// SPDX-License-Identifier: BSD-3-CLAUSE

//! SNASM68K COFF and binary to C++ converter
//!
//! This crate reads the COFF objects written by the SNASM68K assembler for the Sega
//! Genesis/Mega Drive and turns them into C/C++ headers: the ROM section becomes a
//! `static const unsigned char[]` and selected symbols become named address constants.
//! Raw binaries can be converted the same way.
//!
//! # Overview
//!
//! - **[COFF]**: a parsed SNASM68K object, with its [FileHeader], exactly
//!   [SECTION_COUNT](layout::SECTION_COUNT) [Section]s, and a symbol table.
//! - **[symbols]**: case-insensitive symbol lookup.
//! - **[emit]**: header text generation.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::path::Path;
//! use bin2cpp::{emit, io, symbols, COFF};
//! use anyhow::Result;
//!
//! fn main() -> Result<()> {
//!     let bytes = io::read(Path::new("GAME.COFF"))?;
//!     let coff = COFF::parse(&bytes)?;
//!
//!     let options = emit::Options::default();
//!     let symbols = symbols::resolve_all(&coff, ["VBlank", "HBlank"]);
//!     println!("{}", emit::emit_byte_array(coff.rom_data(), &options));
//!     println!("{}", emit::emit_symbol_constants(&symbols, &options));
//!
//!     Ok(())
//! }
//! ```

use std::fmt;

use binrw::binrw;
use binrw::io::Cursor;
use binrw::BinRead;
use chrono::{DateTime, Utc};

pub mod cli;
pub mod display;
pub mod emit;
pub mod error;
pub mod io;
pub mod symbols;

pub use error::Error;

pub mod machine {
    //! COFF machine type identifiers.

    /// Motorola 68000 - Sega Genesis, Mega Drive, Sega CD & Mega CD.
    pub const MOTOROLA_68000: u16 = 0x0150;
}

pub mod layout {
    //! The fixed shape of a SNASM68K COFF object.

    /// Size of the [FileHeader](super::FileHeader) record.
    pub const FILE_HEADER_SIZE: usize = 20;

    /// Size of one [SectionHeader](super::SectionHeader) record.
    pub const SECTION_HEADER_SIZE: usize = 40;

    /// Size of one symbol table record, auxiliary records included.
    pub const SYMBOL_SIZE: usize = 18;

    /// SNASM68K always writes this many sections, used or not.
    pub const SECTION_COUNT: usize = 7;

    /// The section holding the assembled ROM image.
    pub const ROM_DATA_SECTION: usize = 0;
}

/// The COFF file header.
///
/// # Structure on Disk
///
/// | Offset | Type  | Description                                                  |
/// |--------|-------|--------------------------------------------------------------|
/// | 0      | `u16` | Machine type. Must be [MOTOROLA_68000](machine::MOTOROLA_68000). |
/// | 2      | `u16` | Number of section headers.                                   |
/// | 4      | `u32` | Creation time in seconds since the Unix epoch.               |
/// | 8      | `u32` | File offset of the symbol table.                             |
/// | 12     | `u32` | Number of symbol table records, including auxiliary records. |
/// | 16     | `u16` | Size of the optional header following this one.              |
/// | 18     | `u16` | Flags.                                                       |
///
/// The section table starts directly after the optional header.
#[binrw]
#[brw(little)]
#[repr(C)]
#[derive(Clone, Debug, PartialEq)]
pub struct FileHeader {
    machine: u16,
    section_count: u16,
    timestamp: u32,
    symbol_table_offset: u32,
    symbol_count: u32,
    optional_header_size: u16,
    flags: u16,
}

impl FileHeader {
    pub fn machine(&self) -> u16 {
        self.machine
    }

    pub fn section_count(&self) -> u16 {
        self.section_count
    }

    pub fn timestamp(&self) -> u32 {
        self.timestamp
    }

    pub fn symbol_table_offset(&self) -> u32 {
        self.symbol_table_offset
    }

    /// Returns the number of raw symbol records, auxiliary records included.
    pub fn symbol_count(&self) -> u32 {
        self.symbol_count
    }

    pub fn optional_header_size(&self) -> u16 {
        self.optional_header_size
    }

    pub fn flags(&self) -> u16 {
        self.flags
    }

    /// Returns the creation timestamp as a UTC `DateTime`.
    pub fn created_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(i64::from(self.timestamp), 0)
    }

    /// Returns the creation timestamp as a formatted string.
    pub fn created(&self) -> String {
        match self.created_datetime() {
            Some(dt) => dt.format("%d-%m-%y %H:%M:%S").to_string(),
            None => format!("{:#010x}", self.timestamp),
        }
    }

    fn section_table_offset(&self) -> usize {
        layout::FILE_HEADER_SIZE + usize::from(self.optional_header_size)
    }
}

/// A COFF section header.
///
/// # Structure on Disk
///
/// | Offset | Type      | Description                                          |
/// |--------|-----------|------------------------------------------------------|
/// | 0      | `[u8; 8]` | Section name, `NULL` padded.                         |
/// | 8      | `u32`     | Physical address.                                    |
/// | 12     | `u32`     | Virtual address.                                     |
/// | 16     | `u32`     | Size of the section's raw data.                      |
/// | 20     | `u32`     | File offset of the raw data, 0 for uninitialised.    |
/// | 24     | `u32`     | File offset of the relocations.                      |
/// | 28     | `u32`     | File offset of the line numbers.                     |
/// | 32     | `u16`     | Number of relocations.                               |
/// | 34     | `u16`     | Number of line numbers.                              |
/// | 36     | `u32`     | Flags.                                               |
#[binrw]
#[brw(little)]
#[repr(C)]
#[derive(Clone, PartialEq)]
pub struct SectionHeader {
    name: [u8; 8],
    physical_address: u32,
    virtual_address: u32,
    size: u32,
    data_offset: u32,
    relocation_offset: u32,
    line_number_offset: u32,
    relocation_count: u16,
    line_number_count: u16,
    flags: u32,
}

impl SectionHeader {
    /// Returns the section name (e.g., ".text", ".data", ".bss").
    pub fn name(&self) -> String {
        c_string(&self.name)
    }

    pub fn physical_address(&self) -> u32 {
        self.physical_address
    }

    pub fn virtual_address(&self) -> u32 {
        self.virtual_address
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn data_offset(&self) -> u32 {
        self.data_offset
    }

    pub fn relocation_count(&self) -> u16 {
        self.relocation_count
    }

    pub fn flags(&self) -> u32 {
        self.flags
    }

    /// Sections without a file offset (`.bss`) occupy no bytes in the file.
    fn has_data(&self) -> bool {
        self.data_offset != 0 && self.size != 0
    }
}

impl fmt::Debug for SectionHeader {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "SectionHeader {{name: \"{}\", paddr: {:#x}, vaddr: {:#x}, size: {}, offset: {:#x}, flags: {:#x}}}",
            self.name(),
            self.physical_address,
            self.virtual_address,
            self.size,
            self.data_offset,
            self.flags,
        )
    }
}

/// A section header and the raw bytes it describes.
#[derive(Clone, Debug, PartialEq)]
pub struct Section<'a> {
    header: SectionHeader,
    data: &'a [u8],
}

impl<'a> Section<'a> {
    fn new(file: &'a [u8], header: SectionHeader) -> Result<Self, Error> {
        if !header.has_data() {
            return Ok(Self { header, data: &[] });
        }
        let start = header.data_offset as usize;
        let data = start
            .checked_add(header.size as usize)
            .and_then(|end| file.get(start..end))
            .ok_or_else(|| {
                Error::malformed(format!(
                    "section \"{}\" data {:#x}+{:#x} extends past end of file ({:#x} bytes)",
                    header.name(),
                    header.data_offset,
                    header.size,
                    file.len()
                ))
            })?;
        Ok(Self { header, data })
    }

    pub fn header(&self) -> &SectionHeader {
        &self.header
    }

    pub fn name(&self) -> String {
        self.header.name()
    }

    /// Returns the section's raw bytes. Empty for uninitialised sections.
    pub fn data(&self) -> &'a [u8] {
        self.data
    }
}

/// A symbol table record as it appears on disk.
///
/// # Structure on Disk
///
/// | Offset | Type      | Description                                                         |
/// |--------|-----------|---------------------------------------------------------------------|
/// | 0      | `[u8; 8]` | Short name, `NULL` padded, or 4 zero bytes and a string table offset. |
/// | 8      | `u32`     | Value. For SNASM68K this is the symbol's address.                   |
/// | 12     | `i16`     | Section number, 1-based. 0 is undefined, -1 absolute.               |
/// | 14     | `u16`     | Type.                                                               |
/// | 16     | `u8`      | Storage class.                                                      |
/// | 17     | `u8`      | Number of auxiliary records following this one.                     |
#[binrw]
#[brw(little)]
#[repr(C)]
#[derive(Clone, Debug, PartialEq)]
struct RawSymbol {
    name: [u8; 8],
    value: u32,
    section_number: i16,
    symbol_type: u16,
    storage_class: u8,
    aux_count: u8,
}

impl RawSymbol {
    fn name(&self, strings: &StringTable) -> Result<String, Error> {
        let (zeroes, offset) = self.name.split_at(4);
        if zeroes.iter().any(|b| *b != 0) {
            return Ok(c_string(&self.name));
        }
        let offset = u32::from_le_bytes([offset[0], offset[1], offset[2], offset[3]]);
        if offset == 0 {
            return Ok(String::new());
        }
        strings.get(offset)
    }
}

/// The bytes following the symbol table, which start with the string table. Its
/// first four bytes hold its total length, including those four bytes.
///
/// Nothing is checked until a long name is looked up, so objects with only short
/// names may have anything after their symbol table.
struct StringTable<'a> {
    data: &'a [u8],
}

impl<'a> StringTable<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    fn get(&self, offset: u32) -> Result<String, Error> {
        let size = u32::read_le(&mut Cursor::new(self.data)).map_err(|_| {
            Error::malformed(format!("symbol name offset {offset:#x} has no string table"))
        })?;
        let table = self.data.get(..size as usize).ok_or_else(|| {
            Error::malformed(format!("string table size {size:#x} extends past end of file"))
        })?;
        let start = offset as usize;
        table
            .get(start..)
            .filter(|_| start >= 4)
            .and_then(|bytes| {
                let end = bytes.iter().position(|b| *b == 0)?;
                Some(String::from_utf8_lossy(&bytes[..end]).into_owned())
            })
            .ok_or_else(|| {
                Error::malformed(format!("symbol name offset {offset:#x} is not in the string table"))
            })
    }
}

/// A named value from the symbol table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SymbolEntry {
    name: String,
    value: u32,
    section_number: i16,
    storage_class: u8,
}

impl SymbolEntry {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    /// 1-based section number, 0 for undefined and -1 for absolute symbols.
    pub fn section_number(&self) -> i16 {
        self.section_number
    }

    pub fn storage_class(&self) -> u8 {
        self.storage_class
    }
}

/// A parsed SNASM68K COFF object.
///
/// A `COFF` borrows section data from the buffer it was parsed from and is never
/// modified after [parse](COFF::parse) returns.
///
/// ```no_run
/// use std::path::Path;
/// use bin2cpp::{io, COFF};
/// # use anyhow::Result;
/// # fn main() -> Result<()> {
/// let bytes = io::read(Path::new("GAME.COFF"))?;
/// let coff = COFF::parse(&bytes)?;
/// println!("ROM is {} bytes", coff.rom_data().len());
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct COFF<'a> {
    header: FileHeader,
    sections: Vec<Section<'a>>,
    symbols: Vec<SymbolEntry>,
    sorted_symbols: Vec<SymbolEntry>,
}

impl<'a> COFF<'a> {
    /// Parses a SNASM68K COFF object from `data`.
    ///
    /// # Errors
    ///
    /// - [Error::UnsupportedMachineType] if the machine type isn't the 68000.
    /// - [Error::UnsupportedSectionLayout] if there aren't exactly
    ///   [SECTION_COUNT](layout::SECTION_COUNT) sections. Only checked once the
    ///   machine type is known to be correct.
    /// - [Error::MalformedFile] if any header, table, or section data would be read
    ///   from beyond the end of `data`.
    pub fn parse(data: &'a [u8]) -> Result<Self, Error> {
        let header = FileHeader::read(&mut Cursor::new(data))
            .map_err(|e| Error::malformed(format!("file header: {e}")))?;

        if header.machine != machine::MOTOROLA_68000 {
            return Err(Error::UnsupportedMachineType(header.machine));
        }
        if usize::from(header.section_count) != layout::SECTION_COUNT {
            return Err(Error::UnsupportedSectionLayout(header.section_count));
        }

        let table = data.get(header.section_table_offset()..).ok_or_else(|| {
            Error::malformed("optional header extends past end of file")
        })?;
        let mut cursor = Cursor::new(table);
        let sections = (0..layout::SECTION_COUNT)
            .map(|i| {
                let section_header = SectionHeader::read(&mut cursor)
                    .map_err(|e| Error::malformed(format!("section header {i}: {e}")))?;
                Section::new(data, section_header)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let symbols = read_symbols(data, &header)?;
        let mut sorted_symbols = symbols.clone();
        sorted_symbols.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(Self {
            header,
            sections,
            symbols,
            sorted_symbols,
        })
    }

    pub fn header(&self) -> &FileHeader {
        &self.header
    }

    /// Returns all [SECTION_COUNT](layout::SECTION_COUNT) sections in file order.
    pub fn sections(&self) -> &[Section<'a>] {
        &self.sections
    }

    /// Returns the bytes of the [ROM data section](layout::ROM_DATA_SECTION).
    pub fn rom_data(&self) -> &'a [u8] {
        self.sections[layout::ROM_DATA_SECTION].data()
    }

    /// Returns the symbols in the order they appear in the file.
    pub fn symbols(&self) -> &[SymbolEntry] {
        &self.symbols
    }

    /// Returns the symbols sorted by name.
    pub fn sorted_symbols(&self) -> &[SymbolEntry] {
        &self.sorted_symbols
    }
}

fn read_symbols(data: &[u8], header: &FileHeader) -> Result<Vec<SymbolEntry>, Error> {
    if header.symbol_count == 0 {
        return Ok(Vec::new());
    }

    let start = header.symbol_table_offset as usize;
    let end = (header.symbol_count as usize)
        .checked_mul(layout::SYMBOL_SIZE)
        .and_then(|size| start.checked_add(size))
        .filter(|end| *end <= data.len())
        .ok_or_else(|| {
            Error::malformed(format!(
                "symbol table {:#x} ({} records) extends past end of file ({:#x} bytes)",
                header.symbol_table_offset,
                header.symbol_count,
                data.len()
            ))
        })?;
    let strings = StringTable::new(&data[end..]);

    let mut cursor = Cursor::new(&data[start..end]);
    let mut symbols = Vec::new();
    let mut aux_remaining = 0;
    for i in 0..header.symbol_count {
        let raw = RawSymbol::read(&mut cursor)
            .map_err(|e| Error::malformed(format!("symbol {i}: {e}")))?;
        if aux_remaining > 0 {
            aux_remaining -= 1;
            continue;
        }
        aux_remaining = raw.aux_count;

        let name = raw.name(&strings)?;
        if name.is_empty() {
            continue;
        }
        symbols.push(SymbolEntry {
            name,
            value: raw.value,
            section_number: raw.section_number,
            storage_class: raw.storage_class,
        });
    }
    Ok(symbols)
}

/// Decodes a `NULL` padded name. Non-UTF-8 characters are replaced with the
/// Unicode replacement character (�).
fn c_string(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|b| *b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

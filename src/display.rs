// SPDX-FileCopyrightText: © 2025 TTKB, LLC
// SPDX-License-Identifier: BSD-3-CLAUSE

use std::fmt::{Display, Formatter, Result};

use super::{layout, Section, SymbolEntry, COFF};

/// Options for listing a [COFF].
#[derive(Clone, Copy, Debug, Default)]
pub struct Options {
    /// Whether or not to list the symbol table
    pub symbols: bool,
}

/// The `-l` listing of a [COFF]: its header, its section table, and
/// optionally its symbols sorted by name.
pub struct Listing<'a> {
    coff: &'a COFF<'a>,
    options: Options,
}

impl<'a> Listing<'a> {
    pub fn new(coff: &'a COFF<'a>, options: Options) -> Self {
        Self { coff, options }
    }
}

impl Display for Listing<'_> {
    fn fmt(&self, f: &mut Formatter) -> Result {
        let header = self.coff.header();
        writeln!(f, "Machine  : {:#06x}", header.machine())?;
        writeln!(f, "Created  : {}", header.created())?;
        writeln!(f, "Flags    : {:#06x}", header.flags())?;
        writeln!(
            f,
            "Symbols  : {} ({} records at {:#x})",
            self.coff.symbols().len(),
            header.symbol_count(),
            header.symbol_table_offset()
        )?;
        writeln!(f)?;
        writeln!(f, "Idx Name     VAddr    Size     Offset   Flags")?;
        for (i, section) in self.coff.sections().iter().enumerate() {
            write!(f, "{i:<3} ")?;
            write_section(f, section)?;
            if i == layout::ROM_DATA_SECTION {
                write!(f, " ROM")?;
            }
            writeln!(f)?;
        }

        if self.options.symbols {
            writeln!(f)?;
            writeln!(f, "Value    Sect Name")?;
            for symbol in self.coff.sorted_symbols() {
                write_symbol(f, symbol)?;
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

impl Display for COFF<'_> {
    fn fmt(&self, f: &mut Formatter) -> Result {
        Listing::new(self, Options::default()).fmt(f)
    }
}

fn write_section(f: &mut Formatter, section: &Section) -> Result {
    let header = section.header();
    write!(
        f,
        "{:<8} {:08x} {:08x} {:08x} {:08x}",
        header.name(),
        header.virtual_address(),
        header.size(),
        header.data_offset(),
        header.flags()
    )
}

fn write_symbol(f: &mut Formatter, symbol: &SymbolEntry) -> Result {
    let section = match symbol.section_number() {
        0 => "UND".to_string(),
        -1 => "ABS".to_string(),
        n => n.to_string(),
    };
    write!(f, "{:08x} {:<4} {}", symbol.value(), section, symbol.name())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test::{image, short_symbol};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_listing() {
        let bytes = image(
            &[1, 2],
            &[short_symbol(b"start", 0x200, 0), short_symbol(b"Main", 0x10, 0)],
            b"",
        );
        let coff = COFF::parse(&bytes).expect("coff");

        let plain = coff.to_string();
        let lines: Vec<&str> = plain.lines().collect();
        assert_eq!(4 + 2 + layout::SECTION_COUNT, lines.len());
        assert_eq!("0   .text    00000000 00000002 0000012c 00000000 ROM", lines[6]);
        assert_eq!("1   .bss     00000000 00000100 00000000 00000000", lines[7]);

        let listing = Listing::new(&coff, Options { symbols: true }).to_string();
        assert!(listing.starts_with(&plain));
        assert_eq!(
            "\nValue    Sect Name\n00000010 1    Main\n00000200 1    start\n",
            &listing[plain.len()..]
        );
    }
}

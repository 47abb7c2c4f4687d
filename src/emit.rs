// SPDX-FileCopyrightText: © 2025 TTKB, LLC
// SPDX-License-Identifier: BSD-3-CLAUSE

//! C++ header generation.
//!
//! Both generators are pure; callers decide where the text goes.

use std::fmt::{self, Display, Formatter};

use super::symbols::Symbol;

/// The number of byte literals written on each line of an array.
pub const MAX_BYTES_PER_LINE: usize = 128;

/// Identifier used for the byte array when none is given.
pub const DEFAULT_BINARY_NAME: &str = "snasm68k_binary";

/// Prefix used for symbol constants when none is given.
pub const DEFAULT_SYMBOL_PREFIX: &str = "snasm68k_symbol";

/// Names used in generated declarations.
#[derive(Clone, Debug, PartialEq)]
pub struct Options {
    /// The byte array's identifier. Its size constant is `<binary_name>_size`.
    pub binary_name: String,

    /// Symbol constants are named `<symbol_prefix>_<name>_val`.
    pub symbol_prefix: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            binary_name: DEFAULT_BINARY_NAME.to_string(),
            symbol_prefix: DEFAULT_SYMBOL_PREFIX.to_string(),
        }
    }
}

struct Banner;

impl Display for Banner {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        const RULE: &str =
            "//------------------------------------------------------------------";
        writeln!(f, "{RULE}")?;
        writeln!(f, "// bin2cpp")?;
        writeln!(f, "// BIG EVIL CORPORATION LTD")?;
        writeln!(f, "// SNASM68K BIN/COFF to C++ tool")?;
        writeln!(f, "// Matt Phillips 2018")?;
        writeln!(f, "{RULE}")?;
        writeln!(f)
    }
}

struct ByteArray<'a> {
    name: &'a str,
    bytes: &'a [u8],
}

impl Display for ByteArray<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Banner)?;
        writeln!(f, "// Binary data")?;
        writeln!(
            f,
            "static const int {}_size = 0x{:04X};",
            self.name,
            self.bytes.len()
        )?;
        writeln!(f, "static const unsigned char {}[] =", self.name)?;
        writeln!(f, "{{")?;
        for line in self.bytes.chunks(MAX_BYTES_PER_LINE) {
            writeln!(f)?;
            for byte in line {
                write!(f, "0x{byte:02X},")?;
            }
        }
        writeln!(f)?;
        writeln!(f, "}};")?;
        writeln!(f)
    }
}

struct SymbolConstants<'a> {
    prefix: &'a str,
    symbols: &'a [Symbol],
}

impl Display for SymbolConstants<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Banner)?;
        writeln!(f, "// Symbol addresses")?;
        for symbol in self.symbols {
            writeln!(
                f,
                "static const unsigned int {}_{}_val = 0x{:04X};",
                self.prefix,
                symbol.name(),
                symbol.value()
            )?;
        }
        Ok(())
    }
}

/// Renders `bytes` as a `static const unsigned char[]` and its size.
///
/// A line break precedes every run of [MAX_BYTES_PER_LINE] bytes, including the
/// first.
pub fn emit_byte_array(bytes: &[u8], options: &Options) -> String {
    ByteArray {
        name: &options.binary_name,
        bytes,
    }
    .to_string()
}

/// Renders one `static const unsigned int` per symbol.
///
/// Symbols that weren't found are written with their
/// [NOT_FOUND](crate::symbols::NOT_FOUND) value.
pub fn emit_symbol_constants(symbols: &[Symbol], options: &Options) -> String {
    SymbolConstants {
        prefix: &options.symbol_prefix,
        symbols,
    }
    .to_string()
}

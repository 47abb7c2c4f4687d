// SPDX-FileCopyrightText: © 2025 TTKB, LLC
// SPDX-License-Identifier: BSD-3-CLAUSE

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use super::display;
use super::emit::{self, emit_byte_array, emit_symbol_constants};
use super::io::{read, write_all};
use super::symbols::resolve_all;
use super::COFF;

/// Converts the raw binary at `input` into a byte array header at `output`.
pub fn binary(
    log: &mut impl Write,
    input: &Path,
    output: &Path,
    options: &emit::Options,
) -> Result<()> {
    let data = read(input)?;
    let rom = emit_byte_array(&data, options);
    write_all(&[(output, rom.as_str())])?;

    writeln!(
        log,
        "Wrote ROM file ({} bytes) to {}",
        data.len(),
        output.display()
    )?;
    Ok(())
}

/// Extracts the ROM section of the SNASM68K COFF at `input` into `rom_output`, and
/// the addresses of `symbols` into `vars_output`.
///
/// Symbols that can't be found are written with the
/// [NOT_FOUND](super::symbols::NOT_FOUND) value. Neither file is written if
/// `input` can't be read or isn't a SNASM68K COFF.
pub fn extract(
    log: &mut impl Write,
    input: &Path,
    rom_output: &Path,
    vars_output: &Path,
    symbols: &[String],
    options: &emit::Options,
) -> Result<()> {
    let data = read(input)?;
    let coff = COFF::parse(&data).with_context(|| format!("reading {}", input.display()))?;

    let symbols = resolve_all(&coff, symbols);
    for symbol in &symbols {
        writeln!(
            log,
            "Found symbol '{}' : value = 0x{:04X}",
            symbol.name(),
            symbol.value()
        )?;
    }

    let rom_data = coff.rom_data();
    let rom = emit_byte_array(rom_data, options);
    let vars = emit_symbol_constants(&symbols, options);
    write_all(&[(rom_output, rom.as_str()), (vars_output, vars.as_str())])?;

    writeln!(
        log,
        "Wrote ROM file ({} bytes) to {}",
        rom_data.len(),
        rom_output.display()
    )?;
    writeln!(log, "Wrote vars file to {}", vars_output.display())?;
    Ok(())
}

/// Prints the header, sections, and optionally the symbols of a SNASM68K COFF.
pub fn info(write: &mut impl Write, input: &Path, symbols: bool) -> Result<()> {
    let data = read(input)?;
    let coff = COFF::parse(&data).with_context(|| format!("reading {}", input.display()))?;
    let options = display::Options { symbols };
    write!(write, "{}", display::Listing::new(&coff, options))?;
    Ok(())
}

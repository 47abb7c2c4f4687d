// SPDX-FileCopyrightText: © 2025 TTKB, LLC
// SPDX-License-Identifier: BSD-3-CLAUSE

#![allow(dead_code)]

use bin2cpp::{layout, machine};

/// Builds SNASM68K COFF images in memory.
///
/// The ROM section's data directly follows the section table and the symbol
/// table follows the ROM data. Names longer than 8 bytes go to the string table.
pub struct CoffBuilder {
    machine: u16,
    section_count: u16,
    timestamp: u32,
    rom: Vec<u8>,
    symbols: Vec<(String, u32)>,
}

impl CoffBuilder {
    pub fn new() -> Self {
        Self {
            machine: machine::MOTOROLA_68000,
            section_count: layout::SECTION_COUNT as u16,
            timestamp: 0,
            rom: Vec::new(),
            symbols: Vec::new(),
        }
    }

    pub fn machine(mut self, machine: u16) -> Self {
        self.machine = machine;
        self
    }

    pub fn section_count(mut self, section_count: u16) -> Self {
        self.section_count = section_count;
        self
    }

    pub fn timestamp(mut self, timestamp: u32) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn rom(mut self, rom: &[u8]) -> Self {
        self.rom = rom.to_vec();
        self
    }

    pub fn symbol(mut self, name: &str, value: u32) -> Self {
        self.symbols.push((name.to_string(), value));
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let rom_offset = layout::FILE_HEADER_SIZE
            + usize::from(self.section_count) * layout::SECTION_HEADER_SIZE;
        let symbol_offset = rom_offset + self.rom.len();

        let mut bytes = Vec::new();
        bytes.extend(self.machine.to_le_bytes());
        bytes.extend(self.section_count.to_le_bytes());
        bytes.extend(self.timestamp.to_le_bytes());
        bytes.extend((symbol_offset as u32).to_le_bytes());
        bytes.extend((self.symbols.len() as u32).to_le_bytes());
        bytes.extend(0u16.to_le_bytes());
        bytes.extend(0u16.to_le_bytes());

        for i in 0..self.section_count {
            let (name, size, offset, flags) = if i == 0 {
                (".text".to_string(), self.rom.len() as u32, rom_offset as u32, 0x20u32)
            } else {
                (format!(".sec{i}"), 0, 0, 0)
            };
            let mut record = [0u8; layout::SECTION_HEADER_SIZE];
            record[..name.len()].copy_from_slice(name.as_bytes());
            record[16..20].copy_from_slice(&size.to_le_bytes());
            record[20..24].copy_from_slice(&offset.to_le_bytes());
            record[36..40].copy_from_slice(&flags.to_le_bytes());
            bytes.extend(record);
        }
        bytes.extend(&self.rom);

        let mut strings = Vec::new();
        for (name, value) in &self.symbols {
            let mut record = [0u8; layout::SYMBOL_SIZE];
            if name.len() > 8 {
                let offset = (strings.len() + 4) as u32;
                record[4..8].copy_from_slice(&offset.to_le_bytes());
                strings.extend(name.as_bytes());
                strings.push(0);
            } else {
                record[..name.len()].copy_from_slice(name.as_bytes());
            }
            record[8..12].copy_from_slice(&value.to_le_bytes());
            record[12..14].copy_from_slice(&1i16.to_le_bytes());
            record[16] = 2;
            bytes.extend(record);
        }
        bytes.extend(((strings.len() + 4) as u32).to_le_bytes());
        bytes.extend(strings);
        bytes
    }
}

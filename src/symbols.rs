// SPDX-FileCopyrightText: © 2025 TTKB, LLC
// SPDX-License-Identifier: BSD-3-CLAUSE

//! Symbol address lookup.
//!
//! Names are matched case-insensitively, the way SNASM68K treats labels by default.

use super::COFF;

/// The value reported for a symbol that isn't in the symbol table.
pub const NOT_FOUND: u32 = 0xFFFF_FFFF;

/// A requested symbol name and the value it resolved to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Symbol {
    name: String,
    value: u32,
}

impl Symbol {
    pub fn new(name: impl Into<String>, value: u32) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// The name as it was requested, not as it appears in the symbol table.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The symbol's value, or [NOT_FOUND].
    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn is_found(&self) -> bool {
        self.value != NOT_FOUND
    }
}

/// Returns the value of the first symbol in `coff`'s sorted table whose name
/// matches `name`, ignoring ASCII case. Returns [NOT_FOUND] if none match.
pub fn resolve(coff: &COFF, name: &str) -> u32 {
    coff.sorted_symbols()
        .iter()
        .find(|symbol| symbol.name().eq_ignore_ascii_case(name))
        .map_or(NOT_FOUND, |symbol| symbol.value())
}

/// Resolves each of `names` in order. Repeated names are resolved again, not
/// deduplicated.
pub fn resolve_all<I, S>(coff: &COFF, names: I) -> Vec<Symbol>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names
        .into_iter()
        .map(|name| {
            let name = name.as_ref();
            Symbol::new(name, resolve(coff, name))
        })
        .collect()
}

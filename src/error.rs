// SPDX-FileCopyrightText: © 2025 TTKB, LLC
// SPDX-License-Identifier: BSD-3-CLAUSE

//! Errors that terminate a conversion.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Every failure `bin2cpp` can report. None are recoverable; each one ends
/// the invocation before any output file is written.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or unrecognized command line arguments.
    #[error("{0}")]
    Usage(String),

    /// A file could not be opened, read, or written.
    #[error("{}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The COFF header names a processor other than the 68000.
    #[error("Unknown COFF machine/processor type {0:#06x}, not a SNASM68K COFF")]
    UnsupportedMachineType(u16),

    /// SNASM68K always emits a fixed number of sections.
    #[error("Unsupported section count {0}, not a SNASM68K COFF")]
    UnsupportedSectionLayout(u16),

    /// A header, table, or section range runs past the end of the file.
    #[error("Malformed COFF: {0}")]
    MalformedFile(String),
}

/// Process exit codes.
pub mod exit {
    pub const SUCCESS: u8 = 0;
    pub const FAILURE: u8 = 1;
    pub const USAGE: u8 = 2;
    pub const IO: u8 = 3;
    pub const UNSUPPORTED_MACHINE_TYPE: u8 = 4;
    pub const UNSUPPORTED_SECTION_LAYOUT: u8 = 5;
    pub const MALFORMED_FILE: u8 = 6;
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedFile(reason.into())
    }

    /// The process exit code used when this error ends the program.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Usage(_) => exit::USAGE,
            Self::Io { .. } => exit::IO,
            Self::UnsupportedMachineType(_) => exit::UNSUPPORTED_MACHINE_TYPE,
            Self::UnsupportedSectionLayout(_) => exit::UNSUPPORTED_SECTION_LAYOUT,
            Self::MalformedFile(_) => exit::MALFORMED_FILE,
        }
    }
}

/// Maps any error produced by a [cli](crate::cli) flow to an exit code.
///
/// Errors that did not originate as an [Error] exit with [exit::FAILURE].
pub fn exit_code(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<Error>()
        .map_or(exit::FAILURE, Error::exit_code)
}

#[cfg(test)]
mod test {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_exit_codes_are_distinct() {
        let codes = [
            Error::Usage("usage".into()).exit_code(),
            Error::io("x", io::Error::from(io::ErrorKind::NotFound)).exit_code(),
            Error::UnsupportedMachineType(0x14c).exit_code(),
            Error::UnsupportedSectionLayout(0).exit_code(),
            Error::malformed("short").exit_code(),
        ];
        for (i, a) in codes.iter().enumerate() {
            assert_ne!(*a, exit::SUCCESS);
            for b in &codes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_exit_code_through_context() {
        let err: anyhow::Result<()> = Err(Error::UnsupportedSectionLayout(0).into());
        let err = err.context("reading foo.coff").expect_err("error");
        assert_eq!(exit::UNSUPPORTED_SECTION_LAYOUT, exit_code(&err));

        let err = anyhow::anyhow!("something else");
        assert_eq!(exit::FAILURE, exit_code(&err));
    }

    #[test]
    fn test_io_cause_reported_once() {
        let source = io::Error::new(io::ErrorKind::NotFound, "not here");
        let err = Error::io("rom.h", source);
        assert_eq!("rom.h", err.to_string());

        let err = anyhow::Error::from(err);
        assert_eq!("rom.h: not here", format!("{err:#}"));
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            "Unknown COFF machine/processor type 0x014c, not a SNASM68K COFF",
            Error::UnsupportedMachineType(0x14c).to_string()
        );
        assert_eq!(
            "Unsupported section count 0, not a SNASM68K COFF",
            Error::UnsupportedSectionLayout(0).to_string()
        );
    }
}

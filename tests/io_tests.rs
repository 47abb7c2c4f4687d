// SPDX-FileCopyrightText: © 2025 TTKB, LLC
// SPDX-License-Identifier: BSD-3-CLAUSE

use std::path::Path;

use bin2cpp::error::exit;
use bin2cpp::io;
use bin2cpp::{Error, COFF};

mod common;

use common::CoffBuilder;

#[test]
fn test_bad_filenames() {
    assert!(io::read(Path::new("bad file name")).is_err());
    assert!(matches!(
        io::read(Path::new("bad file name")),
        Err(Error::Io { .. })
    ));
}

#[test]
fn test_not_readable() {
    let e = io::read(Path::new("/dev/fd")).expect_err("error");
    assert_eq!(exit::IO, e.exit_code());
}

#[test]
fn test_file_too_small() {
    let bytes = io::read(Path::new("/dev/null")).expect("empty");
    assert!(bytes.is_empty());
    let e = COFF::parse(&bytes).expect_err("error");
    assert_eq!(exit::MALFORMED_FILE, e.exit_code());
}

#[test]
fn test_write_errors() {
    let e = io::write(Path::new("/dev/fd"), "text").expect_err("error");
    assert!(matches!(e, Error::Io { .. }));
    assert_eq!("/dev/fd", e.to_string());
}

#[test]
fn test_read_and_parse() {
    let temp_dir = tempfile::TempDir::new().expect("tempdir");
    let path = temp_dir.path().join("game.coff");
    let coff = CoffBuilder::new()
        .rom(&[1, 2, 3])
        .symbol("a_rather_long_label", 0x8000)
        .build();
    io::write(&path, "").expect("create");
    std::fs::write(&path, &coff).expect("write");

    let bytes = io::read(&path).expect("read");
    let parsed = COFF::parse(&bytes).expect("parse");
    assert_eq!(&[1, 2, 3], parsed.rom_data());
    assert_eq!("a_rather_long_label", parsed.symbols()[0].name());
    assert_eq!(0x8000, parsed.symbols()[0].value());
}

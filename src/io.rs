// SPDX-FileCopyrightText: © 2025 TTKB, LLC
// SPDX-License-Identifier: BSD-3-CLAUSE

//! Reading inputs and writing generated headers.

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use super::error::Error;

/// Reads the whole file at `path`.
pub fn read(path: &Path) -> Result<Vec<u8>, Error> {
    fs::read(path).map_err(|e| Error::io(path, e))
}

/// Writes `text` to `path`, replacing any existing file.
pub fn write(path: &Path, text: &str) -> Result<(), Error> {
    fs::write(path, text).map_err(|e| Error::io(path, e))
}

/// Writes each `(path, text)` pair, or none of them.
///
/// Every text is first written to a temporary file next to its destination.
/// The temporaries are only moved into place once all of them are complete, and
/// if a move fails the outputs already moved are removed again.
pub fn write_all(outputs: &[(&Path, &str)]) -> Result<(), Error> {
    let staged = outputs
        .iter()
        .map(|(path, text)| stage(path, text))
        .collect::<Result<Vec<_>, _>>()?;

    for (i, (file, (path, _))) in staged.into_iter().zip(outputs).enumerate() {
        if let Err(e) = file.persist(path) {
            for (written, _) in &outputs[..i] {
                let _ = fs::remove_file(written);
            }
            return Err(Error::io(*path, e.error));
        }
    }
    Ok(())
}

fn stage(path: &Path, text: &str) -> Result<NamedTempFile, Error> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let mut file = NamedTempFile::new_in(dir).map_err(|e| Error::io(path, e))?;
    file.write_all(text.as_bytes())
        .and_then(|()| file.flush())
        .map_err(|e| Error::io(path, e))?;
    Ok(file)
}

//! Loading SQL scripts.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::Result;
use crate::value::UTF8_BOM;

/// Reads a UTF-8 script and strips any byte order mark.
pub fn load_script<R: Read>(mut reader: R) -> Result<String> {
    let mut script = String::new();
    reader.read_to_string(&mut script)?;
    if script.contains(UTF8_BOM) {
        script.retain(|c| c != UTF8_BOM);
    }
    Ok(script)
}

pub fn load_script_path(path: impl AsRef<Path>) -> Result<String> {
    load_script(File::open(path)?)
}

//! JSON configuration files.

use crate::Result;
use dropsize_core::BatchConfig;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Loads a [`BatchConfig`] from a JSON file. Missing fields take defaults.
///
/// # Errors
/// Returns an error if the file cannot be opened or parsed.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<BatchConfig> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

/// Writes `config` as pretty-printed JSON.
///
/// # Errors
/// Returns an error if the file cannot be created or written.
pub fn save_config<P: AsRef<Path>>(config: &BatchConfig, path: P) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, config)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

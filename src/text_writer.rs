use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Appends a string payload to a text file, with an optional description
/// line written before the payload on every call.
pub struct TextFileWriter {
    filename: PathBuf,
    payload: String,
    desc: Option<String>,
}

impl TextFileWriter {
    pub fn new(
        filename: impl Into<PathBuf>,
        payload: impl Into<String>,
        desc: Option<String>,
    ) -> Self {
        Self {
            filename: filename.into(),
            payload: payload.into(),
            desc,
        }
    }

    /// Deletes the target file if it exists; a missing file is a no-op
    pub fn remove_file(&self) -> Result<()> {
        if self.filename.exists() {
            fs::remove_file(&self.filename)
                .with_context(|| format!("Failed to remove file: {}", self.filename.display()))?;
        }
        Ok(())
    }

    /// Appends the description line (when set) and the payload to the target
    /// file, creating it on first use. Repeated calls accumulate content.
    pub fn write_to_file(&self) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.filename)
            .with_context(|| {
                format!("Failed to open file for append: {}", self.filename.display())
            })?;

        if let Some(desc) = &self.desc {
            writeln!(file, "{}", desc)?;
        }
        file.write_all(self.payload.as_bytes())?;

        Ok(())
    }
}

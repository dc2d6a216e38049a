//! API key storage.
//!
//! The key comes from `MTA_API_KEY` when set, otherwise from a one-line file
//! in the data directory. A missing file is filled in by prompting once.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::countdown::CountdownError;

/// Environment variable checked before the key file.
pub const API_KEY_ENV: &str = "MTA_API_KEY";

/// One-line file holding the feed API key.
#[derive(Debug, Clone)]
pub struct ApiKeyFile {
    path: PathBuf,
}

impl ApiKeyFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The stored key, trimmed. `None` if the file is missing or blank.
    pub fn load(&self) -> Option<String> {
        let contents = std::fs::read_to_string(&self.path).ok()?;
        let key = contents.trim();
        if key.is_empty() {
            None
        } else {
            Some(key.to_string())
        }
    }

    /// Store `key`, creating parent directories.
    pub fn save(&self, key: &str) -> Result<(), CountdownError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)
                .map_err(|e| CountdownError::io("failed to create data directory", e))?;
        }

        std::fs::write(&self.path, format!("{}\n", key.trim()))
            .map_err(|e| CountdownError::io("failed to write API key file", e))
    }

    /// Ask for a key on `output`, read one line from `input` and store it.
    pub fn prompt<R: BufRead, W: Write>(
        &self,
        mut input: R,
        mut output: W,
    ) -> Result<String, CountdownError> {
        write!(output, "Enter your MTA API key: ")
            .and_then(|()| output.flush())
            .map_err(|e| CountdownError::io("failed to write prompt", e))?;

        let mut line = String::new();
        input
            .read_line(&mut line)
            .map_err(|e| CountdownError::io("failed to read API key", e))?;

        let key = line.trim();
        if key.is_empty() {
            return Err(CountdownError::io(
                "no API key entered",
                std::io::Error::from(std::io::ErrorKind::UnexpectedEof),
            ));
        }

        self.save(key)?;
        debug!(path = %self.path.display(), "Saved API key");
        Ok(key.to_string())
    }
}

/// Pick the key from the environment value, the key file, or a prompt, in
/// that order.
pub fn api_key<R: BufRead, W: Write>(
    env_value: Option<String>,
    file: &ApiKeyFile,
    input: R,
    output: W,
) -> Result<String, CountdownError> {
    if let Some(key) = env_value.map(|k| k.trim().to_string()).filter(|k| !k.is_empty()) {
        debug!(source = API_KEY_ENV, "Using API key");
        return Ok(key);
    }

    if let Some(key) = file.load() {
        debug!(path = %file.path().display(), "Using API key");
        return Ok(key);
    }

    file.prompt(input, output)
}

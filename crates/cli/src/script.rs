// TtyCon - Serial Console Firmware
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! Scripted console sessions (YAML).
//!
//! ```yaml
//! schema_version: "1.0"
//! input: "foo bar\x17\r"
//! read_sizes: [10]
//! assertions:
//!   - reads_equal: ["foo \n"]
//!   - echo_contains: "\b \b"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const SCRIPT_SCHEMA_VERSION: &str = "1.0";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum SessionAssertion {
    /// Everything the console sent back, byte for byte.
    EchoEquals(String),
    EchoContains(String),
    /// Data returned by each read, in order.
    ReadsEqual(Vec<String>),
    /// Bytes left in the line buffer when the session ended.
    BufferedAfter(String),
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct SessionScript {
    pub schema_version: String,
    /// Keystrokes, YAML escapes allowed (`\r`, `\b`, `\x17`, ...).
    #[serde(default)]
    pub input: Option<String>,
    /// Raw keystroke file, relative to the script.
    #[serde(default)]
    pub input_file: Option<String>,
    /// Destination sizes for successive reads. Empty means "read whole lines
    /// until the input runs out".
    #[serde(default)]
    pub read_sizes: Vec<usize>,
    #[serde(default)]
    pub assertions: Vec<SessionAssertion>,
}

impl SessionScript {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read session script at {:?}", path))?;
        let script: Self =
            serde_yaml::from_str(&contents).context("Failed to parse session script YAML")?;
        script.validate()?;
        Ok(script)
    }

    pub fn validate(&self) -> Result<()> {
        if self.schema_version != SCRIPT_SCHEMA_VERSION {
            anyhow::bail!(
                "Unsupported schema_version '{}'. Supported versions: '{}'",
                self.schema_version,
                SCRIPT_SCHEMA_VERSION
            );
        }
        match (&self.input, &self.input_file) {
            (Some(_), Some(_)) => anyhow::bail!("Set only one of 'input' and 'input_file'"),
            (None, None) => anyhow::bail!("Missing session input ('input' or 'input_file')"),
            _ => Ok(()),
        }
    }

    /// Keystroke bytes, loading `input_file` relative to `script_path`.
    pub fn input_bytes(&self, script_path: &Path) -> Result<Vec<u8>> {
        if let Some(input) = &self.input {
            return Ok(input.as_bytes().to_vec());
        }
        let file = self.input_file.as_deref().unwrap_or_default();
        let path = resolve_script_path(script_path, file);
        std::fs::read(&path).with_context(|| format!("Failed to read input file {:?}", path))
    }
}

pub fn resolve_script_path(script_path: &Path, value: &str) -> PathBuf {
    let p = PathBuf::from(value);
    if p.is_absolute() {
        return p;
    }
    script_path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(p)
}

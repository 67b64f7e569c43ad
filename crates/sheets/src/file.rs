// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Upload ceiling: 10 MB.
pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

/// Accepted spreadsheet formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    Xlsx,
    Xls,
    Csv,
}

impl FileFormat {
    /// Determines the format from a file name's extension (case-insensitive).
    #[must_use]
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let extension: String = Path::new(file_name)
            .extension()?
            .to_str()?
            .to_ascii_lowercase();
        match extension.as_str() {
            "xlsx" => Some(Self::Xlsx),
            "xls" => Some(Self::Xls),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }
}

/// A selected file that passed the pre-parse checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportFile {
    name: String,
    format: FileFormat,
    bytes: Vec<u8>,
}

impl ImportFile {
    /// Accepts a file after checking its extension and size.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::UnsupportedExtension`, `ParseError::EmptyFile` or
    /// `ParseError::FileTooLarge`.
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, ParseError> {
        let name: String = name.into();
        let format: FileFormat = FileFormat::from_file_name(&name).ok_or_else(|| {
            ParseError::UnsupportedExtension {
                file_name: name.clone(),
            }
        })?;
        if bytes.is_empty() {
            return Err(ParseError::EmptyFile);
        }
        if bytes.len() > MAX_FILE_SIZE {
            return Err(ParseError::FileTooLarge {
                size: bytes.len(),
                max: MAX_FILE_SIZE,
            });
        }
        Ok(Self {
            name,
            format,
            bytes,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The file name without directory or extension.
    #[must_use]
    pub fn stem(&self) -> &str {
        Path::new(&self.name)
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or(&self.name)
    }

    #[must_use]
    pub const fn format(&self) -> FileFormat {
        self.format
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

//! Source documents: an extract file read into memory.

use std::fs;
use std::path::{Path, PathBuf};

use roxmltree::Document;

use crate::error::{ExtractError, Result};

/// An extract file and its XML text.
///
/// The text is owned here; [`SourceDocument::parse`] borrows it into a DOM
/// that lives as long as the adapter reading it.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    path: PathBuf,
    xml: String,
}

impl SourceDocument {
    /// Read an extract from disk.
    ///
    /// # Errors
    /// Returns `Io` when the file cannot be read or is not valid UTF-8.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let xml = fs::read_to_string(path).map_err(|e| ExtractError::io(path, e))?;
        Ok(Self::from_string(path, xml))
    }

    /// Wrap XML text that is already in memory. A leading byte order mark
    /// is dropped.
    pub fn from_string(path: impl Into<PathBuf>, xml: impl Into<String>) -> Self {
        let xml = xml.into();
        let xml = match xml.strip_prefix('\u{feff}') {
            Some(stripped) => stripped.to_string(),
            None => xml,
        };
        Self {
            path: path.into(),
            xml,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn xml(&self) -> &str {
        &self.xml
    }

    /// Parse the text into a DOM.
    ///
    /// # Errors
    /// Returns `Xml` when the text is not well-formed.
    pub fn parse(&self) -> Result<Document<'_>> {
        Document::parse(&self.xml).map_err(|source| ExtractError::Xml {
            path: self.path.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_open_strips_byte_order_mark() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "\u{feff}<land_record/>").unwrap();

        let source = SourceDocument::open(file.path()).unwrap();
        assert_eq!(source.xml(), "<land_record/>");
        assert_eq!(source.path(), file.path());
        assert_eq!(
            source.parse().unwrap().root_element().tag_name().name(),
            "land_record"
        );
    }

    #[test]
    fn test_open_missing_file() {
        let err = SourceDocument::open("/nonexistent/extract.xml").unwrap_err();
        assert!(matches!(err, ExtractError::Io { .. }));
    }

    #[test]
    fn test_parse_malformed_xml_reports_path() {
        let source = SourceDocument::from_string("broken.xml", "<Parcel>");
        let err = source.parse().unwrap_err();
        assert!(matches!(err, ExtractError::Xml { .. }));
        assert!(err.to_string().contains("broken.xml"));
    }
}

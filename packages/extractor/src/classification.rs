//! Code → label classification tables.
//!
//! The registry encodes regions, statuses, land categories, permitted uses,
//! right types and encumbrance types as numeric codes. Labels come from six
//! pipe-delimited `code|label` files that the caller supplies; the tables are
//! loaded once and passed by reference to every adapter.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::config::{
    ENCUMBRANCE_TABLE, LAND_CATEGORY_TABLE, PERMITTED_USE_TABLE, REGION_TABLE, RIGHT_TABLE,
    STATUS_TABLE, TABLE_DELIMITER,
};
use crate::error::{ExtractError, Result};

/// The six classification tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKind {
    Region,
    Status,
    LandCategory,
    PermittedUse,
    Right,
    Encumbrance,
}

impl TableKind {
    /// Every table, in load order.
    pub const ALL: [TableKind; 6] = [
        Self::Region,
        Self::Status,
        Self::LandCategory,
        Self::PermittedUse,
        Self::Right,
        Self::Encumbrance,
    ];

    /// File name of the table inside the tables directory.
    #[must_use]
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Region => REGION_TABLE,
            Self::Status => STATUS_TABLE,
            Self::LandCategory => LAND_CATEGORY_TABLE,
            Self::PermittedUse => PERMITTED_USE_TABLE,
            Self::Right => RIGHT_TABLE,
            Self::Encumbrance => ENCUMBRANCE_TABLE,
        }
    }
}

/// One code → label table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classifier {
    entries: HashMap<String, String>,
}

impl Classifier {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from in-memory pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(code, label)| (code.into(), label.into()))
                .collect(),
        }
    }

    /// Read `code|label` lines. Lines with fewer than two fields are skipped;
    /// a repeated code keeps the last label.
    ///
    /// # Errors
    /// Returns the underlying `csv::Error` on I/O failure or invalid UTF-8.
    pub fn from_reader<R: Read>(reader: R) -> std::result::Result<Self, csv::Error> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(TABLE_DELIMITER)
            .has_headers(false)
            .quoting(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut entries = HashMap::new();
        for record in rdr.records() {
            let record = record?;
            if let (Some(code), Some(label)) = (record.get(0), record.get(1)) {
                if !code.is_empty() {
                    entries.insert(code.to_string(), label.to_string());
                }
            }
        }

        Ok(Self { entries })
    }

    /// Look up a label.
    #[must_use]
    pub fn get(&self, code: &str) -> Option<&str> {
        self.entries.get(code.trim()).map(String::as_str)
    }

    /// Label for a code, or the code itself when the table does not know it.
    #[must_use]
    pub fn label(&self, code: &str) -> String {
        match self.get(code) {
            Some(label) => label.to_string(),
            None => {
                tracing::debug!(code, "code missing from classification table");
                code.trim().to_string()
            }
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// All classification tables used by the adapters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassificationTables {
    pub region: Classifier,
    pub status: Classifier,
    pub land_category: Classifier,
    pub permitted_use: Classifier,
    pub right: Classifier,
    pub encumbrance: Classifier,
}

impl ClassificationTables {
    /// Load every table from `dir` (see [`TableKind::file_name`]).
    ///
    /// # Errors
    /// Returns `Io` when a file is missing or unreadable and
    /// `Classification` when its content cannot be decoded.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let mut tables = Self::default();

        for kind in TableKind::ALL {
            let path = dir.join(kind.file_name());
            let file = File::open(&path).map_err(|e| ExtractError::io(&path, e))?;
            let classifier =
                Classifier::from_reader(file).map_err(|source| ExtractError::Classification {
                    table: kind.file_name().to_string(),
                    source,
                })?;
            tracing::debug!(table = kind.file_name(), entries = classifier.len(), "loaded table");
            tables = tables.with_table(kind, classifier);
        }

        Ok(tables)
    }

    /// Replace one table.
    #[must_use]
    pub fn with_table(mut self, kind: TableKind, classifier: Classifier) -> Self {
        *self.table_mut(kind) = classifier;
        self
    }

    /// Borrow one table.
    #[must_use]
    pub fn table(&self, kind: TableKind) -> &Classifier {
        match kind {
            TableKind::Region => &self.region,
            TableKind::Status => &self.status,
            TableKind::LandCategory => &self.land_category,
            TableKind::PermittedUse => &self.permitted_use,
            TableKind::Right => &self.right,
            TableKind::Encumbrance => &self.encumbrance,
        }
    }

    fn table_mut(&mut self, kind: TableKind) -> &mut Classifier {
        match kind {
            TableKind::Region => &mut self.region,
            TableKind::Status => &mut self.status,
            TableKind::LandCategory => &mut self.land_category,
            TableKind::PermittedUse => &mut self.permitted_use,
            TableKind::Right => &mut self.right,
            TableKind::Encumbrance => &mut self.encumbrance,
        }
    }
}

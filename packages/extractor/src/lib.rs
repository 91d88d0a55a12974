//! EGRN Extractor - Normalize Rosreestr XML extracts into flat records.
//!
//! This crate reads cadastral and EGRN extracts in any of the supported
//! schema generations and turns each into one [`NormalizedRecord`]:
//! identifiers, area, address, status, ownership, encumbrances and boundary
//! geometry.
//!
//! # Example
//!
//! ```
//! use std::path::Path;
//! use roxmltree::Document;
//! use egrn_extractor::{ClassificationTables, Extract, ExtractSettings};
//!
//! let xml = "<extract_about_property_land><land_record>\
//!     <object><common_data><cad_number>47:07:0000000:1</cad_number></common_data></object>\
//!     </land_record></extract_about_property_land>";
//! let doc = Document::parse(xml).unwrap();
//! let tables = ClassificationTables::default();
//! let settings = ExtractSettings::new();
//!
//! let extract = Extract::bind(&doc, Path::new("extract.xml"), &tables, &settings).unwrap();
//! assert_eq!(extract.to_record().cadastral_number, "47:07:0000000:1");
//! ```
//!
//! # Architecture
//!
//! The extractor is organized into several modules:
//!
//! - [`config`]: Constants, patterns and per-run settings
//! - [`error`]: Error types and Result alias
//! - [`classification`]: Code → label tables
//! - [`source`]: Loading extract files
//! - [`schema`]: Schema detection by fingerprint
//! - [`adapter`]: Per-schema field access and the bound [`Extract`]
//! - [`resolve`]: Ordered fallback chains for fields
//! - [`xml`]: XML navigation utilities
//! - [`registry`]: Extensible holder handler system
//! - [`rights`]: Right and encumbrance records
//! - [`ownership`]: Owner string normalization
//! - [`encumbrance`]: Encumbrance string normalization
//! - [`geometry`]: Ring assembly and winding correction
//! - [`record`]: The normalized record and its table and polygon views
//! - [`text`]: Dates, casing and whitespace
//! - [`batch`]: Directory processing
//! - [`output`]: YAML and JSON serialization
//! - [`cli`]: Command-line interface

pub mod adapter;
pub mod batch;
pub mod classification;
pub mod cli;
pub mod config;
pub mod encumbrance;
pub mod error;
pub mod geometry;
pub mod output;
pub mod ownership;
pub mod record;
pub mod registry;
pub mod resolve;
pub mod rights;
pub mod schema;
pub mod source;
pub mod text;
pub mod xml;

// Re-export main entry points
pub use adapter::{read_extract, Extract, ExtractSource};
pub use schema::{detect_file, detect_schema, SchemaKind};

// Re-export commonly used items
pub use classification::ClassificationTables;
pub use config::ExtractSettings;
pub use error::{ExtractError, Result};
pub use geometry::{Geometry, Ring};
pub use record::{NormalizedRecord, ObjectKind};

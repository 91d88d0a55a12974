//! Schema detection.
//!
//! Each supported schema is recognized by a fingerprint: a namespace and a
//! short element path below the document root. Fingerprints are tried in a
//! fixed order and the first match wins, so detection is deterministic.

use std::fmt;
use std::path::Path;

use roxmltree::{Document, Node};
use serde::Serialize;

use crate::config::{KPOKS_NAMESPACE, KPZU_NAMESPACE, KVOKS_NAMESPACE, KVZU_NAMESPACE};
use crate::error::Result;
use crate::record::ObjectKind;
use crate::source::SourceDocument;
use crate::xml::find_by_qualified_path;

/// Supported extract schemas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaKind {
    /// Cadastral extract of a land parcel, KVZU 7.0.1.
    ParcelKvzu,
    /// Cadastral passport of a land parcel, KPZU 6.0.1.
    ParcelKpzu,
    /// Namespace-free EGRN extract of a land parcel.
    ParcelEgrn,
    /// Cadastral extract of a capital construction object, KVOKS 3.0.1.
    BuildingKvoks,
    /// Cadastral passport of a capital construction object, KPOKS 4.0.1.
    BuildingKpoks,
}

impl SchemaKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ParcelKvzu => "parcel_kvzu",
            Self::ParcelKpzu => "parcel_kpzu",
            Self::ParcelEgrn => "parcel_egrn",
            Self::BuildingKvoks => "building_kvoks",
            Self::BuildingKpoks => "building_kpoks",
        }
    }

    #[must_use]
    pub fn object_kind(&self) -> ObjectKind {
        match self {
            Self::ParcelKvzu | Self::ParcelKpzu | Self::ParcelEgrn => ObjectKind::LandParcel,
            Self::BuildingKvoks | Self::BuildingKpoks => ObjectKind::CapitalConstruction,
        }
    }

    /// The fingerprint recognizing this schema.
    #[must_use]
    pub fn fingerprint(&self) -> &'static Fingerprint {
        match self {
            Self::ParcelKvzu => &FINGERPRINTS[0],
            Self::ParcelKpzu => &FINGERPRINTS[1],
            Self::ParcelEgrn => &FINGERPRINTS[2],
            Self::BuildingKvoks => &FINGERPRINTS[3],
            Self::BuildingKpoks => &FINGERPRINTS[4],
        }
    }
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Namespace and path that identify a schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fingerprint {
    pub kind: SchemaKind,
    /// `None` for namespace-free documents.
    pub namespace: Option<&'static str>,
    /// Element path below the root element.
    pub path: &'static str,
}

impl Fingerprint {
    /// The object node this fingerprint points at, if the document matches.
    pub fn locate<'a, 'input>(&self, doc: &'a Document<'input>) -> Option<Node<'a, 'input>> {
        find_by_qualified_path(doc.root_element(), self.namespace, self.path)
    }
}

/// Fingerprints in detection order.
pub const FINGERPRINTS: [Fingerprint; 5] = [
    Fingerprint {
        kind: SchemaKind::ParcelKvzu,
        namespace: Some(KVZU_NAMESPACE),
        path: "Parcels/Parcel",
    },
    Fingerprint {
        kind: SchemaKind::ParcelKpzu,
        namespace: Some(KPZU_NAMESPACE),
        path: "Parcel",
    },
    Fingerprint {
        kind: SchemaKind::ParcelEgrn,
        namespace: None,
        path: "land_record",
    },
    Fingerprint {
        kind: SchemaKind::BuildingKvoks,
        namespace: Some(KVOKS_NAMESPACE),
        path: "Realty",
    },
    Fingerprint {
        kind: SchemaKind::BuildingKpoks,
        namespace: Some(KPOKS_NAMESPACE),
        path: "Realty",
    },
];

/// Detect the schema of a parsed document.
///
/// Returns `None` when no fingerprint matches; an unknown schema is not an
/// error.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use egrn_extractor::schema::{detect_schema, SchemaKind};
///
/// let doc = Document::parse("<extract_about_property_land><land_record/></extract_about_property_land>").unwrap();
/// assert_eq!(detect_schema(&doc), Some(SchemaKind::ParcelEgrn));
///
/// let other = Document::parse("<extract><building_record/></extract>").unwrap();
/// assert_eq!(detect_schema(&other), None);
/// ```
pub fn detect_schema(doc: &Document<'_>) -> Option<SchemaKind> {
    FINGERPRINTS
        .iter()
        .find(|fingerprint| fingerprint.locate(doc).is_some())
        .map(|fingerprint| fingerprint.kind)
}

/// Read, parse and detect the schema of a file.
///
/// # Errors
/// Returns `Io` or `Xml` when the file cannot be read or parsed.
pub fn detect_file(path: impl AsRef<Path>) -> Result<Option<SchemaKind>> {
    let source = SourceDocument::open(path)?;
    let doc = source.parse()?;
    Ok(detect_schema(&doc))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detect(xml: &str) -> Option<SchemaKind> {
        let doc = Document::parse(xml).unwrap();
        detect_schema(&doc)
    }

    #[test]
    fn test_detect_namespaced_parcels() {
        let kvzu = format!(
            r#"<KVZU xmlns="{KVZU_NAMESPACE}"><Parcels><Parcel CadastralNumber="47:07:0000000:1"/></Parcels></KVZU>"#
        );
        assert_eq!(detect(&kvzu), Some(SchemaKind::ParcelKvzu));

        let kpzu = format!(r#"<KPZU xmlns="{KPZU_NAMESPACE}"><Parcel/></KPZU>"#);
        assert_eq!(detect(&kpzu), Some(SchemaKind::ParcelKpzu));
    }

    #[test]
    fn test_detect_buildings() {
        let kvoks = format!(r#"<KVOKS xmlns="{KVOKS_NAMESPACE}"><Realty/></KVOKS>"#);
        assert_eq!(detect(&kvoks), Some(SchemaKind::BuildingKvoks));

        let kpoks = format!(r#"<KPOKS xmlns="{KPOKS_NAMESPACE}"><Realty/></KPOKS>"#);
        assert_eq!(detect(&kpoks), Some(SchemaKind::BuildingKpoks));
    }

    #[test]
    fn test_namespace_must_match() {
        let wrong_version = r#"<KVZU xmlns="urn://x-artefacts-rosreestr-ru/outgoing/kvzu/6.0.9"><Parcels><Parcel/></Parcels></KVZU>"#;
        assert_eq!(detect(wrong_version), None);

        let namespaced_land_record = r#"<e xmlns="urn:other"><land_record/></e>"#;
        assert_eq!(detect(namespaced_land_record), None);
    }

    #[test]
    fn test_detection_is_deterministic() {
        let xml = "<extract_about_property_land><land_record/></extract_about_property_land>";
        let first = detect(xml);
        assert!((0..10).all(|_| detect(xml) == first));
    }

    #[test]
    fn test_unknown_root_stays_unknown() {
        let xml = "<KPT><CadastralBlocks/></KPT>";
        assert!((0..10).all(|_| detect(xml).is_none()));
    }

    #[test]
    fn test_fingerprint_lookup_matches_order() {
        for fingerprint in &FINGERPRINTS {
            assert_eq!(fingerprint.kind.fingerprint(), fingerprint);
        }
        assert_eq!(
            SchemaKind::BuildingKpoks.object_kind(),
            ObjectKind::CapitalConstruction
        );
        assert_eq!(SchemaKind::ParcelEgrn.to_string(), "parcel_egrn");
    }

    #[test]
    fn test_detect_file_unknown_schema() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("other.xml");
        std::fs::write(&path, "<extract/>").unwrap();
        assert_eq!(detect_file(&path).unwrap(), None);
    }
}

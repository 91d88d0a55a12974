//! Extract adapters.
//!
//! One adapter per schema family reads a parsed document into the fields of
//! a [`NormalizedRecord`]. [`Extract::bind`] runs schema detection, picks the
//! adapter and memoizes the aggregated values (ownership, encumbrances,
//! geometry) so that every accessor can be read repeatedly.

mod building;
pub mod common;
mod egrn;
mod parcel;

pub use building::BuildingExtract;
pub use egrn::EgrnExtract;
pub use parcel::ParcelExtract;

use std::cell::OnceCell;
use std::path::Path;

use roxmltree::{Document, Node};

use crate::classification::ClassificationTables;
use crate::config::ExtractSettings;
use crate::encumbrance::{describe_encumbrances, normalize_encumbrances};
use crate::error::Result;
use crate::geometry::{assemble_geometry, Contour, Geometry};
use crate::ownership::{describe_rights, normalize_ownership, Ownership, OwnershipContext};
use crate::record::{NormalizedRecord, ObjectKind};
use crate::rights::{EncumbranceRecord, RightRecord};
use crate::schema::{SchemaKind, FINGERPRINTS};
use crate::source::SourceDocument;
use crate::text::clean_text;

/// Raw field access shared by every schema family.
///
/// Accessors never fail: a missing value yields the documented default of
/// the family (`""`, `"-"`, `None` or an empty list).
pub trait ExtractSource {
    fn cadastral_number(&self) -> String;

    /// Constituent numbers of a composite parcel.
    fn entry_parcels(&self) -> Vec<String>;

    fn area(&self) -> Option<f64>;
    fn status(&self) -> String;
    fn address(&self) -> String;

    /// District name used by the administrative owner fallback.
    fn district(&self) -> String;

    fn category(&self) -> String;
    fn permitted_use(&self) -> String;
    fn cadastral_cost(&self) -> Option<f64>;
    fn special_notes(&self) -> String;
    fn estate_objects(&self) -> Vec<String>;

    /// Registration date, `DD.MM.YYYY`.
    fn registration_date(&self) -> String;

    /// Extract issue date, `DD.MM.YYYY`.
    fn extract_date(&self) -> String;

    /// Rights from the current-format (EGRN) sub-tree.
    fn current_rights(&self) -> Vec<RightRecord>;

    /// Rights from the legacy (GKN) sub-tree.
    fn legacy_rights(&self) -> Vec<RightRecord>;

    fn current_encumbrances(&self) -> Vec<EncumbranceRecord>;
    fn legacy_encumbrances(&self) -> Vec<EncumbranceRecord>;

    /// Free-text claim note appended to the encumbrance summary.
    fn claim_note(&self) -> Option<String>;

    /// Boundary contours in document order, keyed for the geometry.
    fn contours(&self) -> Vec<Contour>;

    /// Value of the owner and encumbrance details when nothing is registered.
    fn detail_default(&self) -> &'static str;
}

/// Adapter bound to one document, tagged by schema.
#[derive(Clone, Copy)]
pub enum Adapter<'a, 'input> {
    ParcelKvzu(ParcelExtract<'a, 'input>),
    ParcelKpzu(ParcelExtract<'a, 'input>),
    ParcelEgrn(EgrnExtract<'a, 'input>),
    BuildingKvoks(BuildingExtract<'a, 'input>),
    BuildingKpoks(BuildingExtract<'a, 'input>),
}

impl<'a, 'input> Adapter<'a, 'input> {
    /// Build the adapter for `kind` around the node its fingerprint located.
    pub fn new(
        kind: SchemaKind,
        root: Node<'a, 'input>,
        node: Node<'a, 'input>,
        tables: &'a ClassificationTables,
    ) -> Self {
        match kind {
            SchemaKind::ParcelKvzu => Self::ParcelKvzu(ParcelExtract::new(root, node, tables)),
            SchemaKind::ParcelKpzu => Self::ParcelKpzu(ParcelExtract::new(root, node, tables)),
            SchemaKind::ParcelEgrn => Self::ParcelEgrn(EgrnExtract::new(root, node, tables)),
            SchemaKind::BuildingKvoks => {
                Self::BuildingKvoks(BuildingExtract::new(root, node, tables))
            }
            SchemaKind::BuildingKpoks => {
                Self::BuildingKpoks(BuildingExtract::new(root, node, tables))
            }
        }
    }

    pub fn kind(&self) -> SchemaKind {
        match self {
            Self::ParcelKvzu(_) => SchemaKind::ParcelKvzu,
            Self::ParcelKpzu(_) => SchemaKind::ParcelKpzu,
            Self::ParcelEgrn(_) => SchemaKind::ParcelEgrn,
            Self::BuildingKvoks(_) => SchemaKind::BuildingKvoks,
            Self::BuildingKpoks(_) => SchemaKind::BuildingKpoks,
        }
    }

    pub fn source(&self) -> &dyn ExtractSource {
        match self {
            Self::ParcelKvzu(parcel) | Self::ParcelKpzu(parcel) => parcel,
            Self::ParcelEgrn(egrn) => egrn,
            Self::BuildingKvoks(building) | Self::BuildingKpoks(building) => building,
        }
    }
}

/// One recognized extract with memoized aggregates.
pub struct Extract<'a, 'input> {
    adapter: Adapter<'a, 'input>,
    path: &'a Path,
    settings: &'a ExtractSettings,
    rights: OnceCell<(Vec<RightRecord>, Vec<RightRecord>)>,
    encumbrance_records: OnceCell<(Vec<EncumbranceRecord>, Vec<EncumbranceRecord>)>,
    ownership: OnceCell<Ownership>,
    encumbrances: OnceCell<String>,
    geometry: OnceCell<Geometry>,
}

impl<'a, 'input> Extract<'a, 'input> {
    /// Detect the schema of `doc` and bind its adapter.
    ///
    /// Returns `None` when the document matches no supported schema.
    pub fn bind(
        doc: &'a Document<'input>,
        path: &'a Path,
        tables: &'a ClassificationTables,
        settings: &'a ExtractSettings,
    ) -> Option<Self> {
        let (kind, node) = FINGERPRINTS
            .iter()
            .find_map(|fingerprint| Some((fingerprint.kind, fingerprint.locate(doc)?)))?;
        tracing::debug!(path = %path.display(), schema = %kind, "schema recognized");

        Some(Self {
            adapter: Adapter::new(kind, doc.root_element(), node, tables),
            path,
            settings,
            rights: OnceCell::new(),
            encumbrance_records: OnceCell::new(),
            ownership: OnceCell::new(),
            encumbrances: OnceCell::new(),
            geometry: OnceCell::new(),
        })
    }

    pub fn schema(&self) -> SchemaKind {
        self.adapter.kind()
    }

    pub fn object_kind(&self) -> ObjectKind {
        self.schema().object_kind()
    }

    pub fn path(&self) -> &Path {
        self.path
    }

    /// Raw field access for the bound schema.
    pub fn source(&self) -> &dyn ExtractSource {
        self.adapter.source()
    }

    fn rights(&self) -> &(Vec<RightRecord>, Vec<RightRecord>) {
        self.rights.get_or_init(|| {
            let source = self.source();
            (source.current_rights(), source.legacy_rights())
        })
    }

    fn encumbrance_records(&self) -> &(Vec<EncumbranceRecord>, Vec<EncumbranceRecord>) {
        self.encumbrance_records.get_or_init(|| {
            let source = self.source();
            (source.current_encumbrances(), source.legacy_encumbrances())
        })
    }

    /// Owner string with the review reason, if any.
    pub fn ownership(&self) -> &Ownership {
        self.ownership.get_or_init(|| {
            let source = self.source();
            let category = source.category();
            let district = source.district();
            let context = OwnershipContext {
                category: &category,
                district: &district,
                admin_fallback: self.settings.admin_fallback,
            };

            let (current, legacy) = self.rights();
            let ownership = normalize_ownership(current, legacy, &context);
            if let Some(reason) = &ownership.review {
                tracing::warn!(
                    path = %self.path.display(),
                    cadastral_number = %source.cadastral_number(),
                    %reason,
                    "owner left empty for manual review"
                );
            }
            ownership
        })
    }

    pub fn owner(&self) -> &str {
        &self.ownership().summary
    }

    pub fn owner_details(&self) -> String {
        let (current, legacy) = self.rights();
        describe_rights(current, legacy)
            .unwrap_or_else(|| self.source().detail_default().to_string())
    }

    pub fn encumbrances(&self) -> &str {
        self.encumbrances.get_or_init(|| {
            let (current, legacy) = self.encumbrance_records();
            let claim = self.source().claim_note();
            normalize_encumbrances(current, legacy, claim.as_deref())
        })
    }

    pub fn encumbrance_details(&self) -> String {
        let (current, legacy) = self.encumbrance_records();
        describe_encumbrances(current, legacy)
            .unwrap_or_else(|| self.source().detail_default().to_string())
    }

    pub fn geometry(&self) -> &Geometry {
        self.geometry
            .get_or_init(|| assemble_geometry(self.source().contours()))
    }

    /// Read every field into a [`NormalizedRecord`].
    pub fn to_record(&self) -> NormalizedRecord {
        let source = self.source();
        NormalizedRecord {
            schema: self.schema(),
            object_kind: self.object_kind(),
            cadastral_number: source.cadastral_number(),
            entry_parcels: source.entry_parcels(),
            area: source.area(),
            status: clean_text(&source.status()),
            category: source.category(),
            permitted_use: clean_text(&source.permitted_use()),
            cadastral_cost: source.cadastral_cost(),
            address: clean_text(&source.address()),
            special_notes: clean_text(&source.special_notes()),
            estate_objects: source.estate_objects(),
            registration_date: source.registration_date(),
            extract_date: source.extract_date(),
            owner: clean_text(self.owner()),
            owner_details: self.owner_details(),
            encumbrances: clean_text(self.encumbrances()),
            encumbrance_details: self.encumbrance_details(),
            geometry: self.geometry().clone(),
        }
    }
}

/// Read, detect and normalize one extract file.
///
/// Returns `Ok(None)` for a well-formed document of an unsupported schema.
///
/// # Errors
/// Returns `Io` or `Xml` when the file cannot be read or parsed.
pub fn read_extract(
    path: impl AsRef<Path>,
    tables: &ClassificationTables,
    settings: &ExtractSettings,
) -> Result<Option<NormalizedRecord>> {
    let path = path.as_ref();
    let source = SourceDocument::open(path)?;
    let doc = source.parse()?;
    Ok(Extract::bind(&doc, path, tables, settings).map(|extract| extract.to_record()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classification::Classifier;
    use crate::config::KPZU_NAMESPACE;
    use pretty_assertions::assert_eq;

    fn tables() -> ClassificationTables {
        ClassificationTables {
            land_category: Classifier::from_pairs([
                ("003005000000", "Земли лесного фонда"),
                ("003008000000", "Категория не установлена"),
            ]),
            ..ClassificationTables::default()
        }
    }

    fn kpzu(parcel: &str) -> String {
        format!(r#"<KPZU xmlns="{KPZU_NAMESPACE}">{parcel}</KPZU>"#)
    }

    #[test]
    fn test_bind_unknown_schema() {
        let doc = Document::parse("<extract><building_record/></extract>").unwrap();
        let tables = tables();
        let settings = ExtractSettings::new();
        assert!(Extract::bind(&doc, Path::new("x.xml"), &tables, &settings).is_none());
    }

    #[test]
    fn test_state_owned_default_owner() {
        let xml = kpzu(r#"<Parcel CadastralNumber="47:07:0000000:1"><Category>003005000000</Category></Parcel>"#);
        let doc = Document::parse(&xml).unwrap();
        let tables = tables();
        let settings = ExtractSettings::new();
        let extract = Extract::bind(&doc, Path::new("kpzu.xml"), &tables, &settings).unwrap();

        assert_eq!(extract.schema(), SchemaKind::ParcelKpzu);
        assert_eq!(extract.owner(), "Собственность РФ");
        assert_eq!(extract.owner_details(), "");
        assert_eq!(extract.encumbrances(), "");
    }

    #[test]
    fn test_admin_fallback_uses_district() {
        let xml = kpzu(
            r#"<Parcel CadastralNumber="47:07:0000000:1">
                <Location><Address><District Name="Всеволожский" Type="р-н"/></Address></Location>
            </Parcel>"#,
        );
        let doc = Document::parse(&xml).unwrap();
        let tables = tables();

        let disabled = ExtractSettings::new();
        let extract = Extract::bind(&doc, Path::new("kpzu.xml"), &tables, &disabled).unwrap();
        assert_eq!(extract.owner(), "");

        let enabled = ExtractSettings::new().with_admin_fallback(true);
        let extract = Extract::bind(&doc, Path::new("kpzu.xml"), &tables, &enabled).unwrap();
        assert_eq!(extract.owner(), "Администрация Всеволожского района");
    }

    #[test]
    fn test_egrn_detail_defaults_and_cleanup() {
        let xml = "<extract_about_property_land><land_record>
            <object><common_data><cad_number>47:07:0000000:9</cad_number></common_data></object>
            <special_notes>
                Первая строка
                вторая строка
            </special_notes>
        </land_record></extract_about_property_land>";
        let doc = Document::parse(xml).unwrap();
        let tables = tables();
        let settings = ExtractSettings::new();
        let extract = Extract::bind(&doc, Path::new("egrn.xml"), &tables, &settings).unwrap();

        let record = extract.to_record();
        assert_eq!(record.schema, SchemaKind::ParcelEgrn);
        assert_eq!(record.object_kind, ObjectKind::LandParcel);
        assert_eq!(record.cadastral_number, "47:07:0000000:9");
        assert_eq!(record.special_notes, "Первая строка вторая строка");
        assert_eq!(record.owner_details, "-");
        assert_eq!(record.encumbrance_details, "-");
        assert!(!record.has_geometry());
    }

    #[test]
    fn test_memoized_geometry_is_stable() {
        let xml = kpzu(
            r#"<Parcel CadastralNumber="47:07:0000000:1"><EntitySpatial><SpatialElement>
                <SpelementUnit SuNmb="1"><Ordinate X="0" Y="0"/></SpelementUnit>
                <SpelementUnit SuNmb="2"><Ordinate X="10" Y="0"/></SpelementUnit>
                <SpelementUnit SuNmb="3"><Ordinate X="10" Y="10"/></SpelementUnit>
                <SpelementUnit SuNmb="1"><Ordinate X="0" Y="0"/></SpelementUnit>
            </SpatialElement></EntitySpatial></Parcel>"#,
        );
        let doc = Document::parse(&xml).unwrap();
        let tables = tables();
        let settings = ExtractSettings::new();
        let extract = Extract::bind(&doc, Path::new("kpzu.xml"), &tables, &settings).unwrap();

        let first = extract.geometry() as *const Geometry;
        let second = extract.geometry() as *const Geometry;
        assert_eq!(first, second);
        assert_eq!(
            extract.geometry().keys().collect::<Vec<_>>(),
            vec!["47:07:0000000:1"]
        );
    }

    #[test]
    fn test_read_extract_unsupported_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("other.xml");
        std::fs::write(&path, "<extract/>").unwrap();

        let record = read_extract(&path, &tables(), &ExtractSettings::new()).unwrap();
        assert!(record.is_none());
    }
}

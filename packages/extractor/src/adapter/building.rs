//! Capital construction adapter for the namespaced cadastral extracts
//! (KVOKS, KPOKS).

use roxmltree::Node;

use super::common;
use super::ExtractSource;
use crate::classification::ClassificationTables;
use crate::config::NOT_APPLICABLE;
use crate::geometry::Contour;
use crate::resolve::FieldChain;
use crate::rights::{EncumbranceRecord, RightRecord};
use crate::text::{normalize_date, parse_decimal};
use crate::xml::{attribute_at, element_children, find_all_by_path, find_by_path, find_child, text_at};

/// Element names of the object inside `Realty`, in lookup order.
const OBJECT_TAGS: [&str; 5] = [
    "Building",
    "Construction",
    "Uncompleted",
    "Flat",
    "CarParkingSpace",
];

/// Reads the object element of a `Realty` section.
#[derive(Clone, Copy)]
pub struct BuildingExtract<'a, 'input> {
    root: Node<'a, 'input>,
    realty: Node<'a, 'input>,
    object: Option<Node<'a, 'input>>,
    tables: &'a ClassificationTables,
}

impl<'a, 'input> BuildingExtract<'a, 'input> {
    pub fn new(
        root: Node<'a, 'input>,
        realty: Node<'a, 'input>,
        tables: &'a ClassificationTables,
    ) -> Self {
        let object = OBJECT_TAGS
            .iter()
            .find_map(|tag| find_child(realty, tag));
        if object.is_none() {
            tracing::debug!(
                children = ?element_children(realty).map(|n| n.tag_name().name()).collect::<Vec<_>>(),
                "no object element inside Realty"
            );
        }
        Self {
            root,
            realty,
            object,
            tables,
        }
    }

    fn text(&self, path: &str) -> Option<String> {
        text_at(self.object?, path)
    }

    fn attribute(&self, name: &str) -> Option<String> {
        attribute_at(self.object?, "", name)
    }

    fn address_node(&self) -> Option<Node<'a, 'input>> {
        find_child(self.object?, "Address")
    }

    fn extract_object_right(&self) -> Option<Node<'a, 'input>> {
        find_by_path(self.root, "ReestrExtract/ExtractObjectRight")
    }

    pub fn registration_date_chain() -> FieldChain<Self, String> {
        FieldChain::<Self, String>::new("registration_date")
            .then("@DateCreated", |b| b.attribute("DateCreated"))
            .then("@DateCreatedDoc", |b| b.attribute("DateCreatedDoc"))
    }

    pub fn legacy_rights_chain() -> FieldChain<Self, Vec<RightRecord>> {
        FieldChain::<Self, Vec<RightRecord>>::new("legacy_rights")
            .then("object/Rights", |b| {
                let rights = common::legacy_rights(b.object?, b.tables);
                (!rights.is_empty()).then_some(rights)
            })
            .then("Realty/Rights", |b| {
                let rights = common::legacy_rights(b.realty, b.tables);
                (!rights.is_empty()).then_some(rights)
            })
    }

    pub fn legacy_encumbrances_chain() -> FieldChain<Self, Vec<EncumbranceRecord>> {
        FieldChain::<Self, Vec<EncumbranceRecord>>::new("legacy_encumbrances")
            .then("object/Encumbrances", |b| {
                let records = common::legacy_encumbrances(b.object?, b.tables);
                (!records.is_empty()).then_some(records)
            })
            .then("Realty/Encumbrances", |b| {
                let records = common::legacy_encumbrances(b.realty, b.tables);
                (!records.is_empty()).then_some(records)
            })
    }

    pub fn extract_date_chain() -> FieldChain<Self, String> {
        FieldChain::<Self, String>::new("extract_date")
            .then("FootContent/ExtractDate", |b| {
                text_at(b.extract_object_right()?, "FootContent/ExtractDate")
            })
            .then("CertificationDoc/Date", |b| text_at(b.root, "CertificationDoc/Date"))
    }
}

impl ExtractSource for BuildingExtract<'_, '_> {
    fn cadastral_number(&self) -> String {
        self.attribute("CadastralNumber").unwrap_or_default()
    }

    fn entry_parcels(&self) -> Vec<String> {
        Vec::new()
    }

    fn area(&self) -> Option<f64> {
        self.text("Area").and_then(|a| parse_decimal(&a))
    }

    fn status(&self) -> String {
        self.attribute("State")
            .map(|code| self.tables.status.label(&code))
            .unwrap_or_default()
    }

    fn address(&self) -> String {
        self.address_node()
            .map(|address| common::address_text(address, self.tables))
            .unwrap_or_default()
    }

    fn district(&self) -> String {
        self.address_node()
            .and_then(common::district_name)
            .unwrap_or_default()
    }

    fn category(&self) -> String {
        NOT_APPLICABLE.to_string()
    }

    fn permitted_use(&self) -> String {
        NOT_APPLICABLE.to_string()
    }

    fn cadastral_cost(&self) -> Option<f64> {
        attribute_at(self.object?, "CadastralCost", "Value").and_then(|v| parse_decimal(&v))
    }

    fn special_notes(&self) -> String {
        self.text("Notes").unwrap_or_default()
    }

    fn estate_objects(&self) -> Vec<String> {
        let Some(object) = self.object else {
            return Vec::new();
        };
        find_all_by_path(object, "Flats/Flat")
            .into_iter()
            .filter_map(|flat| attribute_at(flat, "", "CadastralNumber"))
            .collect()
    }

    fn registration_date(&self) -> String {
        normalize_date(&Self::registration_date_chain().resolve_or_default(self))
    }

    fn extract_date(&self) -> String {
        normalize_date(&Self::extract_date_chain().resolve_or_default(self))
    }

    fn current_rights(&self) -> Vec<RightRecord> {
        self.extract_object_right()
            .map(|eor| common::current_rights(eor, self.tables))
            .unwrap_or_default()
    }

    fn legacy_rights(&self) -> Vec<RightRecord> {
        Self::legacy_rights_chain().resolve_or_default(self)
    }

    fn current_encumbrances(&self) -> Vec<EncumbranceRecord> {
        self.extract_object_right()
            .map(|eor| common::current_encumbrances(eor, self.tables))
            .unwrap_or_default()
    }

    fn legacy_encumbrances(&self) -> Vec<EncumbranceRecord> {
        Self::legacy_encumbrances_chain().resolve_or_default(self)
    }

    fn claim_note(&self) -> Option<String> {
        self.extract_object_right().and_then(common::claim_note)
    }

    fn contours(&self) -> Vec<Contour> {
        let number = self.cadastral_number();

        if let Some(object) = self.object {
            if common::has_entity_spatial(object) {
                return vec![Contour::new(number, common::spatial_points(object))];
            }
            if find_child(object, "Contours").is_some() {
                return common::numbered_contours(object, &number);
            }
        }

        if find_child(self.realty, "Contours").is_some() {
            return common::numbered_contours(self.realty, &number);
        }

        vec![Contour::new(number, common::spatial_points(self.realty))]
    }

    fn detail_default(&self) -> &'static str {
        ""
    }
}

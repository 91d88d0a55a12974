//! Land parcel adapter for the namespaced cadastral extracts (KVZU, KPZU).

use roxmltree::Node;

use super::common;
use super::ExtractSource;
use crate::classification::ClassificationTables;
use crate::config::{NOT_APPLICABLE, UNDEFINED_CATEGORY_CODE};
use crate::geometry::Contour;
use crate::resolve::FieldChain;
use crate::rights::{EncumbranceRecord, RightRecord};
use crate::text::{normalize_date, parse_decimal};
use crate::xml::{attribute_at, find_all_by_path, find_by_path, find_child, text_at};

/// Reads a `Parcel` element and the `ReestrExtract` rights section of the
/// same document.
#[derive(Clone, Copy)]
pub struct ParcelExtract<'a, 'input> {
    root: Node<'a, 'input>,
    parcel: Node<'a, 'input>,
    tables: &'a ClassificationTables,
}

impl<'a, 'input> ParcelExtract<'a, 'input> {
    pub fn new(
        root: Node<'a, 'input>,
        parcel: Node<'a, 'input>,
        tables: &'a ClassificationTables,
    ) -> Self {
        Self {
            root,
            parcel,
            tables,
        }
    }

    fn text(&self, path: &str) -> Option<String> {
        text_at(self.parcel, path)
    }

    fn attribute(&self, name: &str) -> Option<String> {
        attribute_at(self.parcel, "", name)
    }

    fn address_node(&self) -> Option<Node<'a, 'input>> {
        find_by_path(self.parcel, "Location/Address")
    }

    fn extract_object_right(&self) -> Option<Node<'a, 'input>> {
        find_by_path(self.root, "ReestrExtract/ExtractObjectRight")
    }

    pub fn area_chain() -> FieldChain<Self, f64> {
        FieldChain::<Self, f64>::new("area")
            .then("Area/Area", |p| p.text("Area/Area").and_then(|a| parse_decimal(&a)))
            .then("Area", |p| p.text("Area").and_then(|a| parse_decimal(&a)))
    }

    pub fn address_chain() -> FieldChain<Self, String> {
        FieldChain::<Self, String>::new("address")
            .then("Location/Address/Note", |p| {
                let note = text_at(p.address_node()?, "Note")?;
                Some(if note == "," { String::new() } else { note })
            })
            .then("Location/Address", |p| {
                Some(common::compose_address(p.address_node()?, p.tables))
            })
    }

    pub fn category_chain() -> FieldChain<Self, String> {
        FieldChain::<Self, String>::new("category").then("Category", |p| {
            let code = p.text("Category")?;
            p.tables.land_category.get(&code).map(String::from)
        })
    }

    pub fn permitted_use_chain() -> FieldChain<Self, String> {
        FieldChain::<Self, String>::new("permitted_use")
            .then("Utilization@ByDoc", |p| attribute_at(p.parcel, "Utilization", "ByDoc"))
            .then("Utilization@Utilization", |p| {
                let code = attribute_at(p.parcel, "Utilization", "Utilization")?;
                p.tables.permitted_use.get(&code).map(String::from)
            })
    }

    pub fn registration_date_chain() -> FieldChain<Self, String> {
        FieldChain::<Self, String>::new("registration_date")
            .then("@DateCreated", |p| p.attribute("DateCreated"))
            .then("@DateCreatedDoc", |p| p.attribute("DateCreatedDoc"))
    }

    pub fn extract_date_chain() -> FieldChain<Self, String> {
        FieldChain::<Self, String>::new("extract_date")
            .then("FootContent/ExtractDate", |p| {
                text_at(p.extract_object_right()?, "FootContent/ExtractDate")
            })
            .then("CertificationDoc/Date", |p| text_at(p.root, "CertificationDoc/Date"))
    }
}

impl ExtractSource for ParcelExtract<'_, '_> {
    fn cadastral_number(&self) -> String {
        self.attribute("CadastralNumber").unwrap_or_default()
    }

    fn entry_parcels(&self) -> Vec<String> {
        find_all_by_path(self.parcel, "CompositionEZ/EntryParcel")
            .into_iter()
            .filter_map(|entry| attribute_at(entry, "", "CadastralNumber"))
            .collect()
    }

    fn area(&self) -> Option<f64> {
        Self::area_chain().resolve(self)
    }

    fn status(&self) -> String {
        self.attribute("State")
            .map(|code| self.tables.status.label(&code))
            .unwrap_or_default()
    }

    fn address(&self) -> String {
        Self::address_chain().resolve_or_default(self)
    }

    fn district(&self) -> String {
        self.address_node()
            .and_then(common::district_name)
            .unwrap_or_default()
    }

    fn category(&self) -> String {
        Self::category_chain().resolve_or(
            self,
            self.tables.land_category.label(UNDEFINED_CATEGORY_CODE),
        )
    }

    fn permitted_use(&self) -> String {
        Self::permitted_use_chain().resolve_or(self, NOT_APPLICABLE.to_string())
    }

    fn cadastral_cost(&self) -> Option<f64> {
        attribute_at(self.parcel, "CadastralCost", "Value").and_then(|v| parse_decimal(&v))
    }

    fn special_notes(&self) -> String {
        self.text("SpecialNote").unwrap_or_default()
    }

    fn estate_objects(&self) -> Vec<String> {
        find_all_by_path(self.parcel, "InnerCadastralNumbers/CadastralNumber")
            .into_iter()
            .filter_map(|number| text_at(number, ""))
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
        common::legacy_rights(self.parcel, self.tables)
    }

    fn current_encumbrances(&self) -> Vec<EncumbranceRecord> {
        self.extract_object_right()
            .map(|eor| common::current_encumbrances(eor, self.tables))
            .unwrap_or_default()
    }

    fn legacy_encumbrances(&self) -> Vec<EncumbranceRecord> {
        common::legacy_encumbrances(self.parcel, self.tables)
    }

    fn claim_note(&self) -> Option<String> {
        self.extract_object_right().and_then(common::claim_note)
    }

    fn contours(&self) -> Vec<Contour> {
        let number = self.cadastral_number();

        if let Some(composition) = find_child(self.parcel, "CompositionEZ") {
            return find_all_by_path(composition, "EntryParcel")
                .into_iter()
                .map(|entry| {
                    let key = attribute_at(entry, "", "CadastralNumber").unwrap_or_default();
                    Contour::new(key, common::spatial_points(entry))
                })
                .collect();
        }

        if find_child(self.parcel, "Contours").is_some() {
            return common::numbered_contours(self.parcel, &number);
        }

        vec![Contour::new(number, common::spatial_points(self.parcel))]
    }

    fn detail_default(&self) -> &'static str {
        ""
    }
}

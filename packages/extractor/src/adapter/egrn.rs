//! Land parcel adapter for the namespace-free EGRN extract
//! (`extract_about_property_land`).

use roxmltree::Node;

use super::common::{beneficiary, holder_names};
use super::ExtractSource;
use crate::classification::ClassificationTables;
use crate::config::{
    ADDRESS_DISTRICT_PATTERN, CADASTRAL_NUMBER_PATTERN, COMPOSITE_PARCEL_MARKER, NOT_APPLICABLE,
};
use crate::geometry::{Contour, SpatialPoint};
use crate::resolve::FieldChain;
use crate::rights::{EncumbranceRecord, Registration, RightKind, RightRecord, Share, Validity};
use crate::text::{normalize_date, parse_decimal};
use crate::xml::{find_all_by_path, find_by_path, text_at};

#[derive(Clone, Copy)]
pub struct EgrnExtract<'a, 'input> {
    root: Node<'a, 'input>,
    record: Node<'a, 'input>,
    tables: &'a ClassificationTables,
}

impl<'a, 'input> EgrnExtract<'a, 'input> {
    pub fn new(
        root: Node<'a, 'input>,
        record: Node<'a, 'input>,
        tables: &'a ClassificationTables,
    ) -> Self {
        Self {
            root,
            record,
            tables,
        }
    }

    fn text(&self, path: &str) -> Option<String> {
        text_at(self.record, path)
    }

    pub fn entry_parcels_chain() -> FieldChain<Self, Vec<String>> {
        FieldChain::<Self, Vec<String>>::new("entry_parcels")
            .then("common_land_parts", |e| {
                let numbers: Vec<String> = find_all_by_path(
                    e.record,
                    "cad_links/common_land/common_land_parts/included_cad_numbers/included_cad_number/cad_number",
                )
                .into_iter()
                .filter_map(|number| text_at(number, ""))
                .collect();
                (!numbers.is_empty()).then_some(numbers)
            })
            .then("special_notes", |e| {
                let notes = e.text("special_notes")?;
                let (_, listed) = notes.split_once(COMPOSITE_PARCEL_MARKER)?;
                let numbers: Vec<String> = CADASTRAL_NUMBER_PATTERN
                    .find_iter(listed)
                    .map(|m| m.as_str().to_string())
                    .collect();
                (!numbers.is_empty()).then_some(numbers)
            })
    }

    pub fn category_chain() -> FieldChain<Self, String> {
        FieldChain::<Self, String>::new("category")
            .then("params/category/type/code", |e| {
                let code = e.text("params/category/type/code")?;
                e.tables.land_category.get(&code).map(String::from)
            })
            .then("params/category/type/value", |e| {
                e.text("params/category/type/value")
            })
    }

    fn right_records(&self) -> Vec<RightRecord> {
        find_all_by_path(self.root, "right_records/right_record")
            .into_iter()
            .map(|record| self.right_record(record))
            .collect()
    }

    fn right_record(&self, record: Node<'_, '_>) -> RightRecord {
        let code = text_at(record, "right_data/right_type/code").unwrap_or_default();
        let label = text_at(record, "right_data/right_type/value")
            .unwrap_or_else(|| self.tables.right.label(&code));
        let kind = match RightKind::from_code(&code) {
            RightKind::Other => RightKind::from_label(&label),
            kind => kind,
        };

        let share = find_by_path(record, "right_data/shares/share").and_then(|share| {
            Share::from_parts(&text_at(share, "numerator")?, &text_at(share, "denominator")?)
        });

        RightRecord::new(kind, label)
            .with_share(share)
            .with_holders(holder_names(find_all_by_path(
                record,
                "right_holders/right_holder",
            )))
            .with_registration(Registration {
                name: None,
                number: text_at(record, "right_data/right_number"),
                date: text_at(record, "record_info/registration_date").map(|d| normalize_date(&d)),
            })
    }

    fn restrict_records(&self) -> Vec<EncumbranceRecord> {
        find_all_by_path(self.root, "restrict_records/restrict_record")
            .into_iter()
            .map(|record| self.restrict_record(record))
            .collect()
    }

    fn restrict_record(&self, record: Node<'_, '_>) -> EncumbranceRecord {
        let data = find_by_path(record, "restrictions_encumbrances_data");
        let label = data
            .and_then(|data| {
                text_at(data, "restriction_encumbrance_type/value").or_else(|| {
                    text_at(data, "restriction_encumbrance_type/code")
                        .map(|code| self.tables.encumbrance.label(&code))
                })
            })
            .unwrap_or_default();

        let parties = find_all_by_path(
            record,
            "restrict_parties/restricted_rights_parties/restricted_rights_party/subject",
        )
        .into_iter()
        .chain(find_all_by_path(record, "right_holders/right_holder"));

        EncumbranceRecord::new(label)
            .with_beneficiary(beneficiary(parties))
            .with_validity(data.and_then(|data| find_by_path(data, "period")).and_then(period))
            .with_registration(Registration {
                name: None,
                number: data.and_then(|data| text_at(data, "restriction_encumbrance_number")),
                date: text_at(record, "record_info/registration_date").map(|d| normalize_date(&d)),
            })
    }
}

/// Validity of a restriction from its `period` element.
fn period(period: Node<'_, '_>) -> Option<Validity> {
    if let Some(ddu) = find_by_path(period, "period_ddu") {
        if let (Some(first_contract), Some(transfer_deadline)) = (
            text_at(ddu, "first_ddu_date"),
            text_at(ddu, "transfer_deadline"),
        ) {
            return Some(Validity::SharedConstruction {
                first_contract: normalize_date(&first_contract),
                transfer_deadline: normalize_date(&transfer_deadline),
            });
        }
    }

    let info = find_by_path(period, "period_info")?;
    let start = normalize_date(&text_at(info, "start_date")?);
    if let Some(end) = text_at(info, "end_date") {
        return Some(Validity::Between {
            start,
            end: normalize_date(&end),
        });
    }
    text_at(info, "deal_validity_time").map(|term| Validity::Since { start, term })
}

/// Boundary points of an EGRN contour.
///
/// The point number (`ord_nmb`) is the ring marker when present; otherwise
/// the coordinate text itself is, so a repeated position closes the ring.
fn ordinates(contour: Node<'_, '_>) -> Vec<SpatialPoint> {
    find_all_by_path(
        contour,
        "entity_spatial/spatials_elements/spatial_element/ordinates/ordinate",
    )
    .into_iter()
    .filter_map(|ordinate| {
        let x_text = text_at(ordinate, "x")?;
        let y_text = text_at(ordinate, "_y").or_else(|| text_at(ordinate, "y"))?;
        let (Some(x), Some(y)) = (parse_decimal(&x_text), parse_decimal(&y_text)) else {
            tracing::debug!(x = %x_text, y = %y_text, "skipping ordinate without numeric coordinates");
            return None;
        };
        let marker = text_at(ordinate, "ord_nmb").unwrap_or_else(|| format!("{x_text}{y_text}"));
        Some(SpatialPoint::new(x, y, marker))
    })
    .collect()
}

impl ExtractSource for EgrnExtract<'_, '_> {
    fn cadastral_number(&self) -> String {
        self.text("object/common_data/cad_number").unwrap_or_default()
    }

    fn entry_parcels(&self) -> Vec<String> {
        Self::entry_parcels_chain().resolve_or_default(self)
    }

    fn area(&self) -> Option<f64> {
        self.text("params/area/value").and_then(|a| parse_decimal(&a))
    }

    fn status(&self) -> String {
        text_at(self.root, "status").unwrap_or_default()
    }

    fn address(&self) -> String {
        self.text("address_location/address/readable_address")
            .unwrap_or_default()
    }

    fn district(&self) -> String {
        let address = self.address();
        ADDRESS_DISTRICT_PATTERN
            .captures(&address)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .unwrap_or_default()
    }

    fn category(&self) -> String {
        Self::category_chain().resolve_or_default(self)
    }

    fn permitted_use(&self) -> String {
        self.text("params/permitted_use/permitted_use_established/by_document")
            .unwrap_or_default()
    }

    fn cadastral_cost(&self) -> Option<f64> {
        self.text("cost/value").and_then(|v| parse_decimal(&v))
    }

    fn special_notes(&self) -> String {
        self.text("special_notes").unwrap_or_default()
    }

    fn estate_objects(&self) -> Vec<String> {
        find_all_by_path(
            self.record,
            "cad_links/included_objects/included_object/cad_number",
        )
        .into_iter()
        .filter_map(|number| text_at(number, ""))
        .collect()
    }

    fn registration_date(&self) -> String {
        normalize_date(&self.text("record_info/registration_date").unwrap_or_default())
    }

    fn extract_date(&self) -> String {
        normalize_date(
            &text_at(self.root, "details_statement/group_top_requisites/date_formation")
                .unwrap_or_default(),
        )
    }

    fn current_rights(&self) -> Vec<RightRecord> {
        self.right_records()
    }

    fn legacy_rights(&self) -> Vec<RightRecord> {
        Vec::new()
    }

    fn current_encumbrances(&self) -> Vec<EncumbranceRecord> {
        self.restrict_records()
    }

    fn legacy_encumbrances(&self) -> Vec<EncumbranceRecord> {
        Vec::new()
    }

    fn claim_note(&self) -> Option<String> {
        None
    }

    fn contours(&self) -> Vec<Contour> {
        let parent = self.cadastral_number();
        find_all_by_path(self.record, "contours_location/contours/contour")
            .into_iter()
            .map(|contour| {
                let key = text_at(contour, "cad_number")
                    .or_else(|| {
                        text_at(contour, "number_pp").map(|number| format!("{parent}({number})"))
                    })
                    .unwrap_or_else(|| parent.clone());
                Contour::new(key, ordinates(contour))
            })
            .collect()
    }

    fn detail_default(&self) -> &'static str {
        NOT_APPLICABLE
    }
}

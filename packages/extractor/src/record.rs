//! The normalized record and its tabular and polygon views.

use chrono::NaiveDate;
use serde::Serialize;

use crate::config::{CAPITAL_CONSTRUCTION_LABEL, LAND_PARCEL_LABEL, NOT_APPLICABLE};
use crate::geometry::{Geometry, Ring};
use crate::schema::SchemaKind;
use crate::text::calendar_date;

/// Kind of real-estate object described by a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    LandParcel,
    CapitalConstruction,
}

impl ObjectKind {
    /// Display label written to the object type column.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::LandParcel => LAND_PARCEL_LABEL,
            Self::CapitalConstruction => CAPITAL_CONSTRUCTION_LABEL,
        }
    }
}

/// One normalized extract.
///
/// String fields are empty (or `"-"` where the schema family says so) when
/// the extract carries no value; the record never fails for missing data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedRecord {
    pub schema: SchemaKind,
    pub object_kind: ObjectKind,
    pub cadastral_number: String,
    /// Constituent parcels of a composite parcel.
    pub entry_parcels: Vec<String>,
    /// Area in square metres.
    pub area: Option<f64>,
    pub status: String,
    pub category: String,
    pub permitted_use: String,
    pub cadastral_cost: Option<f64>,
    pub address: String,
    pub special_notes: String,
    /// Objects located on the parcel, or units inside the building.
    pub estate_objects: Vec<String>,
    pub registration_date: String,
    pub extract_date: String,
    pub owner: String,
    pub owner_details: String,
    pub encumbrances: String,
    pub encumbrance_details: String,
    pub geometry: Geometry,
}

/// Flat table row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordRow<'a> {
    pub cadastral_number: &'a str,
    /// Primary number for constituent rows, `"-"` otherwise.
    pub parent_cadastral_number: &'a str,
    pub area: Option<f64>,
    pub address: &'a str,
    pub status: &'a str,
    pub category: &'a str,
    pub permitted_use: &'a str,
    pub owner: &'a str,
    pub owner_details: &'a str,
    pub encumbrances: &'a str,
    pub encumbrance_details: &'a str,
    pub special_notes: &'a str,
    pub registration_date: &'a str,
    pub extract_date: &'a str,
    pub estate_objects: String,
    pub cadastral_cost: Option<f64>,
    pub object_type: &'static str,
}

/// One polygon of the record, ready for a GIS writer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Feature<'a> {
    pub cadastral_number: String,
    /// Empty when the polygon belongs to the primary number itself.
    pub parent_cadastral_number: String,
    /// Contour qualifier such as `"(2)"`; empty for whole objects.
    pub contour: String,
    pub rings: &'a [Ring],
    pub registration_date: Option<NaiveDate>,
    pub extract_date: Option<NaiveDate>,
}

impl NormalizedRecord {
    /// Table rows: one per constituent parcel, or one for the whole object.
    #[must_use]
    pub fn rows(&self) -> Vec<RecordRow<'_>> {
        if self.entry_parcels.is_empty() {
            return vec![self.row(&self.cadastral_number, NOT_APPLICABLE)];
        }
        self.entry_parcels
            .iter()
            .map(|entry| self.row(entry, &self.cadastral_number))
            .collect()
    }

    /// Polygon features, one per ring group, in geometry order.
    #[must_use]
    pub fn features(&self) -> Vec<Feature<'_>> {
        let registration_date = calendar_date(&self.registration_date);
        let extract_date = calendar_date(&self.extract_date);

        self.geometry
            .groups()
            .iter()
            .map(|group| {
                let (cadastral_number, contour) = self.split_key(&group.key);
                let parent_cadastral_number = if cadastral_number == self.cadastral_number {
                    String::new()
                } else {
                    self.cadastral_number.clone()
                };
                Feature {
                    cadastral_number,
                    parent_cadastral_number,
                    contour,
                    rings: &group.rings,
                    registration_date,
                    extract_date,
                }
            })
            .collect()
    }

    /// Whether the extract carried any usable boundary.
    #[must_use]
    pub fn has_geometry(&self) -> bool {
        !self.geometry.is_empty()
    }

    fn row<'a>(&'a self, number: &'a str, parent: &'a str) -> RecordRow<'a> {
        RecordRow {
            cadastral_number: number,
            parent_cadastral_number: parent,
            area: self.area,
            address: &self.address,
            status: &self.status,
            category: &self.category,
            permitted_use: &self.permitted_use,
            owner: &self.owner,
            owner_details: &self.owner_details,
            encumbrances: &self.encumbrances,
            encumbrance_details: &self.encumbrance_details,
            special_notes: &self.special_notes,
            registration_date: &self.registration_date,
            extract_date: &self.extract_date,
            estate_objects: self.estate_objects.join(", "),
            cadastral_cost: self.cadastral_cost,
            object_type: self.object_kind.label(),
        }
    }

    /// Split a geometry key into cadastral number and contour qualifier.
    fn split_key(&self, key: &str) -> (String, String) {
        if let Some(index) = key.find('(') {
            (key[..index].to_string(), key[index..].to_string())
        } else if !key.contains(':') {
            (self.cadastral_number.clone(), key.to_string())
        } else {
            (key.to_string(), String::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{assemble_geometry, Contour, SpatialPoint};

    fn square(offset: f64) -> Vec<SpatialPoint> {
        vec![
            SpatialPoint::new(offset, offset, "1"),
            SpatialPoint::new(offset + 10.0, offset, "2"),
            SpatialPoint::new(offset + 10.0, offset + 10.0, "3"),
            SpatialPoint::new(offset, offset + 10.0, "4"),
            SpatialPoint::new(offset, offset, "1"),
        ]
    }

    fn record() -> NormalizedRecord {
        NormalizedRecord {
            schema: SchemaKind::ParcelKvzu,
            object_kind: ObjectKind::LandParcel,
            cadastral_number: "47:07:0000000:100".to_string(),
            entry_parcels: Vec::new(),
            area: Some(1500.0),
            status: "Учтенный".to_string(),
            category: "Земли населенных пунктов".to_string(),
            permitted_use: "Для ИЖС".to_string(),
            cadastral_cost: None,
            address: String::new(),
            special_notes: String::new(),
            estate_objects: vec!["47:07:0000000:501".to_string(), "47:07:0000000:502".to_string()],
            registration_date: "15.06.2005".to_string(),
            extract_date: String::new(),
            owner: String::new(),
            owner_details: String::new(),
            encumbrances: String::new(),
            encumbrance_details: String::new(),
            geometry: Geometry::new(),
        }
    }

    #[test]
    fn test_rows_single_object() {
        let record = record();
        let rows = record.rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].cadastral_number, "47:07:0000000:100");
        assert_eq!(rows[0].parent_cadastral_number, "-");
        assert_eq!(rows[0].estate_objects, "47:07:0000000:501, 47:07:0000000:502");
        assert_eq!(rows[0].object_type, "Земельный участок");
    }

    #[test]
    fn test_rows_composite_parcel() {
        let mut record = record();
        record.entry_parcels = vec!["47:07:0000000:1".to_string(), "47:07:0000000:2".to_string()];

        let rows = record.rows();
        assert_eq!(rows.len(), 2);
        assert!(rows
            .iter()
            .all(|row| row.parent_cadastral_number == "47:07:0000000:100"));
        assert_eq!(rows[1].cadastral_number, "47:07:0000000:2");
    }

    #[test]
    fn test_features_split_keys() {
        let mut record = record();
        record.geometry = assemble_geometry(vec![
            Contour::new("47:07:0000000:100", square(0.0)),
            Contour::new("47:07:0000000:100(2)", square(100.0)),
            Contour::new("47:07:0000000:7", square(200.0)),
            Contour::new("3", square(300.0)),
        ]);

        let features = record.features();
        let keys: Vec<(&str, &str, &str)> = features
            .iter()
            .map(|f| {
                (
                    f.cadastral_number.as_str(),
                    f.parent_cadastral_number.as_str(),
                    f.contour.as_str(),
                )
            })
            .collect();
        assert_eq!(
            keys,
            vec![
                ("47:07:0000000:100", "", ""),
                ("47:07:0000000:100", "", "(2)"),
                ("47:07:0000000:7", "47:07:0000000:100", ""),
                ("47:07:0000000:100", "", "3"),
            ]
        );
        assert_eq!(features[0].registration_date, NaiveDate::from_ymd_opt(2005, 6, 15));
        assert_eq!(features[0].extract_date, NaiveDate::from_ymd_opt(1, 1, 1));
    }

    #[test]
    fn test_object_kind_labels() {
        assert_eq!(ObjectKind::LandParcel.label(), "Земельный участок");
        assert_eq!(
            ObjectKind::CapitalConstruction.label(),
            "Объект капитального строительства"
        );
    }
}

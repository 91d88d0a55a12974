//! End-to-end tests over fixture extracts of every supported schema.
//!
//! Each fixture is read from disk, detected, normalized with the fixture
//! classification tables and compared field by field.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use pretty_assertions::assert_eq;

use egrn_extractor::batch::{process_batch, xml_files};
use egrn_extractor::output::to_json_lines;
use egrn_extractor::{
    detect_file, read_extract, ClassificationTables, ExtractSettings, NormalizedRecord,
    ObjectKind, SchemaKind,
};

fn fixtures() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

fn extract_path(name: &str) -> PathBuf {
    fixtures().join("extracts").join(name)
}

fn tables() -> ClassificationTables {
    ClassificationTables::load_dir(fixtures().join("tables"))
        .unwrap_or_else(|e| panic!("Failed to load fixture tables: {e}"))
}

fn read(name: &str, settings: &ExtractSettings) -> NormalizedRecord {
    read_extract(extract_path(name), &tables(), settings)
        .unwrap_or_else(|e| panic!("Failed to read {name}: {e}"))
        .unwrap_or_else(|| panic!("Schema of {name} not recognized"))
}

#[test]
fn test_detects_every_fixture_schema() {
    let cases = [
        ("kvzu_composite.xml", Some(SchemaKind::ParcelKvzu)),
        ("kpzu_forest.xml", Some(SchemaKind::ParcelKpzu)),
        ("egrn_land.xml", Some(SchemaKind::ParcelEgrn)),
        ("kvoks_building.xml", Some(SchemaKind::BuildingKvoks)),
        ("kpoks_flat.xml", Some(SchemaKind::BuildingKpoks)),
        ("unknown_schema.xml", None),
    ];

    for (name, expected) in cases {
        assert_eq!(detect_file(extract_path(name)).unwrap(), expected, "{name}");
    }
}

#[test]
fn test_kvzu_composite_parcel() {
    let record = read("kvzu_composite.xml", &ExtractSettings::new());

    assert_eq!(record.object_kind, ObjectKind::LandParcel);
    assert_eq!(record.cadastral_number, "47:07:0000000:100");
    assert_eq!(
        record.entry_parcels,
        vec!["47:07:0000000:101", "47:07:0000000:102"]
    );
    assert_eq!(record.area, Some(25000.0));
    assert_eq!(record.status, "Учтенный");
    assert_eq!(
        record.address,
        "Ленинградская область, Всеволожский р-н, д Кудрово"
    );
    assert_eq!(record.category, "Земли сельскохозяйственного назначения");
    assert_eq!(record.permitted_use, "для ведения сельского хозяйства");
    assert_eq!(record.cadastral_cost, Some(1_250_000.5));
    assert_eq!(record.registration_date, "15.03.2010");
    assert_eq!(record.extract_date, "20.05.2021");

    assert_eq!(
        record.owner,
        "Долевая собственность: 1/2 Иванов Иван Иванович, 1/2 Петрова Мария Сергеевна"
    );
    assert_eq!(
        record.owner_details,
        "Общая долевая собственность, № 47-47/012-47/012/001/2015-1/2 от 15.04.2015; \
         Общая долевая собственность, № 47-47/012-47/012/001/2015-2/2 от 15.04.2015"
    );
    assert_eq!(
        record.encumbrances,
        "Аренда ООО \"Агрохолдинг\" ИНН 4703000000"
    );
    assert_eq!(
        record.encumbrance_details,
        "Аренда №47-47/012-47/012/001/2016-5 от 10.02.2016, срок действия: с 10.02.2016 по 09.02.2065"
    );
}

#[test]
fn test_kvzu_geometry_and_rows() {
    let record = read("kvzu_composite.xml", &ExtractSettings::new());

    let keys: Vec<&str> = record.geometry.keys().collect();
    assert_eq!(keys, vec!["47:07:0000000:101", "47:07:0000000:102"]);

    let rings = record.geometry.get("47:07:0000000:101").unwrap();
    assert_eq!(rings.len(), 2);
    assert!(rings[0].signed_area() < 0.0, "outer ring must be clockwise");
    assert!(rings[1].signed_area() > 0.0, "hole must be counter-clockwise");
    assert_eq!(rings[0].points.len(), 4);

    let rows = record.rows();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].cadastral_number, "47:07:0000000:101");
    assert_eq!(rows[0].parent_cadastral_number, "47:07:0000000:100");
    assert_eq!(rows[1].object_type, "Земельный участок");

    let features = record.features();
    assert_eq!(features.len(), 2);
    assert_eq!(features[0].cadastral_number, "47:07:0000000:101");
    assert_eq!(features[0].parent_cadastral_number, "47:07:0000000:100");
    assert_eq!(features[0].contour, "");
}

#[test]
fn test_kpzu_forest_parcel_defaults_to_state_owner() {
    let record = read("kpzu_forest.xml", &ExtractSettings::new());

    assert_eq!(record.area, Some(1200.0));
    assert_eq!(record.status, "Ранее учтенный");
    assert_eq!(
        record.address,
        "Ленинградская область, Лужский район, Заклинское сельское поселение"
    );
    assert_eq!(record.category, "Земли лесного фонда");
    assert_eq!(record.permitted_use, "Для сельскохозяйственного производства");
    assert_eq!(record.registration_date, "20.11.2008");
    assert_eq!(record.extract_date, "01.11.2019");
    assert_eq!(record.owner, "Собственность РФ");
    assert_eq!(record.owner_details, "");
    assert_eq!(
        record.encumbrances,
        "Ограничения прав на земельный участок, предусмотренные статьей 56 Земельного кодекса Российской Федерации"
    );
    assert_eq!(record.encumbrance_details, "");

    let keys: Vec<&str> = record.geometry.keys().collect();
    assert_eq!(
        keys,
        vec!["47:29:0000000:200(1)", "47:29:0000000:200(2)"]
    );
    let features = record.features();
    assert_eq!(features[1].cadastral_number, "47:29:0000000:200");
    assert_eq!(features[1].parent_cadastral_number, "");
    assert_eq!(features[1].contour, "(2)");
}

#[test]
fn test_egrn_parcel() {
    let record = read("egrn_land.xml", &ExtractSettings::new());

    assert_eq!(record.schema, SchemaKind::ParcelEgrn);
    assert_eq!(record.cadastral_number, "47:23:0000000:300");
    assert!(record.entry_parcels.is_empty());
    assert_eq!(record.area, Some(1200.0));
    assert_eq!(record.status, "Актуальные");
    assert_eq!(record.category, "Земли населенных пунктов");
    assert_eq!(
        record.permitted_use,
        "для индивидуального жилищного строительства"
    );
    assert_eq!(record.cadastral_cost, Some(3_500_000.0));
    assert_eq!(
        record.estate_objects,
        vec!["47:23:0000000:301", "47:23:0000000:302"]
    );
    assert_eq!(record.registration_date, "01.06.2012");
    assert_eq!(record.extract_date, "14.08.2023");

    assert_eq!(
        record.owner,
        "Общая совместная собственность Сидоров Сидор Сидорович, Сидорова Анна Петровна"
    );
    assert_eq!(
        record.owner_details,
        "Общая совместная собственность №47:23:0000000:300-47/012/2016-1 от 03.04.2016"
    );
    assert_eq!(
        record.encumbrances,
        "Аренда ООО \"Агро\" ИНН: 4710000000; Ограничения прав на земельный участок, \
         предусмотренные статьей 56 Земельного кодекса Российской Федерации"
    );
    assert_eq!(
        record.encumbrance_details,
        "Аренда №47:23:0000000:300-47/012/2018-3 от 10.01.2018, срок действия: с 10.01.2018 по 10.01.2067"
    );

    let keys: Vec<&str> = record.geometry.keys().collect();
    assert_eq!(keys, vec!["47:23:0000000:300"]);
    assert_eq!(record.rows()[0].parent_cadastral_number, "-");
}

#[test]
fn test_kvoks_building() {
    let record = read("kvoks_building.xml", &ExtractSettings::new());

    assert_eq!(record.object_kind, ObjectKind::CapitalConstruction);
    assert_eq!(record.cadastral_number, "78:10:0000000:400");
    assert_eq!(record.area, Some(512.3));
    assert_eq!(record.address, "");
    assert_eq!(record.category, "-");
    assert_eq!(record.permitted_use, "-");
    assert_eq!(record.cadastral_cost, Some(9_800_000.0));
    assert_eq!(record.estate_objects, vec!["78:10:0000000:401"]);
    assert_eq!(record.extract_date, "01.02.2022");
    assert_eq!(record.owner, "Собственность Кузнецов Алексей Викторович");
    assert_eq!(
        record.owner_details,
        "Собственность, № 78-78/001-78/001/010/2015-100/1 от 20.10.2015"
    );
    assert_eq!(record.encumbrances, "");
    assert_eq!(record.rows()[0].object_type, "Объект капитального строительства");
    assert!(record.has_geometry());
}

#[test]
fn test_kpoks_flat_admin_fallback() {
    let record = read("kpoks_flat.xml", &ExtractSettings::new());
    assert_eq!(
        record.address,
        "Ленинградская область, Тосненский р-н, г Тосно, Советская ул, д 10, кв 7"
    );
    assert_eq!(record.extract_date, "15.07.2020");
    assert_eq!(record.owner, "");
    assert!(!record.has_geometry());

    let record = read(
        "kpoks_flat.xml",
        &ExtractSettings::new().with_admin_fallback(true),
    );
    assert_eq!(record.owner, "Администрация Тосненского района");
}

#[test]
fn test_batch_over_fixture_directory() {
    let files = xml_files(fixtures().join("extracts")).unwrap();
    assert_eq!(files.len(), 6);

    let report = process_batch(&files, &tables(), &ExtractSettings::new(), None);
    assert_eq!(report.processed(), 5);
    assert_eq!(report.unsupported.len(), 1);
    assert!(report.unsupported[0].ends_with("unknown_schema.xml"));
    assert!(report.failed.is_empty());
    assert_eq!(report.without_geometry.len(), 1);
    assert!(report.without_geometry[0].ends_with("kpoks_flat.xml"));

    let json = to_json_lines(&report.records).unwrap();
    assert_eq!(json.lines().count(), 5);
}

#[test]
fn test_cli_inspect_prints_yaml() {
    Command::cargo_bin("egrn-extractor")
        .unwrap()
        .arg("inspect")
        .arg(extract_path("egrn_land.xml"))
        .arg("--tables")
        .arg(fixtures().join("tables"))
        .assert()
        .success()
        .stdout(predicate::str::starts_with("---\n"))
        .stdout(predicate::str::contains("47:23:0000000:300"));
}

#[test]
fn test_cli_batch_writes_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("records.jsonl");

    Command::cargo_bin("egrn-extractor")
        .unwrap()
        .arg("batch")
        .arg(fixtures().join("extracts"))
        .arg("--tables")
        .arg(fixtures().join("tables"))
        .arg("--format")
        .arg("json")
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stderr(predicate::str::contains("Processed"))
        .stderr(predicate::str::contains("unknown_schema.xml"));

    let content = fs::read_to_string(&output).unwrap();
    assert_eq!(content.lines().count(), 5);
}

#[test]
fn test_cli_rejects_missing_directory() {
    Command::cargo_bin("egrn-extractor")
        .unwrap()
        .arg("batch")
        .arg("/nonexistent/extracts")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a directory"));
}

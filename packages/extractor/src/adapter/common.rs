//! Readers shared by the namespaced adapters (KVZU, KPZU, KVOKS, KPOKS).
//!
//! The four schemas share the address, rights, encumbrance and spatial
//! sub-schemas, so everything below works on plain nodes and is reused by
//! the parcel and the building adapters.

use std::sync::LazyLock;

use roxmltree::Node;

use crate::classification::ClassificationTables;
use crate::config::{JOINT_OWNERSHIP_LABEL, SHARED_OWNERSHIP_LABEL};
use crate::geometry::{Contour, SpatialPoint};
use crate::registry::{create_holder_registry, SubjectRegistry};
use crate::rights::{EncumbranceRecord, Registration, RightKind, RightRecord, Share, Validity};
use crate::text::{non_empty, normalize_date, parse_decimal};
use crate::xml::{
    attribute_at, find_all_by_path, find_by_path, find_child, find_children, get_attribute,
    text_at,
};

/// Holder registry shared by every adapter.
pub static HOLDERS: LazyLock<SubjectRegistry> = LazyLock::new(create_holder_registry);

/// Names of every party below the holder containers.
pub(crate) fn holder_names<'a, 'input: 'a>(
    containers: impl IntoIterator<Item = Node<'a, 'input>>,
) -> Vec<String> {
    containers
        .into_iter()
        .flat_map(|container| HOLDERS.describe_children(container))
        .filter(|subject| subject.is_named())
        .map(|subject| subject.name)
        .collect()
}

/// Beneficiary string: named parties joined with `", "`, `None` if nobody is named.
pub(crate) fn beneficiary<'a, 'input: 'a>(
    containers: impl IntoIterator<Item = Node<'a, 'input>>,
) -> Option<String> {
    non_empty(holder_names(containers).join(", "))
}

/// Right type label; shared and joint ownership use fixed labels.
pub(crate) fn right_label(kind: RightKind, code: &str, tables: &ClassificationTables) -> String {
    match kind {
        RightKind::Shared => SHARED_OWNERSHIP_LABEL.to_string(),
        RightKind::Joint => JOINT_OWNERSHIP_LABEL.to_string(),
        RightKind::Other => tables.right.label(code),
    }
}

/// Compose a readable address from an `Address` element.
///
/// A pre-rendered `Note` wins; a note that is only a comma means "no
/// address". Otherwise the address is built from its structured parts.
pub fn address_text(address: Node<'_, '_>, tables: &ClassificationTables) -> String {
    match text_at(address, "Note") {
        Some(note) if note == "," => String::new(),
        Some(note) => note,
        None => compose_address(address, tables),
    }
}

/// Region → district → urban district → locality → street → levels → apartment.
pub fn compose_address(address: Node<'_, '_>, tables: &ClassificationTables) -> String {
    // (element, attribute rendered first, attribute rendered second)
    const SEGMENTS: [(&str, &str, &str); 8] = [
        ("District", "Name", "Type"),
        ("UrbanDistrict", "Name", "Type"),
        ("Locality", "Type", "Name"),
        ("Street", "Name", "Type"),
        ("Level1", "Type", "Value"),
        ("Level2", "Type", "Value"),
        ("Level3", "Type", "Value"),
        ("Apartment", "Type", "Value"),
    ];

    let mut segments = Vec::new();
    if let Some(region) = text_at(address, "Region") {
        segments.push(tables.region.label(&region));
    }
    for (tag, first, second) in SEGMENTS {
        let Some(element) = find_child(address, tag) else {
            continue;
        };
        let parts: Vec<&str> = [first, second]
            .into_iter()
            .filter_map(|name| get_attribute(element, name))
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect();
        if !parts.is_empty() {
            segments.push(parts.join(" "));
        }
    }

    let composed = segments.join(", ");
    if composed == "," {
        String::new()
    } else {
        composed
    }
}

/// District name of an `Address` element, for the administrative fallback.
pub fn district_name(address: Node<'_, '_>) -> Option<String> {
    attribute_at(address, "District", "Name")
}

/// Rights of the current extract sub-tree (`ExtractObjectRight`).
pub fn current_rights(
    extract_object_right: Node<'_, '_>,
    tables: &ClassificationTables,
) -> Vec<RightRecord> {
    find_all_by_path(extract_object_right, "ExtractObject/ObjectRight/Right")
        .into_iter()
        .filter_map(|right| {
            let registration = find_child(right, "Registration")?;
            let code = text_at(registration, "Type")?;
            let kind = RightKind::from_code(&code);

            let share = text_at(registration, "ShareText")
                .map_or_else(|| fraction_attributes(registration), |text| Share::parse(&text));

            Some(
                RightRecord::new(kind, right_label(kind, &code, tables))
                    .with_share(share)
                    .with_holders(holder_names(find_children(right, "Owner")))
                    .with_registration(Registration {
                        name: text_at(registration, "Name"),
                        ..Registration::default()
                    }),
            )
        })
        .collect()
}

/// Rights of the legacy GKN sub-tree (`Rights/Right` below `container`).
pub fn legacy_rights(container: Node<'_, '_>, tables: &ClassificationTables) -> Vec<RightRecord> {
    find_all_by_path(container, "Rights/Right")
        .into_iter()
        .map(|right| {
            let code = text_at(right, "Type").unwrap_or_default();
            let label = tables.right.label(&code);
            let kind = match RightKind::from_code(&code) {
                RightKind::Other => RightKind::from_label(&label),
                kind => kind,
            };

            RightRecord::new(kind, right_label(kind, &code, tables))
                .with_share(fraction_attributes(right))
                .with_holders(holder_names(find_all_by_path(right, "Owners/Owner")))
                .with_registration(Registration {
                    name: text_at(right, "Name"),
                    number: text_at(right, "Registration/RegNumber"),
                    date: text_at(right, "Registration/RegDate").map(|d| normalize_date(&d)),
                })
        })
        .collect()
}

/// Encumbrances of the current extract sub-tree.
pub fn current_encumbrances(
    extract_object_right: Node<'_, '_>,
    tables: &ClassificationTables,
) -> Vec<EncumbranceRecord> {
    find_all_by_path(extract_object_right, "ExtractObject/ObjectRight/Right/Encumbrance")
        .into_iter()
        .map(|encumbrance| {
            let label = text_at(encumbrance, "Name")
                .or_else(|| text_at(encumbrance, "Type").map(|code| tables.encumbrance.label(&code)))
                .unwrap_or_default();

            let mut documents: Vec<String> = Vec::new();
            for content in find_all_by_path(encumbrance, "DocFound/Content") {
                if let Some(text) = text_at(content, "") {
                    if !documents.contains(&text) {
                        documents.push(text);
                    }
                }
            }

            EncumbranceRecord::new(label)
                .with_beneficiary(beneficiary(find_children(encumbrance, "Owner")))
                .with_share_note(text_at(encumbrance, "ShareText"))
                .with_validity(find_child(encumbrance, "Duration").and_then(duration))
                .with_documents(documents)
                .with_registration(Registration {
                    number: text_at(encumbrance, "RegNumber"),
                    date: text_at(encumbrance, "RegDate").map(|d| normalize_date(&d)),
                    ..Registration::default()
                })
        })
        .collect()
}

/// Encumbrances of the legacy GKN sub-tree (`Encumbrances/Encumbrance`).
pub fn legacy_encumbrances(
    container: Node<'_, '_>,
    tables: &ClassificationTables,
) -> Vec<EncumbranceRecord> {
    find_all_by_path(container, "Encumbrances/Encumbrance")
        .into_iter()
        .filter_map(|encumbrance| {
            let code = text_at(encumbrance, "Type")?;
            let number = text_at(encumbrance, "Registration/RegNumber")
                .or_else(|| text_at(encumbrance, "CadastralNumberRestriction"));

            Some(
                EncumbranceRecord::new(tables.encumbrance.label(&code))
                    .with_beneficiary(beneficiary(find_all_by_path(
                        encumbrance,
                        "OwnersRestrictionInFavorem/OwnerRestrictionInFavorem",
                    )))
                    .with_registration(Registration {
                        number,
                        date: text_at(encumbrance, "Registration/RegDate")
                            .map(|d| normalize_date(&d)),
                        ..Registration::default()
                    }),
            )
        })
        .collect()
}

/// Free-text claim note of the current extract.
pub fn claim_note(extract_object_right: Node<'_, '_>) -> Option<String> {
    text_at(extract_object_right, "ExtractObject/RightClaim")
}

/// Boundary points of every `EntitySpatial` directly below `node`.
pub fn spatial_points(node: Node<'_, '_>) -> Vec<SpatialPoint> {
    find_all_by_path(node, "EntitySpatial/SpatialElement/SpelementUnit")
        .into_iter()
        .filter_map(|unit| {
            let ordinate = find_child(unit, "Ordinate")?;
            let x = get_attribute(ordinate, "X").and_then(parse_decimal);
            let y = get_attribute(ordinate, "Y").and_then(parse_decimal);
            match (x, y) {
                (Some(x), Some(y)) => Some(SpatialPoint::new(
                    x,
                    y,
                    get_attribute(unit, "SuNmb").unwrap_or_default(),
                )),
                _ => {
                    tracing::debug!("skipping ordinate without numeric coordinates");
                    None
                }
            }
        })
        .collect()
}

/// Numbered contours below `container` (`Contours/Contour`), keyed
/// `"<parent>(<NumberRecord>)"`.
pub fn numbered_contours(container: Node<'_, '_>, parent: &str) -> Vec<Contour> {
    find_all_by_path(container, "Contours/Contour")
        .into_iter()
        .map(|contour| {
            let key = match get_attribute(contour, "NumberRecord") {
                Some(number) => format!("{parent}({})", number.trim()),
                None => parent.to_string(),
            };
            Contour::new(key, spatial_points(contour))
        })
        .collect()
}

/// Whether `node` carries its own boundary.
pub fn has_entity_spatial(node: Node<'_, '_>) -> bool {
    find_by_path(node, "EntitySpatial").is_some()
}

fn fraction_attributes(node: Node<'_, '_>) -> Option<Share> {
    let share = find_child(node, "Share")?;
    Share::from_parts(
        get_attribute(share, "Numerator")?,
        get_attribute(share, "Denominator")?,
    )
}

fn duration(duration: Node<'_, '_>) -> Option<Validity> {
    if let Some(term) = text_at(duration, "Term") {
        return Some(Validity::Term(term));
    }
    let start = text_at(duration, "Started")?;
    let end = text_at(duration, "Stopped")?;
    Some(Validity::Between {
        start: normalize_date(&start),
        end: normalize_date(&end),
    })
}

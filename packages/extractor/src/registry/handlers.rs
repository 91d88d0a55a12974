//! Holder handlers for every party kind found in registry extracts.
//!
//! Namespaced extracts (`Person`, `Organization`, `Governance`) put the
//! ready-made display string in `Content` for current rights and split it
//! into parts for legacy rights. EGRN extracts (`individual`,
//! `legal_entity`, `public_formation`, `another`, ...) always split it.

use roxmltree::Node;

use super::handler::SubjectHandler;
use super::types::SubjectKind;
use crate::text::non_empty;
use crate::xml::{element_children, find_all_by_path, find_child, get_tag_name, joined_child_texts, text_at};

/// Join the non-empty texts of `tags` below `node` with spaces.
fn name_parts(node: Node<'_, '_>, tags: &[&str]) -> Option<String> {
    non_empty(
        tags.iter()
            .filter_map(|tag| text_at(node, tag))
            .collect::<Vec<_>>()
            .join(" "),
    )
}

fn join_names(names: Vec<String>) -> Option<String> {
    non_empty(names.join(", "))
}

/// Natural person in a namespaced extract.
pub struct PersonHandler;

impl SubjectHandler for PersonHandler {
    fn subject_kind(&self) -> SubjectKind {
        SubjectKind::Person
    }

    fn describe(&self, node: Node<'_, '_>) -> Option<String> {
        text_at(node, "Content")
            .or_else(|| find_child(node, "FIO").and_then(|fio| non_empty(joined_child_texts(fio))))
            .or_else(|| name_parts(node, &["FamilyName", "FirstName", "Patronymic"]))
    }
}

/// Legal entity in a namespaced extract.
pub struct OrganizationHandler;

impl SubjectHandler for OrganizationHandler {
    fn subject_kind(&self) -> SubjectKind {
        SubjectKind::Organization
    }

    fn describe(&self, node: Node<'_, '_>) -> Option<String> {
        text_at(node, "Content")
            .map(|content| content.replace(", ИНН", " ИНН"))
            .or_else(|| text_at(node, "Name"))
    }
}

/// Public authority in a namespaced extract.
pub struct GovernanceHandler;

impl SubjectHandler for GovernanceHandler {
    fn subject_kind(&self) -> SubjectKind {
        SubjectKind::PublicBody
    }

    fn describe(&self, node: Node<'_, '_>) -> Option<String> {
        text_at(node, "Name").or_else(|| text_at(node, "Content"))
    }
}

/// Natural person in an EGRN extract.
pub struct IndividualHandler;

impl SubjectHandler for IndividualHandler {
    fn subject_kind(&self) -> SubjectKind {
        SubjectKind::Person
    }

    fn describe(&self, node: Node<'_, '_>) -> Option<String> {
        name_parts(node, &["surname", "name", "patronymic"])
    }
}

/// Legal entity or public authority body in an EGRN extract.
pub struct LegalEntityHandler;

impl LegalEntityHandler {
    fn describe_entity(entity: Node<'_, '_>) -> Vec<String> {
        element_children(entity)
            .filter_map(|kind| match get_tag_name(kind) {
                "resident" | "not_resident" => {
                    let name = text_at(kind, "name")?;
                    Some(match text_at(kind, "inn") {
                        Some(inn) => format!("{name} ИНН: {inn}"),
                        None => name,
                    })
                }
                "govement_entity" => text_at(kind, "full_name").or_else(|| text_at(kind, "name")),
                other => {
                    tracing::debug!(tag = other, "unsupported legal entity kind");
                    None
                }
            })
            .collect()
    }
}

impl SubjectHandler for LegalEntityHandler {
    fn subject_kind(&self) -> SubjectKind {
        SubjectKind::Organization
    }

    fn can_handle(&self, node: Node<'_, '_>) -> bool {
        find_child(node, "entity").is_some()
    }

    fn describe(&self, node: Node<'_, '_>) -> Option<String> {
        let entity = find_child(node, "entity")?;
        join_names(Self::describe_entity(entity))
    }
}

/// State, constituent entity, municipality or union state in an EGRN extract.
pub struct PublicFormationHandler;

impl SubjectHandler for PublicFormationHandler {
    fn subject_kind(&self) -> SubjectKind {
        SubjectKind::PublicBody
    }

    fn describe(&self, node: Node<'_, '_>) -> Option<String> {
        let formation_type = find_child(node, "public_formation_type")?;
        let names = element_children(formation_type)
            .filter_map(|formation| {
                let name = text_at(formation, "name/value").or_else(|| text_at(formation, "name"));
                match get_tag_name(formation) {
                    "russia" => Some(name.unwrap_or_else(|| "РФ".to_string())),
                    "subject_of_rf" | "foreign_public" | "union_state" | "municipality" => name,
                    other => {
                        tracing::debug!(tag = other, "unsupported public formation kind");
                        None
                    }
                }
            })
            .collect();
        join_names(names)
    }
}

/// Collective holders in an EGRN extract (unit, certificate and bond holders,
/// partnerships, apartment owners, shared-construction participants).
pub struct AnotherHandler;

impl SubjectHandler for AnotherHandler {
    fn subject_kind(&self) -> SubjectKind {
        SubjectKind::Collective
    }

    fn describe(&self, node: Node<'_, '_>) -> Option<String> {
        let another_type = find_child(node, "another_type")?;
        let mut names = Vec::new();

        for kind in element_children(another_type) {
            let name = match get_tag_name(kind) {
                "investment_unit_owner" => text_at(kind, "investment_unit_name"),
                "certificates_holders" => text_at(kind, "certificate_name"),
                "bonds_holders" => text_at(kind, "bonds_number"),
                "aparthouse_owners" => text_at(kind, "aparthouse_owners_name"),
                "equity_participants_info" => text_at(kind, "equity_participants"),
                "not_equity_participants_info" => text_at(kind, "not_equity_participants"),
                "other" => text_at(kind, "name"),
                "partnership" => join_names(
                    find_all_by_path(
                        kind,
                        "partnership_participants/partnership_participant/legal_entity/entity",
                    )
                    .into_iter()
                    .flat_map(LegalEntityHandler::describe_entity)
                    .collect(),
                ),
                other => {
                    tracing::debug!(tag = other, "unsupported collective holder kind");
                    None
                }
            };
            names.extend(name);
        }

        join_names(names)
    }
}

/// Public servitude: the restriction text names no beneficiary.
pub struct PublicServitudeHandler;

impl SubjectHandler for PublicServitudeHandler {
    fn subject_kind(&self) -> SubjectKind {
        SubjectKind::Unnamed
    }

    fn describe(&self, node: Node<'_, '_>) -> Option<String> {
        text_at(node, "public")
    }
}

/// Restriction in favour of an undefined circle of persons.
pub struct UndefinedHandler;

impl SubjectHandler for UndefinedHandler {
    fn subject_kind(&self) -> SubjectKind {
        SubjectKind::Unnamed
    }

    fn describe(&self, node: Node<'_, '_>) -> Option<String> {
        text_at(node, "undefined")
    }
}

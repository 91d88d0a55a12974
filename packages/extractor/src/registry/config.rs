//! Registry configuration for registry extract holders.

use super::core::SubjectRegistry;
use super::handlers::{
    AnotherHandler, GovernanceHandler, IndividualHandler, LegalEntityHandler,
    OrganizationHandler, PersonHandler, PublicFormationHandler, PublicServitudeHandler,
    UndefinedHandler,
};

/// Create a holder registry configured for every supported schema.
///
/// This registry includes handlers for the party kinds of both the
/// namespaced extracts and the modern EGRN extracts.
#[must_use]
pub fn create_holder_registry() -> SubjectRegistry {
    let mut registry = SubjectRegistry::new();

    // Namespaced extracts (KVZU, KPZU, KVOKS, KPOKS)
    registry.register("Person", PersonHandler);
    registry.register("Organization", OrganizationHandler);
    registry.register("Governance", GovernanceHandler);

    // Modern EGRN extracts
    registry.register("individual", IndividualHandler);
    registry.register("legal_entity", LegalEntityHandler);
    registry.register("public_formation", PublicFormationHandler);
    registry.register("another", AnotherHandler);
    registry.register("public_servitude", PublicServitudeHandler);
    registry.register("undefined", UndefinedHandler);

    // Skip tags - siblings of the party element that name nobody
    //   - ContactOwner: postal and e-mail contacts of a legacy owner
    //   - Registration/Encumbrance/ShareText: right data next to the owner
    registry.skip(["ContactOwner", "Registration", "Encumbrance", "ShareText"]);

    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::SubjectKind;
    use roxmltree::Document;

    #[test]
    fn test_registry_has_all_party_kinds() {
        let registry = create_holder_registry();
        for tag in [
            "Person",
            "Organization",
            "Governance",
            "individual",
            "legal_entity",
            "public_formation",
            "another",
            "public_servitude",
            "undefined",
        ] {
            let xml = format!("<{tag}><entity/></{tag}>");
            let doc = Document::parse(&xml).unwrap();
            assert!(
                registry.get_handler(doc.root_element()).is_some(),
                "missing handler for {tag}"
            );
        }
        assert!(registry.should_skip("ContactOwner"));
    }

    #[test]
    fn test_describe_namespaced_owner() {
        let doc = Document::parse(
            "<Owner><Person><Content>Иванов Иван Иванович</Content></Person><ContactOwner><Email>a@b.ru</Email></ContactOwner></Owner>",
        )
        .unwrap();

        let subjects = create_holder_registry().describe_children(doc.root_element());
        assert_eq!(subjects.len(), 1);
        assert_eq!(subjects[0].kind, SubjectKind::Person);
        assert_eq!(subjects[0].name, "Иванов Иван Иванович");
    }

    #[test]
    fn test_describe_egrn_holders() {
        let doc = Document::parse(
            r#"<right_holders>
                <right_holder><individual><surname>Петров</surname><name>Петр</name><patronymic>Петрович</patronymic></individual></right_holder>
                <right_holder><public_formation><public_formation_type><russia/></public_formation_type></public_formation></right_holder>
            </right_holders>"#,
        )
        .unwrap();

        let registry = create_holder_registry();
        let names: Vec<String> = doc
            .root_element()
            .children()
            .filter(|n| n.is_element())
            .flat_map(|holder| registry.describe_children(holder))
            .map(|subject| subject.name)
            .collect();
        assert_eq!(names, vec!["Петров Петр Петрович", "РФ"]);
    }
}

//! Holder registry mapping party tag names to handlers.

use std::collections::{HashMap, HashSet};

use roxmltree::Node;

use super::handler::SubjectHandler;
use super::types::Subject;
use crate::error::{ExtractError, Result};
use crate::xml::{element_children, get_tag_name};

/// Registry mapping party element names to handlers.
///
/// The registry allows registering handlers for specific tag names, as well
/// as marking tags (identity documents, contacts, ...) to be skipped.
pub struct SubjectRegistry {
    handlers: HashMap<String, Box<dyn SubjectHandler>>,
    skip_tags: HashSet<String>,
}

impl SubjectRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            skip_tags: HashSet::new(),
        }
    }

    /// Register a handler for a specific tag name.
    pub fn register(
        &mut self,
        tag_name: impl Into<String>,
        handler: impl SubjectHandler + 'static,
    ) {
        self.handlers.insert(tag_name.into(), Box::new(handler));
    }

    /// Mark tags as skip (never describe, never report).
    pub fn skip(&mut self, tag_names: impl IntoIterator<Item = impl Into<String>>) {
        for tag in tag_names {
            self.skip_tags.insert(tag.into());
        }
    }

    /// Get the handler for a party element.
    ///
    /// Returns `None` if the element should be skipped or has no handler.
    pub fn get_handler(&self, node: Node<'_, '_>) -> Option<&dyn SubjectHandler> {
        let tag_name = get_tag_name(node);

        if self.skip_tags.contains(tag_name) {
            return None;
        }

        self.handlers
            .get(tag_name)
            .filter(|h| h.can_handle(node))
            .map(|h| h.as_ref())
    }

    /// Describe one party element.
    ///
    /// # Returns
    /// `Ok(None)` for skipped elements and for parties without a usable name.
    ///
    /// # Errors
    /// Returns `UnknownElement` if the element has no handler and is not skipped.
    pub fn describe(&self, node: Node<'_, '_>) -> Result<Option<Subject>> {
        let tag_name = get_tag_name(node);

        if self.should_skip(tag_name) {
            return Ok(None);
        }

        if let Some(handler) = self.get_handler(node) {
            return Ok(handler
                .describe(node)
                .map(|name| Subject::new(handler.subject_kind(), name)));
        }

        let parent_context = node
            .parent_element()
            .map(|p| format!("<{}>", get_tag_name(p)));
        Err(ExtractError::UnknownElement {
            tag_name: tag_name.to_string(),
            context: parent_context,
        })
    }

    /// Describe every party below a holder container.
    ///
    /// Unknown party kinds are logged and skipped so one odd holder never
    /// hides the others.
    pub fn describe_children(&self, container: Node<'_, '_>) -> Vec<Subject> {
        element_children(container)
            .filter_map(|child| {
                self.describe(child).unwrap_or_else(|err| {
                    tracing::warn!(
                        error = %err,
                        tag = %get_tag_name(child),
                        "Error describing holder, skipping"
                    );
                    None
                })
            })
            .collect()
    }

    /// Check if a tag should be skipped.
    #[must_use]
    pub fn should_skip(&self, tag_name: &str) -> bool {
        self.skip_tags.contains(tag_name)
    }
}

impl Default for SubjectRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::SubjectKind;
    use roxmltree::Document;

    struct TextHandler;

    impl SubjectHandler for TextHandler {
        fn subject_kind(&self) -> SubjectKind {
            SubjectKind::Organization
        }

        fn describe(&self, node: Node<'_, '_>) -> Option<String> {
            node.text().map(str::to_string)
        }
    }

    fn registry() -> SubjectRegistry {
        let mut registry = SubjectRegistry::new();
        registry.register("org", TextHandler);
        registry.skip(["contacts"]);
        registry
    }

    #[test]
    fn test_registry_register_and_describe() {
        let doc = Document::parse("<org>ООО Лес</org>").unwrap();
        let subject = registry().describe(doc.root_element()).unwrap();

        assert_eq!(
            subject,
            Some(Subject::new(SubjectKind::Organization, "ООО Лес"))
        );
    }

    #[test]
    fn test_registry_skip() {
        let registry = registry();
        assert!(registry.should_skip("contacts"));
        assert!(!registry.should_skip("org"));

        let doc = Document::parse("<holder><org/><contacts/></holder>").unwrap();
        let children: Vec<_> = element_children(doc.root_element()).collect();
        assert!(registry.get_handler(children[0]).is_some());
        assert!(registry.get_handler(children[1]).is_none());
    }

    #[test]
    fn test_registry_unknown_element_reports_parent() {
        let doc = Document::parse("<right_holder><trust/></right_holder>").unwrap();
        let trust = doc.root_element().first_element_child().unwrap();

        let err = registry().describe(trust).unwrap_err();
        assert_eq!(
            err.to_string(),
            "No handler for element <trust> in <right_holder>"
        );
    }

    #[test]
    fn test_describe_children_skips_unknown_and_skipped() {
        let doc = Document::parse(
            "<holder><contacts/><org>А</org><trust/><org>Б</org></holder>",
        )
        .unwrap();

        let names: Vec<String> = registry()
            .describe_children(doc.root_element())
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["А", "Б"]);
    }
}

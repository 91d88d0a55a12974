//! Holder handler trait definition.

use roxmltree::Node;

use super::types::SubjectKind;

/// Trait for holder handlers.
///
/// A handler receives the element naming the party kind (for example
/// `<individual>`) and returns the display name of the party, or `None` when
/// the element carries no usable name.
pub trait SubjectHandler: Send + Sync {
    /// Return the kind of party this handler describes.
    fn subject_kind(&self) -> SubjectKind;

    /// Check if this handler can process the given element.
    ///
    /// Default implementation always returns true.
    fn can_handle(&self, _node: Node<'_, '_>) -> bool {
        true
    }

    /// Describe the party; multiple names are joined with `", "`.
    fn describe(&self, node: Node<'_, '_>) -> Option<String>;
}

//! XML utility functions for navigating and extracting data from DOM trees.
//!
//! Registry extracts mix several namespaces inside one document (outgoing
//! schema, address types, spatial types, legacy GKN types). Navigation below
//! matches local names only; schema fingerprint matching is the one place
//! that also checks namespaces, via [`find_by_qualified_path`].

use roxmltree::Node;

/// Get the tag name without namespace prefix.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use egrn_extractor::xml::get_tag_name;
///
/// let xml = r#"<adrs:Region xmlns:adrs="urn:example">78</adrs:Region>"#;
/// let doc = Document::parse(xml).unwrap();
/// assert_eq!(get_tag_name(doc.root_element()), "Region");
/// ```
pub fn get_tag_name<'a>(node: Node<'a, '_>) -> &'a str {
    node.tag_name().name()
}

/// Find the first child element with the given tag name.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use egrn_extractor::xml::find_child;
///
/// let xml = r#"<Parcel><Area/><Location/></Parcel>"#;
/// let doc = Document::parse(xml).unwrap();
/// let root = doc.root_element();
///
/// assert!(find_child(root, "Area").is_some());
/// assert!(find_child(root, "Category").is_none());
/// ```
pub fn find_child<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|child| child.is_element() && get_tag_name(*child) == tag)
}

/// Find all child elements with the given tag name.
pub fn find_children<'a, 'input>(
    node: Node<'a, 'input>,
    tag: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children()
        .filter(move |child| child.is_element() && get_tag_name(*child) == tag)
}

/// Find a descendant element matching a path of tag names.
///
/// Each step takes the first matching child.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use egrn_extractor::xml::find_by_path;
///
/// let xml = r#"<land_record><params><area><value>1500</value></area></params></land_record>"#;
/// let doc = Document::parse(xml).unwrap();
///
/// let value = find_by_path(doc.root_element(), "params/area/value");
/// assert_eq!(value.and_then(|n| n.text()), Some("1500"));
/// ```
pub fn find_by_path<'a, 'input>(node: Node<'a, 'input>, path: &str) -> Option<Node<'a, 'input>> {
    let mut current = node;

    for part in path.split('/') {
        current = find_child(current, part)?;
    }

    Some(current)
}

/// Find every descendant element matching a path of tag names.
///
/// Unlike [`find_by_path`] every matching child is followed at every step,
/// so `Rights/Right` returns all rights of all `Rights` containers in
/// document order.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use egrn_extractor::xml::find_all_by_path;
///
/// let xml = r#"<r><Rights><Right/><Right/></Rights><Rights><Right/></Rights></r>"#;
/// let doc = Document::parse(xml).unwrap();
/// assert_eq!(find_all_by_path(doc.root_element(), "Rights/Right").len(), 3);
/// ```
pub fn find_all_by_path<'a, 'input>(node: Node<'a, 'input>, path: &str) -> Vec<Node<'a, 'input>> {
    let mut current = vec![node];

    for part in path.split('/') {
        current = current
            .into_iter()
            .flat_map(|parent| {
                parent
                    .children()
                    .filter(move |child| child.is_element() && get_tag_name(*child) == part)
            })
            .collect();
    }

    current
}

/// Find a descendant element whose every path step matches both the local
/// name and the namespace URI (`None` means "no namespace").
pub fn find_by_qualified_path<'a, 'input>(
    node: Node<'a, 'input>,
    namespace: Option<&str>,
    path: &str,
) -> Option<Node<'a, 'input>> {
    let mut current = node;

    for part in path.split('/') {
        current = current.children().find(|child| {
            child.is_element()
                && get_tag_name(*child) == part
                && child.tag_name().namespace() == namespace
        })?;
    }

    Some(current)
}

/// Get the text content of a node, trimmed.
///
/// # Returns
/// Trimmed text content, or empty string if no text
pub fn get_text(node: Node<'_, '_>) -> String {
    node.text()
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

/// Get an attribute value from a node.
pub fn get_attribute<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
    node.attribute(name)
}

/// Trimmed, non-empty text of the element at `path` below `node`.
///
/// An empty `path` reads the node itself.
pub fn text_at(node: Node<'_, '_>, path: &str) -> Option<String> {
    let target = if path.is_empty() {
        node
    } else {
        find_by_path(node, path)?
    };
    Some(get_text(target)).filter(|text| !text.is_empty())
}

/// Trimmed, non-empty attribute of the element at `path` below `node`.
///
/// An empty `path` reads the attribute of the node itself.
pub fn attribute_at(node: Node<'_, '_>, path: &str, name: &str) -> Option<String> {
    let target = if path.is_empty() {
        node
    } else {
        find_by_path(node, path)?
    };
    get_attribute(target, name)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(String::from)
}

/// Get all element children of a node.
///
/// # Returns
/// Iterator over element children (excludes text nodes, comments, etc.)
pub fn element_children<'a, 'input>(
    node: Node<'a, 'input>,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(|child| child.is_element())
}

/// Texts of all element children joined with a single space.
///
/// Used for name parts split across sibling elements
/// (`<FIO><Surname/><First/><Patronymic/></FIO>`).
pub fn joined_child_texts(node: Node<'_, '_>) -> String {
    element_children(node)
        .map(get_text)
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

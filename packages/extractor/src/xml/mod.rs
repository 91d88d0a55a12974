//! XML navigation helpers shared by schema detection and the adapters.

mod utils;

pub use utils::{
    attribute_at, element_children, find_all_by_path, find_by_path, find_by_qualified_path,
    find_child, find_children, get_attribute, get_tag_name, get_text,
    joined_child_texts, text_at,
};

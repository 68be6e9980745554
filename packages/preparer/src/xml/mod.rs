//! XML navigation helpers.

mod utils;

pub use utils::{
    find_children, find_descendants, get_tag_name, has_tag, segments, variant_lang, variants,
    XML_NAMESPACE,
};

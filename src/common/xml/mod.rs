mod escape;
mod names;

pub use escape::{escape_xml, resolve_entity, unescape_xml};
pub use names::{is_xml_char, is_xml_name};

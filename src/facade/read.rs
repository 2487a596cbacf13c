//! Read accessors of [`XmlHandle`].
//!
//! Every accessor reloads the source file first when auto-load is on.

use super::XmlHandle;
use crate::common::{Error, Result};
use std::collections::HashMap;

impl XmlHandle {
    /// Text content of the first element named `tag`.
    ///
    /// A missing tag is `Ok(None)`, not an error.
    pub fn value(&mut self, tag: &str) -> Result<Option<String>> {
        self.auto_reload()?;
        Ok(self
            .document
            .element_by_tag_name(tag, 0)
            .map(|id| self.document.text_content(id)))
    }

    /// Text content of every element named `tag`, in document order.
    pub fn values(&mut self, tag: &str) -> Result<Vec<String>> {
        self.auto_reload()?;
        let doc = &self.document;
        Ok(doc
            .elements_by_tag_name(tag)
            .map(|id| doc.text_content(id))
            .collect())
    }

    pub fn attribute_names(&mut self, tag: &str) -> Result<Vec<String>> {
        self.attribute_names_at(tag, 0)
    }

    /// Attribute names of the `index`-th `tag`, in stored order.
    pub fn attribute_names_at(&mut self, tag: &str, index: usize) -> Result<Vec<String>> {
        self.auto_reload()?;
        let id = self.find(tag, index)?;
        Ok(self
            .document
            .attributes(id)
            .iter()
            .map(|attr| attr.name.clone())
            .collect())
    }

    pub fn attribute_values(&mut self, tag: &str) -> Result<Vec<String>> {
        self.attribute_values_at(tag, 0)
    }

    /// Attribute values of the `index`-th `tag`, aligned with
    /// [`attribute_names_at`](XmlHandle::attribute_names_at).
    pub fn attribute_values_at(&mut self, tag: &str, index: usize) -> Result<Vec<String>> {
        self.auto_reload()?;
        let id = self.find(tag, index)?;
        Ok(self
            .document
            .attributes(id)
            .iter()
            .map(|attr| attr.value.clone())
            .collect())
    }

    /// Maps each child element of the first `tag` to its text content.
    ///
    /// Only element children are listed. When two children share a name the
    /// later one wins.
    pub fn child_map(&mut self, tag: &str) -> Result<HashMap<String, String>> {
        self.auto_reload()?;
        let id = self.find(tag, 0)?;
        let doc = &self.document;
        Ok(doc
            .child_elements(id)
            .filter_map(|child| {
                doc.name(child)
                    .map(|name| (name.to_string(), doc.text_content(child)))
            })
            .collect())
    }

    pub fn attribute_map(&mut self, tag: &str) -> Result<HashMap<String, String>> {
        self.attribute_map_at(tag, 0)
    }

    /// Attribute names of the `index`-th `tag` zipped with their values.
    pub fn attribute_map_at(&mut self, tag: &str, index: usize) -> Result<HashMap<String, String>> {
        let names = self.attribute_names_at(tag, index)?;
        // no second reload, both lists must come from the same tree
        let id = self.find(tag, index)?;
        let values: Vec<&str> = self
            .document
            .attributes(id)
            .iter()
            .map(|attr| attr.value.as_str())
            .collect();

        if names.len() != values.len() {
            return Err(Error::AttributeMismatch {
                tag: tag.to_string(),
                names: names.len(),
                values: values.len(),
            });
        }
        Ok(names
            .into_iter()
            .zip(values.into_iter().map(str::to_string))
            .collect())
    }

    /// Number of elements named `tag`.
    ///
    /// A failed auto-reload is logged and the in-memory tree is counted.
    pub fn count_occurrences(&mut self, tag: &str) -> usize {
        if let Err(err) = self.auto_reload() {
            log::warn!("counting [{}] on the in-memory tree: {}", tag, err);
        }
        self.document.count_elements(tag)
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::SAMPLE;
    use super::super::HandleOptions;
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_values_in_document_order() {
        let mut xml = XmlHandle::parse(SAMPLE).unwrap();
        assert_eq!(xml.values("cod").unwrap(), ["001", "002", "003"]);
        assert_eq!(xml.value("cod").unwrap().as_deref(), Some("001"));
        assert_eq!(xml.count_occurrences("cod"), 3);
        assert_eq!(xml.count_occurrences("msg"), 3);
    }

    #[test]
    fn test_two_codes() {
        let mut xml = XmlHandle::parse(
            "<teste><cod>001</cod><msg>Hello world 1</msg><cod>002</cod><msg>Hello world 2</msg></teste>",
        )
        .unwrap();
        assert_eq!(xml.values("cod").unwrap(), ["001", "002"]);
        assert_eq!(xml.value("cod").unwrap().as_deref(), Some("001"));
    }

    #[test]
    fn test_missing_tag_is_empty_for_values() {
        let mut xml = XmlHandle::parse(SAMPLE).unwrap();
        assert_eq!(xml.value("missing").unwrap(), None);
        assert!(xml.values("missing").unwrap().is_empty());
        assert_eq!(xml.count_occurrences("missing"), 0);
    }

    #[test]
    fn test_root_is_searched() {
        let mut xml = XmlHandle::parse("<teste><cod>1</cod></teste>").unwrap();
        assert_eq!(xml.count_occurrences("teste"), 1);
        assert_eq!(xml.value("teste").unwrap().as_deref(), Some("1"));
    }

    #[test]
    fn test_text_content_spans_descendants() {
        let mut xml = XmlHandle::parse("<a><b>x<c>y</c><![CDATA[<z>]]></b></a>").unwrap();
        assert_eq!(xml.value("b").unwrap().as_deref(), Some("xy<z>"));
    }

    #[test]
    fn test_attributes_by_occurrence() {
        let mut xml = XmlHandle::parse(SAMPLE).unwrap();
        assert_eq!(xml.attribute_names("str").unwrap(), ["charset"]);
        assert_eq!(xml.attribute_values("str").unwrap(), ["utf-8"]);
        assert_eq!(xml.attribute_names_at("str", 1).unwrap(), ["charset"]);
        assert_eq!(xml.attribute_values_at("str", 1).unwrap(), ["iso"]);
        assert!(xml.attribute_names("cod").unwrap().is_empty());
    }

    #[test]
    fn test_attribute_order_is_kept() {
        let mut xml = XmlHandle::parse("<a><b z=\"1\" a=\"2\" m=\"3\"/></a>").unwrap();
        assert_eq!(xml.attribute_names("b").unwrap(), ["z", "a", "m"]);
        assert_eq!(xml.attribute_values("b").unwrap(), ["1", "2", "3"]);
    }

    #[test]
    fn test_attributes_of_missing_tag() {
        let mut xml = XmlHandle::parse(SAMPLE).unwrap();
        assert!(matches!(
            xml.attribute_names("missing"),
            Err(Error::TagNotFound { ref tag, index: 0 }) if tag == "missing"
        ));
        assert!(matches!(
            xml.attribute_values_at("str", 2),
            Err(Error::TagNotFound { index: 2, .. })
        ));
        assert!(matches!(
            xml.attribute_map("missing"),
            Err(Error::TagNotFound { .. })
        ));
    }

    #[test]
    fn test_child_map() {
        let mut xml =
            XmlHandle::parse("<teste><cod>001</cod><msg>Hello world 1</msg></teste>").unwrap();
        let map = xml.child_map("teste").unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map["cod"], "001");
        assert_eq!(map["msg"], "Hello world 1");
    }

    #[test]
    fn test_child_map_skips_character_data_and_last_wins() {
        let mut xml =
            XmlHandle::parse("<a>text<!-- note --><b>1</b><![CDATA[raw]]><b>2</b><c/></a>").unwrap();
        let map = xml.child_map("a").unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map["b"], "2");
        assert_eq!(map["c"], "");
        assert!(matches!(xml.child_map("zzz"), Err(Error::TagNotFound { .. })));
    }

    #[test]
    fn test_attribute_map() {
        let mut xml = XmlHandle::parse("<a><s x=\"str1\" y=\"str2\"/><s x=\"other\"/></a>").unwrap();
        let map = xml.attribute_map("s").unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map["x"], "str1");
        assert_eq!(map["y"], "str2");

        let second = xml.attribute_map_at("s", 1).unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(second["x"], "other");
    }

    #[test]
    fn test_escaped_attribute_values_are_resolved() {
        let mut xml = XmlHandle::parse("<a k=\"1 &lt; 2 &amp;&#65;\"/>").unwrap();
        assert_eq!(xml.attribute_values("a").unwrap(), ["1 < 2 &A"]);
    }

    #[test]
    fn test_count_ignores_failed_reload() {
        let dir = tempdir().expect("create temp dir");
        let path = dir.path().join("doc.xml");
        fs::write(&path, "<a><b/><b/></a>").unwrap();

        let mut xml = XmlHandle::open_with(&path, HandleOptions::default().auto_load(true)).unwrap();
        fs::write(&path, "<a><b/>").unwrap();
        assert_eq!(xml.count_occurrences("b"), 2);

        fs::write(&path, "<a><b/><b/><b/></a>").unwrap();
        assert_eq!(xml.count_occurrences("b"), 3);
    }
}

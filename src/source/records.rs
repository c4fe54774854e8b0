use crate::incident::field_spec::{RecordSchema, Selector};

use super::xml_tree::XmlElement;

/// A raw incident record that can be queried with selectors.
///
/// A lookup that does not resolve returns `None`; it is never an error.
pub trait IncidentRecord {
    fn select(&self, selector: &Selector) -> Option<&str>;
}

impl IncidentRecord for XmlElement {
    fn select(&self, selector: &Selector) -> Option<&str> {
        let namespace = selector.namespace.as_deref();
        let mut current = self;
        for step in &selector.steps {
            // A "." step refers to the current element, as in ".//name".
            if step == "." {
                continue;
            }
            current = current.find_descendant(namespace, step)?;
        }
        if std::ptr::eq(current, self) {
            return None;
        }
        Some(current.text.as_str())
    }
}

/// The records of a parsed document, in document order.
pub fn select_records<'a>(root: &'a XmlElement, schema: &RecordSchema) -> Vec<&'a XmlElement> {
    let namespace = schema.namespace.as_deref();
    let mut records = Vec::new();
    if root.matches(namespace, &schema.record_element) {
        records.push(root);
    }
    records.extend(root.descendants(namespace, &schema.record_element));
    records
}

use anyhow::{anyhow, Context};
use quick_xml::events::Event;
use quick_xml::name::ResolveResult;
use quick_xml::reader::NsReader;

/// Owned, namespace-aware XML element. Only the parts needed for incident lookups are kept:
/// the resolved namespace URI, the local name, the concatenated text content and the child elements.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct XmlElement {
    pub namespace: Option<String>,
    pub name: String,
    pub text: String,
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    pub fn new(namespace: Option<String>, name: String) -> Self {
        Self {
            namespace,
            name,
            text: String::new(),
            children: Vec::new(),
        }
    }

    /// Whether the element has the given local name. A `namespace` of `None` matches any namespace.
    pub fn matches(&self, namespace: Option<&str>, name: &str) -> bool {
        if self.name != name {
            return false;
        }
        match namespace {
            Some(namespace) => self.namespace.as_deref() == Some(namespace),
            None => true,
        }
    }

    /// First descendant (excluding self) with the given name, in document order.
    pub fn find_descendant(&self, namespace: Option<&str>, name: &str) -> Option<&XmlElement> {
        for child in &self.children {
            if child.matches(namespace, name) {
                return Some(child);
            }
            if let Some(found) = child.find_descendant(namespace, name) {
                return Some(found);
            }
        }
        None
    }

    pub fn descendants(&self, namespace: Option<&str>, name: &str) -> Vec<&XmlElement> {
        let mut found = Vec::new();
        self.collect_descendants(namespace, name, &mut found);
        found
    }

    fn collect_descendants<'a>(
        &'a self,
        namespace: Option<&str>,
        name: &str,
        found: &mut Vec<&'a XmlElement>,
    ) {
        for child in &self.children {
            if child.matches(namespace, name) {
                found.push(child);
            }
            child.collect_descendants(namespace, name, found);
        }
    }
}

fn resolved_namespace(resolve_result: ResolveResult) -> Option<String> {
    match resolve_result {
        ResolveResult::Bound(namespace) => {
            Some(String::from_utf8_lossy(namespace.as_ref()).into_owned())
        }
        _ => None,
    }
}

/// Parse an XML document into its root element. Text and names are decoded with the encoding declared in
/// the XML declaration, UTF-8 when there is none.
pub fn parse_xml(xml: &[u8]) -> anyhow::Result<XmlElement> {
    let mut reader = NsReader::from_reader(xml);
    reader.trim_text(true);

    // Elements that have been opened but not closed yet. The bottom of the stack is the root.
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        let (resolve_result, event) = reader.read_resolved_event().context("Malformed XML")?;
        let namespace = resolved_namespace(resolve_result);
        match event {
            Event::Start(start) => {
                let local_name = start.local_name();
                let name = reader.decoder().decode(local_name.as_ref())?;
                stack.push(XmlElement::new(namespace, name.into_owned()));
            }
            Event::Empty(start) => {
                let local_name = start.local_name();
                let name = reader.decoder().decode(local_name.as_ref())?;
                attach(
                    XmlElement::new(namespace, name.into_owned()),
                    &mut stack,
                    &mut root,
                )?;
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| anyhow!("Closing tag without matching opening tag"))?;
                attach(element, &mut stack, &mut root)?;
            }
            Event::Text(text) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&text.unescape()?);
                }
            }
            Event::CData(cdata) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&reader.decoder().decode(cdata.as_ref())?);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(unclosed) = stack.last() {
        return Err(anyhow!(
            "Unexpected end of document, element <{}> is not closed",
            unclosed.name
        ));
    }
    root.ok_or_else(|| anyhow!("Document has no root element"))
}

fn attach(
    element: XmlElement,
    stack: &mut Vec<XmlElement>,
    root: &mut Option<XmlElement>,
) -> anyhow::Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => {
            if root.is_some() {
                return Err(anyhow!(
                    "Found a second root element <{}>",
                    element.name
                ));
            }
            *root = Some(element);
        }
    }
    Ok(())
}

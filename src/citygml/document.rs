use super::namespace::{ElementKind, KindRegistry, Namespaces};
use super::tree::{Attribute, Element, Node};
use crate::error::DocumentError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use quick_xml::NsReader;
use std::path::Path;

/// A parsed CityGML document owning its element tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Comments and processing instructions before the root.
    pub prolog: Vec<Node>,
    pub doctype: Option<String>,
    pub root: Element,
}

impl Document {
    /// Reads and parses a document from disk.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DocumentError> {
        let content = std::fs::read_to_string(&path).map_err(|source| DocumentError::FileRead {
            path: path.as_ref().to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Parses XML text, keeping whitespace so it can be re-indented.
    pub fn parse(content: &str) -> Result<Self, DocumentError> {
        let mut reader = NsReader::from_str(content);
        reader.trim_text(false).expand_empty_elements(true);

        let mut prolog = Vec::new();
        let mut doctype = None;
        let mut root = None;
        let mut stack: Vec<Element> = Vec::new();

        loop {
            let (resolved, event) = reader.read_resolved_event()?;
            let namespace = namespace_uri(&resolved);

            match event {
                Event::Start(start) => {
                    stack.push(element_from_start(&reader, &start, namespace)?);
                }
                Event::Empty(start) => {
                    let element = element_from_start(&reader, &start, namespace)?;
                    close_element(&mut stack, &mut root, element);
                }
                Event::End(_) => {
                    if let Some(element) = stack.pop() {
                        close_element(&mut stack, &mut root, element);
                    }
                }
                Event::Text(text) => push_text(&mut stack, &text.unescape()?),
                Event::CData(cdata) => {
                    push_text(&mut stack, &String::from_utf8_lossy(&cdata.into_inner()));
                }
                Event::Comment(comment) => {
                    let node = Node::Comment {
                        text: String::from_utf8_lossy(&comment).into_owned(),
                        tail: None,
                    };
                    push_misc(&mut stack, &mut prolog, root.is_some(), node);
                }
                Event::PI(instruction) => {
                    let node = Node::Instruction {
                        content: String::from_utf8_lossy(&instruction).into_owned(),
                        tail: None,
                    };
                    push_misc(&mut stack, &mut prolog, root.is_some(), node);
                }
                Event::DocType(text) => {
                    doctype = Some(String::from_utf8_lossy(&text).trim().to_string());
                }
                Event::Decl(_) => {}
                Event::Eof => break,
            }
        }

        Ok(Self {
            prolog,
            doctype,
            root: root.ok_or(DocumentError::NoRoot)?,
        })
    }

    /// Prefixed namespaces declared on the root. The default namespace is excluded.
    #[must_use]
    pub fn namespaces(&self) -> Namespaces {
        self.root
            .attributes
            .iter()
            .filter_map(|a| {
                a.name
                    .strip_prefix("xmlns:")
                    .map(|prefix| (prefix.to_string(), a.value.clone()))
            })
            .collect()
    }

    #[must_use]
    pub fn registry(&self) -> KindRegistry {
        KindRegistry::for_namespaces(&self.namespaces())
    }

    /// Building elements in document order.
    pub fn buildings(&self) -> impl Iterator<Item = &Element> {
        let registry = self.registry();
        self.root
            .descendants()
            .filter(move |e| registry.kind_of(e) == ElementKind::Building)
    }
}

/// First descendant whose `{namespace}local` name contains `attribute` and
/// whose text is not empty.
///
/// Containment rather than equality lets one lookup match prefixed and
/// suffixed variants of an attribute name.
#[must_use]
pub fn get_attribute_if_present<'a>(element: &'a Element, attribute: &str) -> Option<&'a Element> {
    element.descendants().find(|e| {
        e.text.as_deref().is_some_and(|t| !t.is_empty()) && e.clark_name().contains(attribute)
    })
}

fn namespace_uri(resolved: &ResolveResult<'_>) -> Option<String> {
    match resolved {
        ResolveResult::Bound(ns) => Some(String::from_utf8_lossy(ns.as_ref()).into_owned()),
        _ => None,
    }
}

fn element_from_start(
    reader: &NsReader<&[u8]>,
    start: &BytesStart<'_>,
    namespace: Option<String>,
) -> Result<Element, DocumentError> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut element = Element::new(name, namespace);

    for attr in start.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let (resolved, _) = reader.resolve_attribute(attr.key);
        element.attributes.push(Attribute {
            name: String::from_utf8_lossy(attr.key.as_ref()).into_owned(),
            namespace: namespace_uri(&resolved),
            value: attr.unescape_value()?.into_owned(),
        });
    }

    Ok(element)
}

fn close_element(stack: &mut [Element], root: &mut Option<Element>, element: Element) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(Node::Element(element)),
        None => *root = Some(element),
    }
}

// Text before the first child is the element's text; after a child it is
// that child's tail. Whitespace outside the root is dropped.
fn push_text(stack: &mut [Element], text: &str) {
    let Some(parent) = stack.last_mut() else {
        return;
    };
    let slot = match parent.children.last_mut() {
        Some(last) => last.tail_mut(),
        None => &mut parent.text,
    };
    slot.get_or_insert_with(String::new).push_str(text);
}

fn push_misc(stack: &mut [Element], prolog: &mut Vec<Node>, after_root: bool, node: Node) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None if !after_root => prolog.push(node),
        None => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::citygml::namespace::prefix_for;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!-- district export -->
<core:CityModel xmlns="http://www.opengis.net/citygml/1.0" xmlns:core="http://www.opengis.net/citygml/1.0" xmlns:bldg="http://www.opengis.net/citygml/building/1.0" xmlns:gml="http://www.opengis.net/gml">
  <core:cityObjectMember>
    <bldg:Building gml:id="b1">
      <bldg:function>31001_1010</bldg:function>
      <bldg:consistsOfBuildingPart>
        <bldg:BuildingPart gml:id="b1-p1">
          <bldg:yearOfConstruction>1950</bldg:yearOfConstruction>
        </bldg:BuildingPart>
      </bldg:consistsOfBuildingPart>
    </bldg:Building>
  </core:cityObjectMember>
  <core:cityObjectMember>
    <bldg:Building gml:id="b2"/>
  </core:cityObjectMember>
</core:CityModel>
"#;

    #[test]
    fn root_namespaces_exclude_default() {
        let doc = Document::parse(SAMPLE).unwrap();
        let namespaces = doc.namespaces();
        assert_eq!(namespaces.len(), 3);
        assert_eq!(
            namespaces.get("bldg").map(String::as_str),
            Some("http://www.opengis.net/citygml/building/1.0")
        );
        assert!(!namespaces.contains_key(""));
    }

    #[test]
    fn buildings_in_document_order() {
        let doc = Document::parse(SAMPLE).unwrap();
        let ids: Vec<Option<&str>> = doc.buildings().map(Element::gml_id).collect();
        assert_eq!(ids, vec![Some("b1"), Some("b2")]);
    }

    #[test]
    fn parts_are_found_through_consists_of() {
        let mut doc = Document::parse(SAMPLE).unwrap();
        let registry = doc.registry();
        let mut parts = Vec::new();
        registry.buildings_mut(&mut doc.root, &mut |building| {
            let id = building.gml_id().unwrap_or_default().to_string();
            registry.building_parts_mut(building, &mut |part| {
                parts.push((id.clone(), part.gml_id().unwrap_or_default().to_string()));
            });
        });
        assert_eq!(parts, vec![("b1".to_string(), "b1-p1".to_string())]);
    }

    #[test]
    fn gml32_identifiers_are_read() {
        let doc = Document::parse(
            r#"<core:CityModel xmlns:core="http://www.opengis.net/citygml/3.0" xmlns:bldg="http://www.opengis.net/citygml/building/3.0" xmlns:gml="http://www.opengis.net/gml/3.2"><core:cityObjectMember><bldg:Building gml:id="b30"/></core:cityObjectMember></core:CityModel>"#,
        )
        .unwrap();
        let ids: Vec<Option<&str>> = doc.buildings().map(Element::gml_id).collect();
        assert_eq!(ids, vec![Some("b30")]);
    }

    #[test]
    fn attribute_lookup_scans_nested_parts() {
        let doc = Document::parse(SAMPLE).unwrap();
        let building = doc.buildings().next().unwrap();
        let year = get_attribute_if_present(building, "yearOfConstruction").unwrap();
        assert_eq!(year.text.as_deref(), Some("1950"));
        assert!(get_attribute_if_present(building, "roofType").is_none());
    }

    #[test]
    fn attribute_lookup_matches_substrings() {
        let doc = Document::parse(SAMPLE).unwrap();
        let building = doc.buildings().next().unwrap();
        let found = get_attribute_if_present(building, "unction").unwrap();
        assert_eq!(found.local_name(), "function");
    }

    #[test]
    fn whitespace_is_kept_as_text_and_tail() {
        let doc = Document::parse(SAMPLE).unwrap();
        assert_eq!(doc.root.text.as_deref(), Some("\n  "));
        let member = doc.root.elements().next().unwrap();
        assert_eq!(member.tail.as_deref(), Some("\n  "));
        assert_eq!(doc.prolog.len(), 1);
    }

    #[test]
    fn prefix_lookup_prefers_requested_prefix() {
        let namespaces = Document::parse(SAMPLE).unwrap().namespaces();
        assert_eq!(
            prefix_for(&namespaces, "http://www.opengis.net/citygml/1.0", "core"),
            Some("core")
        );
        assert_eq!(prefix_for(&namespaces, "urn:missing", "gen"), None);
    }

    #[test]
    fn empty_input_has_no_root() {
        assert!(matches!(Document::parse(""), Err(DocumentError::NoRoot)));
    }

    #[test]
    fn malformed_input_is_rejected() {
        assert!(matches!(
            Document::parse("<a><b></a>"),
            Err(DocumentError::Xml { .. })
        ));
    }
}

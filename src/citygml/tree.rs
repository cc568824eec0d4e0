use super::namespace::{local_part, GML32_NS, GML_NS};

/// An attribute as written in the source, with its resolved namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub namespace: Option<String>,
    pub value: String,
}

impl Attribute {
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
            value: value.into(),
        }
    }

    #[must_use]
    pub fn local_name(&self) -> &str {
        local_part(&self.name)
    }
}

/// A child of an element. Every node owns the text that follows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Comment { text: String, tail: Option<String> },
    Instruction { content: String, tail: Option<String> },
}

impl Node {
    #[must_use]
    pub fn tail(&self) -> Option<&str> {
        match self {
            Self::Element(e) => e.tail.as_deref(),
            Self::Comment { tail, .. } | Self::Instruction { tail, .. } => tail.as_deref(),
        }
    }

    pub fn tail_mut(&mut self) -> &mut Option<String> {
        match self {
            Self::Element(e) => &mut e.tail,
            Self::Comment { tail, .. } | Self::Instruction { tail, .. } => tail,
        }
    }

    #[must_use]
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(e) => Some(e),
            _ => None,
        }
    }
}

/// An XML element with lxml-style `text` (before the first child) and
/// `tail` (after the closing tag).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    /// Qualified name as serialized, e.g. `bldg:Building`.
    pub name: String,
    pub namespace: Option<String>,
    pub attributes: Vec<Attribute>,
    pub text: Option<String>,
    pub children: Vec<Node>,
    pub tail: Option<String>,
}

impl Element {
    #[must_use]
    pub fn new(name: impl Into<String>, namespace: Option<String>) -> Self {
        Self {
            name: name.into(),
            namespace,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    #[must_use]
    pub fn with_attribute(mut self, name: &str, value: &str) -> Self {
        self.set_attribute(name, value);
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: Element) -> Self {
        self.append(child);
        self
    }

    #[must_use]
    pub fn local_name(&self) -> &str {
        local_part(&self.name)
    }

    /// Name in `{namespace}local` notation.
    #[must_use]
    pub fn clark_name(&self) -> String {
        match &self.namespace {
            Some(ns) => format!("{{{ns}}}{}", self.local_name()),
            None => self.local_name().to_string(),
        }
    }

    #[must_use]
    pub fn attribute(&self, namespace: Option<&str>, local_name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.namespace.as_deref() == namespace && a.local_name() == local_name)
            .map(|a| a.value.as_str())
    }

    /// Sets an attribute by its qualified name.
    pub fn set_attribute(&mut self, name: &str, value: &str) {
        match self.attributes.iter_mut().find(|a| a.name == name) {
            Some(existing) => existing.value = value.to_string(),
            None => self.attributes.push(Attribute::new(name, value)),
        }
    }

    /// The `gml:id` identifier, in GML 3.1 or GML 3.2.
    #[must_use]
    pub fn gml_id(&self) -> Option<&str> {
        self.attribute(Some(GML_NS), "id")
            .or_else(|| self.attribute(Some(GML32_NS), "id"))
    }

    #[must_use]
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(|node| match node {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }

    /// Every descendant element in document order, excluding `self`.
    #[must_use]
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: vec![self.children.iter()],
        }
    }

    pub fn append(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    pub fn insert(&mut self, index: usize, child: Element) {
        let index = index.min(self.children.len());
        self.children.insert(index, Node::Element(child));
    }
}

/// Pre-order iterator over descendant elements.
pub struct Descendants<'a> {
    stack: Vec<std::slice::Iter<'a, Node>>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let iter = self.stack.last_mut()?;
            match iter.next() {
                Some(Node::Element(element)) => {
                    self.stack.push(element.children.iter());
                    return Some(element);
                }
                Some(_) => {}
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn bldg(local: &str) -> Element {
        Element::new(
            format!("bldg:{local}"),
            Some("http://www.opengis.net/citygml/building/2.0".to_string()),
        )
    }

    #[test]
    fn descendants_are_pre_order() {
        let tree = bldg("Building")
            .with_child(bldg("function").with_text("1010"))
            .with_child(
                bldg("consistsOfBuildingPart").with_child(bldg("BuildingPart").with_child(bldg("roofType"))),
            )
            .with_child(bldg("yearOfConstruction"));

        let names: Vec<&str> = tree.descendants().map(Element::local_name).collect();
        assert_eq!(
            names,
            vec![
                "function",
                "consistsOfBuildingPart",
                "BuildingPart",
                "roofType",
                "yearOfConstruction"
            ]
        );
    }

    #[test]
    fn clark_name_includes_namespace() {
        assert_eq!(
            bldg("function").clark_name(),
            "{http://www.opengis.net/citygml/building/2.0}function"
        );
        assert_eq!(Element::new("value", None).clark_name(), "value");
    }

    #[test]
    fn insert_clamps_index() {
        let mut element = bldg("Building");
        element.insert(5, bldg("function"));
        element.insert(0, bldg("roofType"));
        let names: Vec<&str> = element.elements().map(Element::local_name).collect();
        assert_eq!(names, vec!["roofType", "function"]);
    }

    #[test]
    fn gml_id_requires_gml_namespace() {
        let mut element = bldg("Building");
        element.attributes.push(Attribute {
            name: "gml:id".into(),
            namespace: Some(GML_NS.into()),
            value: "b1".into(),
        });
        element.attributes.push(Attribute::new("id", "other"));
        assert_eq!(element.gml_id(), Some("b1"));
    }
}

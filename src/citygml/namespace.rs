//! CityGML namespaces and element classification.

use super::tree::Element;
use std::collections::BTreeMap;

pub const GML_NS: &str = "http://www.opengis.net/gml";

/// GML 3.2, used for identifiers by CityGML 3.0.
pub const GML32_NS: &str = "http://www.opengis.net/gml/3.2";

const BUILDING_NAMESPACES: &[&str] = &[
    "http://www.opengis.net/citygml/building/1.0",
    "http://www.opengis.net/citygml/building/2.0",
    "http://www.opengis.net/citygml/building/3.0",
];

const GENERICS_NAMESPACES: &[&str] = &[
    "http://www.opengis.net/citygml/generics/1.0",
    "http://www.opengis.net/citygml/generics/2.0",
    "http://www.opengis.net/citygml/generics/3.0",
];

/// Prefix → URI declared on the root element.
pub type Namespaces = BTreeMap<String, String>;

/// Element kinds the tools care about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Building,
    BuildingPart,
    Other,
}

/// Strips the prefix of a qualified name.
#[must_use]
pub fn local_part(qualified: &str) -> &str {
    qualified
        .rsplit_once(':')
        .map_or(qualified, |(_, local)| local)
}

/// Prefix bound to `uri`, preferring `preferred` when it is bound to it.
#[must_use]
pub fn prefix_for<'a>(namespaces: &'a Namespaces, uri: &str, preferred: &str) -> Option<&'a str> {
    if namespaces.get(preferred).is_some_and(|ns| ns == uri) {
        return namespaces.get_key_value(preferred).map(|(prefix, _)| prefix.as_str());
    }
    namespaces
        .iter()
        .find(|(_, ns)| *ns == uri)
        .map(|(prefix, _)| prefix.as_str())
}

#[must_use]
pub fn is_generics_namespace(uri: &str) -> bool {
    GENERICS_NAMESPACES.contains(&uri)
}

/// Generics namespace matching the CityGML version of a building namespace.
#[must_use]
pub fn generics_namespace_for(building_namespace: &str) -> &'static str {
    BUILDING_NAMESPACES
        .iter()
        .position(|ns| *ns == building_namespace)
        .and_then(|i| GENERICS_NAMESPACES.get(i))
        .copied()
        .unwrap_or(GENERICS_NAMESPACES[0])
}

/// Maps `(namespace, local name)` to an [`ElementKind`].
#[derive(Debug, Clone)]
pub struct KindRegistry {
    building_namespaces: Vec<String>,
}

impl KindRegistry {
    /// Known building namespaces plus whatever the document binds to `bldg`.
    #[must_use]
    pub fn for_namespaces(namespaces: &Namespaces) -> Self {
        let mut building_namespaces: Vec<String> =
            BUILDING_NAMESPACES.iter().map(|ns| (*ns).to_string()).collect();
        if let Some(bldg) = namespaces.get("bldg") {
            if !building_namespaces.contains(bldg) {
                building_namespaces.push(bldg.clone());
            }
        }
        Self {
            building_namespaces,
        }
    }

    #[must_use]
    pub fn is_building_namespace(&self, uri: &str) -> bool {
        self.building_namespaces.iter().any(|ns| ns == uri)
    }

    #[must_use]
    pub fn kind(&self, namespace: Option<&str>, local_name: &str) -> ElementKind {
        match namespace {
            Some(ns) if self.is_building_namespace(ns) => match local_name {
                "Building" => ElementKind::Building,
                "BuildingPart" => ElementKind::BuildingPart,
                _ => ElementKind::Other,
            },
            _ => ElementKind::Other,
        }
    }

    #[must_use]
    pub fn kind_of(&self, element: &Element) -> ElementKind {
        self.kind(element.namespace.as_deref(), element.local_name())
    }

    /// Calls `f` on every Building below `element`, in document order.
    pub fn buildings_mut(&self, element: &mut Element, f: &mut dyn FnMut(&mut Element)) {
        self.visit_mut(element, ElementKind::Building, f);
    }

    /// The consists-of query: calls `f` on every BuildingPart nested below
    /// `element`, each part before the parts nested in it.
    pub fn building_parts_mut(&self, element: &mut Element, f: &mut dyn FnMut(&mut Element)) {
        self.visit_mut(element, ElementKind::BuildingPart, f);
    }

    fn visit_mut(&self, element: &mut Element, kind: ElementKind, f: &mut dyn FnMut(&mut Element)) {
        for child in element.elements_mut() {
            if self.kind_of(child) == kind {
                f(child);
            }
            self.visit_mut(child, kind, f);
        }
    }
}

impl Default for KindRegistry {
    fn default() -> Self {
        Self::for_namespaces(&Namespaces::new())
    }
}

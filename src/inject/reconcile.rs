use crate::citygml::namespace::{generics_namespace_for, is_generics_namespace, prefix_for};
use crate::citygml::{get_attribute_if_present, Document, Element, KindRegistry, Namespaces};
use crate::model::{AttributeKind, BuildingTable, CellValue};
use log::{debug, warn};

/// Counters collected while reconciling one document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    pub buildings: usize,
    pub added: usize,
    pub skipped: usize,
}

/// Writes spreadsheet attributes into the Building and BuildingPart
/// elements of one document.
pub struct Reconciler<'t> {
    table: &'t BuildingTable,
    registry: KindRegistry,
    namespaces: Namespaces,
    generics_namespace: Option<String>,
}

impl<'t> Reconciler<'t> {
    #[must_use]
    pub fn new(document: &Document, table: &'t BuildingTable) -> Self {
        let namespaces = document.namespaces();
        let generics_namespace = namespaces
            .get("gen")
            .or_else(|| namespaces.values().find(|ns| is_generics_namespace(ns)))
            .cloned();
        Self {
            table,
            registry: KindRegistry::for_namespaces(&namespaces),
            namespaces,
            generics_namespace,
        }
    }

    /// Reconciles every Building, then each of its BuildingParts.
    pub fn reconcile_document(&self, document: &mut Document) -> ReconcileStats {
        let mut stats = ReconcileStats::default();
        self.registry.buildings_mut(&mut document.root, &mut |building| {
            stats.buildings += 1;
            self.fill(building, &mut stats);
            self.registry
                .building_parts_mut(building, &mut |part| self.fill(part, &mut stats));
        });
        stats
    }

    /// Adds the attributes of the matching spreadsheet row to one element.
    /// Elements without a row are left untouched.
    pub fn fill(&self, element: &mut Element, stats: &mut ReconcileStats) {
        let Some(id) = element.gml_id().map(str::to_string) else {
            return;
        };
        let Some(record) = self.table.get(&id) else {
            return;
        };

        for attribute in &self.table.attributes {
            let value = record.value(attribute);
            match self.table.kind_of(attribute) {
                Some(AttributeKind::Structured) => {
                    self.append_structured(element, &id, attribute, value, stats);
                }
                Some(AttributeKind::Generic) => {
                    self.insert_generic(element, &id, attribute, value, stats);
                }
                None => {}
            }
        }
    }

    fn append_structured(
        &self,
        element: &mut Element,
        id: &str,
        attribute: &str,
        value: &CellValue,
        stats: &mut ReconcileStats,
    ) {
        if value.is_blank() {
            return;
        }
        debug!("{id}.{attribute} = {value:?}");

        if get_attribute_if_present(element, attribute).is_some() {
            warn!("  {id}.{attribute} : Already present");
            stats.skipped += 1;
            return;
        }

        let namespace = element
            .namespace
            .clone()
            .or_else(|| self.namespaces.get("bldg").cloned());
        let child = self
            .new_element(namespace, attribute, "bldg")
            .with_text(value.to_string());
        // Building attributes must come after every existing child.
        element.append(child);
        stats.added += 1;
    }

    // Unlike structured attributes, empty text is still written here; only
    // null cells are skipped.
    fn insert_generic(
        &self,
        element: &mut Element,
        id: &str,
        attribute: &str,
        value: &CellValue,
        stats: &mut ReconcileStats,
    ) {
        if value.is_null() {
            return;
        }
        debug!("{id}.{attribute} = {value:?}");

        if self.generic_attribute_present(element, attribute) {
            warn!("  {id}.{attribute} : Already present");
            stats.skipped += 1;
            return;
        }

        let namespace = self.generics_namespace.clone().unwrap_or_else(|| {
            generics_namespace_for(element.namespace.as_deref().unwrap_or_default()).to_string()
        });
        let value_element = self
            .new_element(Some(namespace.clone()), "value", "gen")
            .with_text(value.to_string());
        let wrapper = self
            .new_element(Some(namespace), "stringAttribute", "gen")
            .with_attribute("name", attribute)
            .with_child(value_element);
        // Generic attributes must precede typed content.
        element.insert(0, wrapper);
        stats.added += 1;
    }

    fn generic_attribute_present(&self, element: &Element, attribute: &str) -> bool {
        get_attribute_if_present(element, attribute).is_some()
            || element.descendants().any(|e| {
                e.namespace.as_deref().is_some_and(|ns| self.is_generics(ns))
                    && e.local_name().ends_with("Attribute")
                    && e.attribute(None, "name") == Some(attribute)
            })
    }

    fn is_generics(&self, uri: &str) -> bool {
        is_generics_namespace(uri) || self.generics_namespace.as_deref() == Some(uri)
    }

    // Uses the root's prefix for the namespace when there is one, otherwise
    // declares it as the element's default namespace.
    fn new_element(&self, namespace: Option<String>, local_name: &str, preferred: &str) -> Element {
        let Some(uri) = namespace else {
            return Element::new(local_name, None);
        };
        match prefix_for(&self.namespaces, &uri, preferred) {
            Some(prefix) => Element::new(format!("{prefix}:{local_name}"), Some(uri)),
            None => Element::new(local_name, Some(uri.clone())).with_attribute("xmlns", &uri),
        }
    }
}

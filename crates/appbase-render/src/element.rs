//! The element tree.
//!
//! Screens are trees of typed elements. The variant set is closed: a
//! container (optionally repeating over a table), text, button, input,
//! image, heading. Each element owns its children outright; the tree is
//! acyclic by construction, so plain ownership suffices and id lookup walks
//! the tree.

use crate::calc::{Calculation, Condition};
use appbase_commons::{ElementId, Filter};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;

/// Binds a container to a table: its children render once per matching
/// record, each with its own evaluation context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepeatingBinding {
    pub table: String,
    #[serde(default)]
    pub filters: Vec<Filter>,
}

/// How an element decides to render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum RenderMode {
    /// Always rendered.
    Fixed,
    /// Rendered only when every attached condition holds.
    Conditional {
        #[serde(default)]
        conditions: Vec<Condition>,
    },
}

impl Default for RenderMode {
    fn default() -> Self {
        RenderMode::Fixed
    }
}

/// The closed set of element types, each with its own property bag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementKind {
    Container {
        #[serde(default)]
        repeating: Option<RepeatingBinding>,
    },
    Text {
        text: String,
    },
    Button {
        label: String,
        #[serde(default)]
        target_screen: Option<String>,
    },
    Input {
        #[serde(default)]
        placeholder: String,
        #[serde(default)]
        default_value: Option<String>,
    },
    Image {
        src: String,
        #[serde(default)]
        alt: String,
    },
    Heading {
        text: String,
        #[serde(default = "default_heading_level")]
        level: u8,
    },
}

fn default_heading_level() -> u8 {
    1
}

/// One node of a screen's element tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: ElementId,
    #[serde(flatten)]
    pub kind: ElementKind,
    #[serde(default)]
    pub render: RenderMode,
    /// Calculations by id; iteration order carries no meaning.
    #[serde(default)]
    pub calculations: HashMap<String, Calculation>,
    #[serde(default)]
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(id: impl Into<ElementId>, kind: ElementKind) -> Self {
        Self {
            id: id.into(),
            kind,
            render: RenderMode::Fixed,
            calculations: HashMap::new(),
            children: Vec::new(),
        }
    }

    /// Finds an element anywhere in this subtree by id.
    pub fn find(&self, id: &ElementId) -> Option<&Element> {
        if &self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(id))
    }

    /// Reads a named static property of this element. `None` when the
    /// variant has no such property.
    pub fn property(&self, name: &str) -> Option<Value> {
        match (&self.kind, name) {
            (ElementKind::Container { repeating }, "table") => {
                repeating.as_ref().map(|r| json!(r.table))
            }
            (ElementKind::Text { text }, "text") => Some(json!(text)),
            (ElementKind::Button { label, .. }, "label") => Some(json!(label)),
            (ElementKind::Button { target_screen, .. }, "target_screen") => {
                target_screen.as_ref().map(|s| json!(s))
            }
            (ElementKind::Input { placeholder, .. }, "placeholder") => Some(json!(placeholder)),
            (ElementKind::Input { default_value, .. }, "default_value") => {
                default_value.as_ref().map(|s| json!(s))
            }
            (ElementKind::Image { src, .. }, "src") => Some(json!(src)),
            (ElementKind::Image { alt, .. }, "alt") => Some(json!(alt)),
            (ElementKind::Heading { text, .. }, "text") => Some(json!(text)),
            (ElementKind::Heading { level, .. }, "level") => Some(json!(level)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> Element {
        let mut root = Element::new("root", ElementKind::Container { repeating: None });
        let mut row = Element::new(
            "row",
            ElementKind::Container {
                repeating: Some(RepeatingBinding {
                    table: "Leads".into(),
                    filters: vec![],
                }),
            },
        );
        row.children.push(Element::new(
            "row-label",
            ElementKind::Text {
                text: "Name".into(),
            },
        ));
        root.children.push(row);
        root.children.push(Element::new(
            "cta",
            ElementKind::Button {
                label: "Save".into(),
                target_screen: Some("confirm".into()),
            },
        ));
        root
    }

    #[test]
    fn test_find_at_any_depth() {
        let tree = sample_tree();
        assert!(tree.find(&"root".into()).is_some());
        assert!(tree.find(&"row".into()).is_some());
        assert!(tree.find(&"row-label".into()).is_some());
        assert!(tree.find(&"ghost".into()).is_none());
    }

    #[test]
    fn test_property_lookup() {
        let tree = sample_tree();
        let button = tree.find(&"cta".into()).unwrap();
        assert_eq!(button.property("label"), Some(json!("Save")));
        assert_eq!(button.property("target_screen"), Some(json!("confirm")));
        assert_eq!(button.property("text"), None);

        let row = tree.find(&"row".into()).unwrap();
        assert_eq!(row.property("table"), Some(json!("Leads")));
    }

    #[test]
    fn test_wire_format() {
        let tree = sample_tree();
        let wire = serde_json::to_value(&tree).unwrap();
        assert_eq!(wire["type"], "container");
        assert_eq!(wire["children"][1]["type"], "button");
        assert_eq!(wire["children"][1]["label"], "Save");

        let back: Element = serde_json::from_value(wire).unwrap();
        assert_eq!(back, tree);
    }

    #[test]
    fn test_render_mode_defaults_to_fixed() {
        let el: Element = serde_json::from_value(serde_json::json!({
            "id": "t1",
            "type": "text",
            "text": "hi"
        }))
        .unwrap();
        assert_eq!(el.render, RenderMode::Fixed);
        assert!(el.calculations.is_empty());
        assert!(el.children.is_empty());
    }

    #[test]
    fn test_heading_level_default() {
        let el: Element = serde_json::from_value(serde_json::json!({
            "id": "h1",
            "type": "heading",
            "text": "Welcome"
        }))
        .unwrap();
        assert_eq!(el.property("level"), Some(json!(1)));
    }
}

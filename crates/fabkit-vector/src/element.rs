//! Input element tree handed over by the document loader.
//!
//! The loader owns XML parsing and attribute string handling; by the time a
//! tree reaches this engine every attribute value has been coerced to its
//! semantic type (numbers for coordinates, number lists for point
//! sequences). The engine reads the tree, it never mutates it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use fabkit_core::Transform2D;

/// The closed set of element kinds the engine recognizes.
///
/// Dispatch over this enum is a single exhaustive `match`; adding a new
/// kind is a compile-time checked change rather than a runtime lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TagKind {
    /// Document root container.
    Svg,
    /// Grouping element carrying a transform for its subtree.
    Group,
    /// Definitions block; its subtree is never rendered directly.
    Defs,
    Rect,
    Polygon,
    Polyline,
    Line,
    Circle,
    Ellipse,
}

impl TagKind {
    /// Container kinds contribute no geometry of their own; the flattener
    /// recurses into them and drops them from the output.
    pub fn is_container(&self) -> bool {
        matches!(self, TagKind::Svg | TagKind::Group | TagKind::Defs)
    }
}

/// An attribute value, pre-coerced by the loader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttrValue {
    Number(f64),
    NumberList(Vec<f64>),
    Text(String),
}

/// One node of the parsed element tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementNode {
    pub tag: TagKind,
    pub attributes: HashMap<String, AttrValue>,
    /// The element's own transform, if it carried one. `None` means
    /// identity.
    pub transform: Option<Transform2D>,
    pub children: Vec<ElementNode>,
}

impl ElementNode {
    /// Creates a node with no attributes, no transform, and no children.
    pub fn new(tag: TagKind) -> Self {
        Self {
            tag,
            attributes: HashMap::new(),
            transform: None,
            children: Vec::new(),
        }
    }

    /// Adds an attribute (builder style, used by loaders and tests).
    pub fn with_attr(mut self, name: &str, value: AttrValue) -> Self {
        self.attributes.insert(name.to_string(), value);
        self
    }

    /// Adds a numeric attribute.
    pub fn with_number(self, name: &str, value: f64) -> Self {
        self.with_attr(name, AttrValue::Number(value))
    }

    /// Adds a text attribute.
    pub fn with_text(self, name: &str, value: &str) -> Self {
        self.with_attr(name, AttrValue::Text(value.to_string()))
    }

    /// Sets the element's own transform.
    pub fn with_transform(mut self, transform: Transform2D) -> Self {
        self.transform = Some(transform);
        self
    }

    /// Appends a child node.
    pub fn with_child(mut self, child: ElementNode) -> Self {
        self.children.push(child);
        self
    }

    /// Looks up a numeric attribute, substituting `default` when the
    /// attribute is missing, non-numeric, or non-finite. Malformed numeric
    /// attributes are absorbed here rather than surfaced as errors.
    pub fn number_attr(&self, name: &str, default: f64) -> f64 {
        match self.attributes.get(name) {
            Some(AttrValue::Number(v)) if v.is_finite() => *v,
            _ => default,
        }
    }

    /// Looks up a numeric attribute without a default, for attributes whose
    /// mere presence changes behavior (the rect radius mirror rule).
    pub fn opt_number_attr(&self, name: &str) -> Option<f64> {
        match self.attributes.get(name) {
            Some(AttrValue::Number(v)) if v.is_finite() => Some(*v),
            _ => None,
        }
    }

    /// Looks up a number-list attribute.
    pub fn number_list_attr(&self, name: &str) -> Option<&[f64]> {
        match self.attributes.get(name) {
            Some(AttrValue::NumberList(v)) => Some(v.as_slice()),
            _ => None,
        }
    }

    /// Looks up a text attribute.
    pub fn text_attr(&self, name: &str) -> Option<&str> {
        match self.attributes.get(name) {
            Some(AttrValue::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }
}

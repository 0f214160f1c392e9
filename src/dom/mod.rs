//! In-memory XML tree used for sprite assembly.
//!
//! A deliberately small DOM: elements with ordered attribute lists and
//! ordered children. Attribute values are stored decoded and re-escaped on
//! write; text-like nodes keep their raw (still-escaped) form so content
//! round-trips byte-for-byte.

mod parse;
mod write;

pub use parse::parse_document;
pub use write::write_document;

/// A single XML node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    /// Character data in raw form, entities still escaped.
    Text(String),
    /// CDATA section content.
    CData(String),
    /// Comment body.
    Comment(String),
    /// Processing instruction content (target plus data).
    Pi(String),
}

/// An XML element: tag name, ordered attributes, ordered children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    /// Create an element with no attributes or children.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Current value of an attribute.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute. An existing attribute is updated in place and keeps
    /// its position; a new one is appended.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attrs.iter_mut().find(|(k, _)| *k == name) {
            Some(entry) => entry.1 = value,
            None => self.attrs.push((name, value)),
        }
    }

    /// Remove an attribute, returning its previous value.
    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let idx = self.attrs.iter().position(|(k, _)| k == name)?;
        Some(self.attrs.remove(idx).1)
    }

    /// Iterate over direct child elements.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(el) => Some(el),
            _ => None,
        })
    }

    /// Mutable iteration over direct child elements.
    pub fn child_elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(|node| match node {
            Node::Element(el) => Some(el),
            _ => None,
        })
    }

    /// First direct child element with the given tag, mutable.
    pub fn child_mut(&mut self, tag: &str) -> Option<&mut Element> {
        self.child_elements_mut().find(|el| el.tag == tag)
    }

    /// Detach the first element with the given tag, searching the subtree in
    /// document order. The detached element keeps its own children.
    pub fn detach_first(&mut self, tag: &str) -> Option<Element> {
        let mut idx = 0;
        while idx < self.children.len() {
            if let Node::Element(el) = &mut self.children[idx] {
                if el.tag == tag {
                    let Node::Element(el) = self.children.remove(idx) else {
                        return None;
                    };
                    return Some(el);
                }
                if let Some(found) = el.detach_first(tag) {
                    return Some(found);
                }
            }
            idx += 1;
        }
        None
    }
}

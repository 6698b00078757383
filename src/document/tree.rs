//! Owned XML tree and node paths

use std::fmt;

/// Child-index path from the document root element.
///
/// Indices count every child node (elements, text, comments), so a path stays valid for
/// as long as the tree's shape is unchanged. The root element itself is the empty path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn child(&self, index: usize) -> Self {
        let mut steps = self.0.clone();
        steps.push(index);
        Self(steps)
    }

    pub fn steps(&self) -> &[usize] {
        &self.0
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("/");
        }
        for step in &self.0 {
            write!(f, "/{step}")?;
        }
        Ok(())
    }
}

/// A node of the tree, in document order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(XmlElement),
    /// Unescaped character data
    Text(String),
    CData(String),
    /// Raw comment body
    Comment(String),
    /// Raw processing instruction body
    ProcessingInstruction(String),
    /// Raw XML declaration body, prolog only
    Declaration(String),
    /// Raw doctype body, prolog only
    DocType(String),
}

impl Node {
    pub fn as_element(&self) -> Option<&XmlElement> {
        match self {
            Node::Element(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut XmlElement> {
        match self {
            Node::Element(e) => Some(e),
            _ => None,
        }
    }
}

/// An element with its attributes in document order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    /// Qualified name as written, e.g. `sdtc:raceCode`
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
    pub(crate) self_closing: bool,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
            self_closing: false,
        }
    }

    /// Name without namespace prefix
    pub fn local_name(&self) -> &str {
        local_name(&self.name)
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Replaces an existing attribute value; returns false if the attribute is absent
    pub fn set_attribute(&mut self, name: &str, value: impl Into<String>) -> bool {
        match self.attributes.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => {
                *v = value.into();
                true
            }
            None => false,
        }
    }

    /// The `xsi:type` discriminator, matched on any prefixed `type` attribute
    pub fn type_discriminator(&self) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k.contains(':') && !k.starts_with("xmlns") && local_name(k) == "type")
            .map(|(_, v)| v.as_str())
    }

    /// Direct text and CDATA children joined in document order.
    ///
    /// Comments, processing instructions and child elements are skipped, so text after
    /// a leading comment or between child elements is included. Blank runs used as
    /// indentation are left out once any child carries real text.
    pub fn text(&self) -> Option<String> {
        let runs: Vec<&str> = self
            .children
            .iter()
            .filter_map(|c| match c {
                Node::Text(t) | Node::CData(t) => Some(t.as_str()),
                _ => None,
            })
            .collect();
        if runs.is_empty() {
            return None;
        }
        if runs.iter().all(|t| t.trim().is_empty()) {
            return Some(runs.concat());
        }
        Some(runs.into_iter().filter(|t| !t.trim().is_empty()).collect())
    }

    /// Writes `value` into the first non-blank direct text node and empties the other
    /// non-blank ones.
    ///
    /// Emptied nodes stay in place so node paths into this element remain valid.
    /// Blank runs keep their whitespace. With no text child the value is appended.
    pub fn set_text(&mut self, value: impl Into<String>) {
        let mut value = Some(value.into());
        for child in &mut self.children {
            if let Node::Text(t) | Node::CData(t) = child {
                if t.trim().is_empty() {
                    continue;
                }
                *t = value.take().unwrap_or_default();
            }
        }
        if let Some(value) = value {
            let first_text = self
                .children
                .iter_mut()
                .find_map(|c| match c {
                    Node::Text(t) | Node::CData(t) => Some(t),
                    _ => None,
                });
            match first_text {
                Some(t) => *t = value,
                None => self.children.push(Node::Text(value)),
            }
        }
    }

    /// Child elements with their child-node indices
    pub fn child_elements(&self) -> impl Iterator<Item = (usize, &XmlElement)> {
        self.children
            .iter()
            .enumerate()
            .filter_map(|(i, c)| c.as_element().map(|e| (i, e)))
    }

    pub fn node_at(&self, path: &NodePath) -> Option<&Node> {
        let (last, parents) = path.steps().split_last()?;
        let mut current = self;
        for &step in parents {
            current = current.children.get(step)?.as_element()?;
        }
        current.children.get(*last)
    }

    pub fn node_at_mut(&mut self, path: &NodePath) -> Option<&mut Node> {
        let (last, parents) = path.steps().split_last()?;
        let mut current = self;
        for &step in parents {
            current = current.children.get_mut(step)?.as_element_mut()?;
        }
        current.children.get_mut(*last)
    }

    pub fn element_at(&self, path: &NodePath) -> Option<&XmlElement> {
        if path.depth() == 0 {
            return Some(self);
        }
        self.node_at(path)?.as_element()
    }

    pub fn element_at_mut(&mut self, path: &NodePath) -> Option<&mut XmlElement> {
        if path.depth() == 0 {
            return Some(self);
        }
        self.node_at_mut(path)?.as_element_mut()
    }
}

/// A parsed document: prolog, single root element, epilog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDocument {
    /// Name used in error messages and reports, usually the file name
    pub name: String,
    pub prolog: Vec<Node>,
    pub root: XmlElement,
    pub epilog: Vec<Node>,
}

pub(crate) fn local_name(qualified: &str) -> &str {
    qualified.rsplit(':').next().unwrap_or(qualified)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> XmlElement {
        let mut given = XmlElement::new("given");
        given.children.push(Node::Text("Ann".to_string()));
        let mut name = XmlElement::new("name");
        name.children.push(Node::Text("\n  ".to_string()));
        name.children.push(Node::Element(given));
        let mut root = XmlElement::new("ClinicalDocument");
        root.attributes.push(("xmlns:xsi".to_string(), "urn".to_string()));
        root.children.push(Node::Comment(" c ".to_string()));
        root.children.push(Node::Element(name));
        root
    }

    #[test]
    fn test_node_path_display() {
        assert_eq!(NodePath::root().to_string(), "/");
        assert_eq!(NodePath::root().child(0).child(3).child(1).to_string(), "/0/3/1");
    }

    #[test]
    fn test_element_lookup_by_path() {
        let root = sample();
        let path = NodePath::root().child(1).child(1);
        assert_eq!(root.element_at(&path).unwrap().name, "given");
        assert!(root.element_at(&NodePath::root().child(0)).is_none());
        assert!(root.element_at(&NodePath::root().child(9)).is_none());
    }

    #[test]
    fn test_text_joins_direct_text_children() {
        let root = sample();
        let name = root.element_at(&NodePath::root().child(1)).unwrap();
        assert_eq!(name.text().as_deref(), Some("\n  "));
        assert_eq!(root.text(), None);

        let mut name = XmlElement::new("name");
        name.children.push(Node::Comment(" legal ".to_string()));
        name.children.push(Node::Text("Marguerite Oyelaran".to_string()));
        assert_eq!(name.text().as_deref(), Some("Marguerite Oyelaran"));

        let mut given = XmlElement::new("given");
        given.children.push(Node::Text("Marguerite".to_string()));
        let mut mixed = XmlElement::new("name");
        mixed.children.push(Node::Element(given));
        mixed.children.push(Node::Text(" Oyelaran".to_string()));
        assert_eq!(mixed.text().as_deref(), Some(" Oyelaran"));
    }

    #[test]
    fn test_set_text_replaces_run_and_keeps_children() {
        let mut el = XmlElement::new("p");
        el.children.push(Node::Text("a".to_string()));
        el.children.push(Node::CData("b".to_string()));
        el.children.push(Node::Element(XmlElement::new("br")));
        el.set_text("xyz");
        assert_eq!(el.children.len(), 3);
        assert_eq!(el.text().as_deref(), Some("xyz"));
        assert!(el.children[2].as_element().is_some());

        let mut empty = XmlElement::new("city");
        empty.set_text("Springfield");
        assert_eq!(empty.text().as_deref(), Some("Springfield"));
    }

    #[test]
    fn test_set_text_reaches_text_after_comments_and_elements() {
        let mut name = XmlElement::new("name");
        name.children.push(Node::Comment(" legal ".to_string()));
        name.children.push(Node::Text("Marguerite".to_string()));
        name.children.push(Node::Element(XmlElement::new("suffix")));
        name.children.push(Node::Text(" Oyelaran ".to_string()));
        name.set_text("Isolde Whitlock");

        assert_eq!(name.children.len(), 4);
        assert_eq!(name.text().as_deref(), Some("Isolde Whitlock"));
        assert!(matches!(&name.children[0], Node::Comment(c) if c == " legal "));
        assert!(name.children[2].as_element().is_some());
    }

    #[test]
    fn test_set_text_keeps_blank_runs() {
        let mut name = XmlElement::new("name");
        name.children.push(Node::Text("\n  ".to_string()));
        name.children.push(Node::Element(XmlElement::new("given")));
        name.children.push(Node::Text(" Oyelaran".to_string()));
        name.set_text(" Whitlock");
        assert_eq!(name.text().as_deref(), Some(" Whitlock"));
        assert!(matches!(&name.children[0], Node::Text(t) if t == "\n  "));
    }

    #[test]
    fn test_type_discriminator_and_local_name() {
        let mut el = XmlElement::new("sdtc:raceCode");
        el.attributes.push(("xsi:type".to_string(), "CD".to_string()));
        assert_eq!(el.local_name(), "raceCode");
        assert_eq!(el.type_discriminator(), Some("CD"));
        assert!(!el.set_attribute("code", "x"));
        assert!(el.set_attribute("xsi:type", "CE"));
        assert_eq!(el.attribute("xsi:type"), Some("CE"));
    }
}

//! Opaque structured records captured from XML subtrees
//!
//! Worksheet metadata blocks (views, column definitions, merges, validations,
//! extension lists) and style-sheet entries are kept as `XmlRecord` trees.
//! They are not interpreted further here; later stages can inspect them or
//! write them back verbatim with [`XmlRecord::to_xml`].

use std::fmt::Write;

/// One captured XML element with its attributes, children and text
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct XmlRecord {
    /// Qualified element name as written in the source (`x14:dataValidation`)
    pub name: String,
    /// Attributes in document order, values unescaped
    pub attributes: Vec<(String, String)>,
    /// Child elements in document order
    pub children: Vec<XmlRecord>,
    /// Concatenated text content directly inside this element
    pub text: Option<String>,
}

impl XmlRecord {
    /// Create an empty record
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Builder: add an attribute
    pub fn with_attr<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    /// Builder: add a child element
    pub fn with_child(mut self, child: XmlRecord) -> Self {
        self.children.push(child);
        self
    }

    /// Builder: set text content
    pub fn with_text<S: Into<String>>(mut self, text: S) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Element name without any namespace prefix
    pub fn local_name(&self) -> &str {
        local_part(&self.name)
    }

    /// Look up an attribute by exact name, falling back to its local part
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .or_else(|| self.attributes.iter().find(|(k, _)| local_part(k) == key))
            .map(|(_, v)| v.as_str())
    }

    /// First child with the given local name
    pub fn child(&self, local_name: &str) -> Option<&XmlRecord> {
        self.children.iter().find(|c| c.local_name() == local_name)
    }

    /// All children with the given local name
    pub fn children_named<'a>(
        &'a self,
        local_name: &'a str,
    ) -> impl Iterator<Item = &'a XmlRecord> + 'a {
        self.children
            .iter()
            .filter(move |c| c.local_name() == local_name)
    }

    /// Serialize the subtree back to XML
    pub fn to_xml(&self) -> String {
        let mut out = String::new();
        self.write_xml(&mut out);
        out
    }

    fn write_xml(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for (key, value) in &self.attributes {
            let _ = write!(out, " {}=\"{}\"", key, escape_xml(value, true));
        }

        if self.children.is_empty() && self.text.is_none() {
            out.push_str("/>");
            return;
        }

        out.push('>');
        if let Some(text) = &self.text {
            out.push_str(&escape_xml(text, false));
        }
        for child in &self.children {
            child.write_xml(out);
        }
        let _ = write!(out, "</{}>", self.name);
    }
}

fn local_part(name: &str) -> &str {
    name.rsplit_once(':').map_or(name, |(_, local)| local)
}

fn escape_xml(s: &str, attribute: bool) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

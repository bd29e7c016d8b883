//! Serialization of the arena DOM back to markup.

use std::fmt::Write;

use super::arena::{ArenaDom, NodeData, NodeId};

/// Output flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Well-formed XML; empty elements are self-closed.
    #[default]
    Xml,
    /// HTML; void elements have no end tag, other elements always do.
    Html,
}

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Serialize `node` and its subtree. The document node serializes its children.
pub fn serialize(dom: &ArenaDom, node: NodeId, format: OutputFormat) -> String {
    let mut out = String::new();
    write_node(dom, node, format, &mut out);
    out
}

/// Serialize as XML.
pub fn to_xml(dom: &ArenaDom, node: NodeId) -> String {
    serialize(dom, node, OutputFormat::Xml)
}

/// Serialize as HTML.
pub fn to_html(dom: &ArenaDom, node: NodeId) -> String {
    serialize(dom, node, OutputFormat::Html)
}

fn write_node(dom: &ArenaDom, id: NodeId, format: OutputFormat, out: &mut String) {
    let Some(node) = dom.get(id) else {
        return;
    };

    match &node.data {
        NodeData::Document | NodeData::Fragment => {
            for child in dom.children(id) {
                write_node(dom, child, format, out);
            }
        }
        NodeData::Text(text) => out.push_str(&escape_xml(text)),
        NodeData::Comment(text) => {
            let _ = write!(out, "<!--{text}-->");
        }
        NodeData::Doctype { name, .. } => {
            let _ = writeln!(out, "<!DOCTYPE {name}>");
        }
        NodeData::Element { name, attrs, .. } => {
            let tag = match &name.prefix {
                Some(prefix) => format!("{}:{}", prefix.as_ref(), name.local.as_ref()),
                None => name.local.to_string(),
            };

            out.push('<');
            out.push_str(&tag);
            for attr in attrs {
                out.push(' ');
                if let Some(prefix) = &attr.name.prefix {
                    out.push_str(prefix.as_ref());
                    out.push(':');
                }
                out.push_str(attr.name.local.as_ref());
                out.push_str("=\"");
                out.push_str(&escape_xml(&attr.value));
                out.push('"');
            }

            let has_children = dom.has_children(id);
            match format {
                OutputFormat::Xml if !has_children => {
                    out.push_str("/>");
                    return;
                }
                OutputFormat::Html if VOID_ELEMENTS.contains(&name.local.as_ref()) => {
                    out.push('>');
                    return;
                }
                _ => out.push('>'),
            }

            for child in dom.children(id) {
                write_node(dom, child, format, out);
            }
            let _ = write!(out, "</{tag}>");
        }
    }
}

/// Escape special XML characters in text and attribute values.
pub fn escape_xml(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            _ => result.push(c),
        }
    }
    result
}

//! XML/XHTML parsing into the arena DOM.
//!
//! Templates and assets are usually well-formed XHTML, so they go through
//! quick-xml rather than the lenient HTML tree builder: no implied
//! `<html>`/`<body>` wrappers, namespaces as written, and malformed markup
//! reported instead of repaired.

use html5ever::{LocalName, Namespace, Prefix, QualName, ns};
use quick_xml::Reader;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};

use super::arena::{ArenaDom, Attribute, NodeId};
use crate::error::{Error, Result};

/// Parse a well-formed XML document.
pub fn parse_xml(xml: &str) -> Result<ArenaDom> {
    let mut dom = ArenaDom::new();
    let mut reader = Reader::from_str(xml);

    // (element, default namespace in scope)
    let mut open: Vec<(NodeId, Namespace)> = Vec::new();
    let mut parent = dom.document();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let inherited = open.last().map(|(_, ns)| ns.clone()).unwrap_or(ns!());
                let (element, scope) = create_element(&mut dom, &e, &inherited)?;
                dom.append(parent, element);
                open.push((element, scope));
                parent = element;
            }
            Event::Empty(e) => {
                let inherited = open.last().map(|(_, ns)| ns.clone()).unwrap_or(ns!());
                let (element, _) = create_element(&mut dom, &e, &inherited)?;
                dom.append(parent, element);
            }
            Event::End(_) => {
                open.pop();
                parent = open.last().map(|(id, _)| *id).unwrap_or(dom.document());
            }
            Event::Text(e) => {
                if parent != dom.document() {
                    dom.append_text(parent, &String::from_utf8_lossy(e.as_ref()));
                }
            }
            Event::CData(e) => {
                if parent != dom.document() {
                    dom.append_text(parent, &String::from_utf8_lossy(e.as_ref()));
                }
            }
            Event::GeneralRef(e) => {
                let entity = String::from_utf8_lossy(e.as_ref());
                let resolved = resolve_entity(&entity).ok_or_else(|| {
                    Error::InvalidDocument(format!("unknown entity reference &{entity};"))
                })?;
                dom.append_text(parent, &resolved);
            }
            Event::Comment(e) => {
                let comment = dom.create_comment(String::from_utf8_lossy(e.as_ref()).to_string());
                dom.append(parent, comment);
            }
            Event::DocType(e) => {
                let name = String::from_utf8_lossy(e.as_ref()).trim().to_string();
                let doctype = dom.create_doctype(name, String::new(), String::new());
                dom.append(dom.document(), doctype);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !open.is_empty() {
        return Err(Error::InvalidDocument("unexpected end of document".to_string()));
    }
    if dom.document_element().is_none() {
        return Err(Error::InvalidDocument("document has no root element".to_string()));
    }
    Ok(dom)
}

fn create_element(
    dom: &mut ArenaDom,
    start: &BytesStart<'_>,
    inherited: &Namespace,
) -> Result<(NodeId, Namespace)> {
    let raw_name = String::from_utf8_lossy(start.name().as_ref()).to_string();

    let mut attrs = Vec::new();
    let mut default_ns = inherited.clone();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| Error::InvalidDocument(e.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
        let raw_value = String::from_utf8_lossy(attr.value.as_ref()).to_string();
        let value = unescape(&raw_value)
            .map_err(|e| Error::InvalidDocument(e.to_string()))?
            .into_owned();
        if key == "xmlns" {
            default_ns = Namespace::from(value.as_str());
        }
        attrs.push(Attribute {
            name: split_qual_name(&key, ns!()),
            value,
        });
    }

    let name = split_qual_name(&raw_name, default_ns.clone());
    Ok((dom.create_element(name, attrs), default_ns))
}

/// Split `prefix:local` and attach the namespace for unprefixed names.
fn split_qual_name(raw: &str, ns: Namespace) -> QualName {
    match raw.split_once(':') {
        Some((prefix, local)) => {
            QualName::new(Some(Prefix::from(prefix)), ns!(), LocalName::from(local))
        }
        None => QualName::new(None, ns, LocalName::from(raw)),
    }
}

/// Resolve XML entity references.
fn resolve_entity(entity: &str) -> Option<String> {
    match entity {
        "apos" => return Some("'".to_string()),
        "quot" => return Some("\"".to_string()),
        "lt" => return Some("<".to_string()),
        "gt" => return Some(">".to_string()),
        "amp" => return Some("&".to_string()),
        "nbsp" => return Some("\u{00A0}".to_string()),
        _ => {}
    }

    if let Some(hex) = entity.strip_prefix("#x") {
        if let Ok(code) = u32::from_str_radix(hex, 16)
            && let Some(c) = char::from_u32(code)
        {
            return Some(c.to_string());
        }
    } else if let Some(dec) = entity.strip_prefix('#')
        && let Ok(code) = dec.parse::<u32>()
        && let Some(c) = char::from_u32(code)
    {
        return Some(c.to_string());
    }

    None
}

//! Mutable document tree.
//!
//! The tree is an arena of nodes linked by [`NodeId`]s. Two loaders fill it:
//! [`parse_html`] (html5ever, lenient) and [`parse_xml`] (quick-xml, strict).
//! [`SnapshotList`] is the traversal primitive the renderers use to walk a
//! tree while rewriting it.
//!
//! # Example
//!
//! ```
//! use stencil::dom::{parse_xml, to_xml};
//!
//! let mut dom = parse_xml("<ul><li>one</li></ul>").unwrap();
//! let li = dom.find_by_tag("li").unwrap();
//! dom.set_text_content(li, "two");
//! assert_eq!(to_xml(&dom, dom.document()), "<ul><li>two</li></ul>");
//! ```

mod arena;
mod serialize;
mod snapshot;
mod tree_sink;
mod xml;

pub use arena::{ArenaDom, Attribute, ChildrenIter, Node, NodeData, NodeId};
pub use serialize::{OutputFormat, escape_xml, serialize, to_html, to_xml};
pub use snapshot::SnapshotList;
pub use xml::parse_xml;

use html5ever::driver::ParseOpts;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;

use tree_sink::ArenaSink;

/// Parse HTML leniently, the way a browser would.
pub fn parse_html(html: &str) -> ArenaDom {
    let sink = ArenaSink::new();
    let result = parse_document(sink, ParseOpts::default())
        .from_utf8()
        .one(html.as_bytes());
    result.into_dom()
}

/// Decode raw bytes and parse them as XML.
///
/// Honours a declared `<?xml encoding="..."?>` when the bytes are not UTF-8.
pub fn parse_xml_bytes(bytes: &[u8]) -> crate::Result<ArenaDom> {
    let hint_encoding = crate::util::extract_xml_encoding(bytes);
    let text = crate::util::decode_text(bytes, hint_encoding);
    parse_xml(&text)
}

//! Loading snippets from asset files.

use std::path::Path;

use html5ever::ns;
use log::debug;

use super::{SimpleSnippet, Snippet};
use crate::dom::{ArenaDom, NodeId, parse_xml_bytes};
use crate::error::{Error, Result};
use crate::util::read_file;

/// Namespace of `<asset>` wrapper documents.
pub const ASSET_NAMESPACE: &str = "https://templado.io/assets/1.0";

/// Reads asset files into [`SimpleSnippet`]s.
///
/// Two document shapes are accepted:
///
/// - an `<asset id="..." xmlns="https://templado.io/assets/1.0">` wrapper,
///   whose children become the content, targeted at the wrapper's `id`
/// - an (X)HTML or namespace-less element, used as the content itself and
///   targeted at its `id`, or at the file stem when it has none
///
/// Whitespace-only text between elements is dropped.
#[derive(Debug, Default, Clone, Copy)]
pub struct AssetLoader;

impl AssetLoader {
    pub fn new() -> Self {
        Self
    }

    pub fn load(&self, path: impl AsRef<Path>) -> Result<SimpleSnippet> {
        let path = path.as_ref();
        let bytes = read_file(path)?;

        let mut dom = parse_xml_bytes(&bytes)?;
        let root = dom
            .document_element()
            .ok_or_else(|| Error::InvalidAsset(path.display().to_string()))?;
        strip_whitespace(&mut dom, root);

        let snippet = if is_asset_document(&dom, root) {
            let id = dom.get_attr(root, "id").unwrap_or_default().to_string();
            let fragment = dom.create_fragment();
            for child in dom.child_ids(root) {
                dom.append(fragment, child);
            }
            SimpleSnippet::new(id, dom, fragment)
        } else if is_html_element(&dom, root) {
            let id = match dom.get_attr(root, "id") {
                Some(id) if !id.is_empty() => id.to_string(),
                _ => file_stem(path),
            };
            SimpleSnippet::new(id, dom, root)
        } else {
            return Err(Error::InvalidAsset(path.display().to_string()));
        };

        debug!("Loaded asset {} for #{}", path.display(), snippet.target_id());
        Ok(snippet)
    }
}

fn is_asset_document(dom: &ArenaDom, root: NodeId) -> bool {
    dom.element_namespace(root).is_some_and(|ns| &**ns == ASSET_NAMESPACE)
        && dom.element_name(root).is_some_and(|name| &**name == "asset")
        && dom.has_children(root)
}

fn is_html_element(dom: &ArenaDom, root: NodeId) -> bool {
    dom.element_namespace(root)
        .is_some_and(|ns| *ns == ns!(html) || *ns == ns!())
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Drop whitespace-only text nodes below `node`.
fn strip_whitespace(dom: &mut ArenaDom, node: NodeId) {
    for child in dom.child_ids(node) {
        match dom.text(child).map(|text| text.trim().is_empty()) {
            Some(true) => dom.detach(child),
            Some(false) => {}
            None => strip_whitespace(dom, child),
        }
    }
}

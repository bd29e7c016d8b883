//! A template document and the renderers that can be applied to it.

use std::path::Path;

use crate::csrf::{CsrfProtection, CsrfProtectionRenderer};
use crate::dom::{self, ArenaDom, NodeId, OutputFormat};
use crate::error::{Error, Result};
use crate::formdata::{FormData, FormDataRenderer};
use crate::snippet::{SnippetCollection, SnippetRenderer};
use crate::transformation::{Transformation, TransformationProcessor};
use crate::util::{decode_text, read_file};
use crate::viewmodel::{Value, ViewModelRenderer};

/// An owned tree with convenience methods for each renderer.
///
/// Renderers run against the document element, in whatever order the caller
/// applies them. Each call mutates the tree once; nothing is cached.
///
/// ```
/// use stencil::{Document, Record, SnippetCollection, TextSnippet};
///
/// let mut doc = Document::parse_xml(r#"<html><h1 property="title"/><p id="intro"/></html>"#)?;
/// doc.apply_view_model(Record::new().field("title", "Welcome").into())?;
///
/// let mut snippets = SnippetCollection::new();
/// snippets.add(TextSnippet::new("intro", "Hello"));
/// doc.apply_snippets(&snippets)?;
///
/// assert_eq!(
///     doc.to_xml_string(),
///     r#"<html><h1 property="title">Welcome</h1><p id="intro">Hello</p></html>"#
/// );
/// # Ok::<(), stencil::Error>(())
/// ```
pub struct Document {
    dom: ArenaDom,
}

impl Document {
    pub fn from_dom(dom: ArenaDom) -> Result<Self> {
        if dom.document_element().is_none() {
            return Err(Error::InvalidDocument(
                "document has no root element".to_string(),
            ));
        }
        Ok(Self { dom })
    }

    pub fn parse_xml(xml: &str) -> Result<Self> {
        Self::from_dom(dom::parse_xml(xml)?)
    }

    pub fn parse_html(html: &str) -> Result<Self> {
        Self::from_dom(dom::parse_html(html))
    }

    /// Load a file; `.html`/`.htm` go through the HTML parser, anything
    /// else must be well-formed XML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = read_file(path)?;
        let is_html = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("html") || ext.eq_ignore_ascii_case("htm"));

        if is_html {
            Self::parse_html(&decode_text(&bytes, None))
        } else {
            Self::from_dom(dom::parse_xml_bytes(&bytes)?)
        }
    }

    pub fn dom(&self) -> &ArenaDom {
        &self.dom
    }

    pub fn dom_mut(&mut self) -> &mut ArenaDom {
        &mut self.dom
    }

    /// The current document element. Snippets may replace it.
    pub fn root(&self) -> Result<NodeId> {
        self.dom
            .document_element()
            .ok_or_else(|| Error::InvalidDocument("document has no root element".to_string()))
    }

    pub fn apply_view_model(&mut self, model: Value) -> Result<()> {
        let root = self.root()?;
        ViewModelRenderer::new().render(&mut self.dom, root, model)
    }

    pub fn apply_snippets(&mut self, snippets: &SnippetCollection) -> Result<()> {
        let root = self.root()?;
        SnippetRenderer::new(snippets).render(&mut self.dom, root)
    }

    pub fn apply_form_data(&mut self, form: &FormData) -> Result<()> {
        let root = self.root()?;
        FormDataRenderer::new().render(&mut self.dom, root, form)
    }

    pub fn apply_csrf_protection(&mut self, protection: &CsrfProtection) -> Result<()> {
        let root = self.root()?;
        CsrfProtectionRenderer::new().render(&mut self.dom, root, protection)
    }

    pub fn apply_transformation(&mut self, transformation: &dyn Transformation) -> Result<()> {
        let root = self.root()?;
        TransformationProcessor::new().process(&mut self.dom, root, transformation)
    }

    pub fn serialize(&self, format: OutputFormat) -> String {
        dom::serialize(&self.dom, self.dom.document(), format)
    }

    pub fn to_xml_string(&self) -> String {
        self.serialize(OutputFormat::Xml)
    }

    pub fn to_html_string(&self) -> String {
        self.serialize(OutputFormat::Html)
    }
}

//! Filling forms with submitted values.

use std::collections::HashMap;

use log::{debug, trace};

use crate::dom::{ArenaDom, NodeId};
use crate::error::{Error, Result};
use crate::select::{Selector, attribute_equals_css};

/// Values for one form, keyed by field name.
///
/// With the `json` feature it deserializes from
/// `{"identifier": "...", "values": {"field": "value"}}`.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "json", derive(serde::Deserialize))]
pub struct FormData {
    identifier: String,
    values: HashMap<String, String>,
}

impl FormData {
    /// `identifier` is matched against the form's `id` or `name`.
    pub fn new<K, V>(identifier: impl Into<String>, values: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            identifier: identifier.into(),
            values: values
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn has_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn value(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

/// Writes [`FormData`] into the matching form.
///
/// File and password inputs are never filled. Radio buttons and checkboxes
/// are checked when their `value` equals the submitted one; `select`s mark
/// the matching `option`s as selected.
#[derive(Debug, Default, Clone, Copy)]
pub struct FormDataRenderer;

impl FormDataRenderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, dom: &mut ArenaDom, context: NodeId, form: &FormData) -> Result<()> {
        let form_element = find_form(dom, context, form.identifier())?;
        debug!("Filling form '{}'", form.identifier());

        for input in Selector::parse("input")?.select(dom, form_element) {
            if let Some(value) = field_value(dom, input, form) {
                set_input_value(dom, input, &value);
            }
        }

        let options = Selector::parse("option")?;
        for select in Selector::parse("select")?.select(dom, form_element) {
            if let Some(value) = field_value(dom, select, form) {
                for option in options.select(dom, select) {
                    toggle(dom, option, "selected", &value);
                }
            }
        }

        for textarea in Selector::parse("textarea")?.select(dom, form_element) {
            if let Some(value) = field_value(dom, textarea, form) {
                // Always one text child, so an empty value keeps the end tag
                dom.remove_children(textarea);
                let text = dom.create_text(value);
                dom.append(textarea, text);
            }
        }
        Ok(())
    }
}

fn find_form(dom: &ArenaDom, context: NodeId, identifier: &str) -> Result<NodeId> {
    let css = format!(
        "form{}, form{}",
        attribute_equals_css("id", identifier),
        attribute_equals_css("name", identifier)
    );
    let found = Selector::parse(&css)?.select(dom, context);
    match found.as_slice() {
        [form] => Ok(*form),
        [] => Err(Error::FormData(format!(
            "No form with name or id \"{identifier}\" found"
        ))),
        _ => Err(Error::FormData(format!(
            "Multiple forms found with name or id \"{identifier}\""
        ))),
    }
}

fn field_value(dom: &ArenaDom, field: NodeId, form: &FormData) -> Option<String> {
    let name = dom.get_attr(field, "name")?;
    form.value(name).map(str::to_string)
}

fn set_input_value(dom: &mut ArenaDom, input: NodeId, value: &str) {
    let kind = dom.get_attr(input, "type").unwrap_or_default().to_string();
    match kind.as_str() {
        "file" | "password" => {}
        "radio" | "checkbox" => toggle(dom, input, "checked", value),
        _ => {
            trace!(
                "Setting value of input '{}'",
                dom.get_attr(input, "name").unwrap_or_default()
            );
            dom.set_attr(input, "value", value);
        }
    }
}

/// Set `flag="flag"` when the element's `value` equals `value`, else remove it.
fn toggle(dom: &mut ArenaDom, element: NodeId, flag: &str, value: &str) {
    if dom.get_attr(element, "value") == Some(value) {
        dom.set_attr(element, flag, flag);
    } else {
        dom.remove_attr(element, flag);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{parse_xml, to_xml};

    const FORM: &str = concat!(
        r#"<body><form id="login">"#,
        r#"<input name="user" value=""/>"#,
        r#"<input type="password" name="pass"/>"#,
        r#"<input type="radio" name="mode" value="a" checked="checked"/>"#,
        r#"<input type="radio" name="mode" value="b"/>"#,
        r#"<select name="lang"><option value="en" selected="selected"/><option value="de"/></select>"#,
        r#"<textarea name="note">old</textarea>"#,
        r#"</form></body>"#
    );

    #[test]
    fn test_fills_fields() {
        let mut dom = parse_xml(FORM).unwrap();
        let root = dom.document_element().unwrap();
        let data = FormData::new(
            "login",
            [("user", "jane"), ("pass", "secret"), ("mode", "b"), ("lang", "de"), ("note", "new")],
        );

        FormDataRenderer::new().render(&mut dom, root, &data).unwrap();

        let expected = concat!(
            r#"<body><form id="login">"#,
            r#"<input name="user" value="jane"/>"#,
            r#"<input type="password" name="pass"/>"#,
            r#"<input type="radio" name="mode" value="a"/>"#,
            r#"<input type="radio" name="mode" value="b" checked="checked"/>"#,
            r#"<select name="lang"><option value="en"/><option value="de" selected="selected"/></select>"#,
            r#"<textarea name="note">new</textarea>"#,
            r#"</form></body>"#
        );
        assert_eq!(to_xml(&dom, dom.document()), expected);
    }

    #[test]
    fn test_empty_textarea_value_keeps_end_tag() {
        let mut dom =
            parse_xml(r#"<body><form id="f"><textarea name="note">old</textarea></form></body>"#)
                .unwrap();
        let root = dom.document_element().unwrap();

        FormDataRenderer::new()
            .render(&mut dom, root, &FormData::new("f", [("note", "")]))
            .unwrap();

        assert_eq!(
            to_xml(&dom, dom.document()),
            r#"<body><form id="f"><textarea name="note"></textarea></form></body>"#
        );
    }

    #[test]
    fn test_form_found_by_name() {
        let mut dom = parse_xml(r#"<body><form name="f"><input name="q"/></form></body>"#).unwrap();
        let root = dom.document_element().unwrap();

        FormDataRenderer::new()
            .render(&mut dom, root, &FormData::new("f", [("q", "x")]))
            .unwrap();

        assert_eq!(
            to_xml(&dom, dom.document()),
            r#"<body><form name="f"><input name="q" value="x"/></form></body>"#
        );
    }

    #[test]
    fn test_missing_and_ambiguous_forms() {
        let mut dom = parse_xml(r#"<body><form id="a"/><form name="a"/></body>"#).unwrap();
        let root = dom.document_element().unwrap();
        let renderer = FormDataRenderer::new();

        let err = renderer
            .render(&mut dom, root, &FormData::new("a", Vec::<(String, String)>::new()))
            .unwrap_err();
        assert!(matches!(err, Error::FormData(ref m) if m.contains("Multiple")));

        let err = renderer
            .render(&mut dom, root, &FormData::new("b", Vec::<(String, String)>::new()))
            .unwrap_err();
        assert!(matches!(err, Error::FormData(ref m) if m.contains("No form")));
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_deserialize() {
        let data: FormData =
            serde_json::from_str(r#"{"identifier": "login", "values": {"user": "jane"}}"#)
                .unwrap();
        assert_eq!(data.identifier(), "login");
        assert!(data.has_key("user"));
        assert_eq!(data.value("user"), Some("jane"));
    }
}

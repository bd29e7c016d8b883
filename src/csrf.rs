//! CSRF token injection into forms.

use log::debug;

use crate::dom::{ArenaDom, NodeId};
use crate::error::Result;
use crate::select::{Selector, attribute_equals_css};

/// Name and value of the hidden CSRF field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsrfProtection {
    field_name: String,
    token_value: String,
}

impl CsrfProtection {
    pub fn new(field_name: impl Into<String>, token_value: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            token_value: token_value.into(),
        }
    }

    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    pub fn token_value(&self) -> &str {
        &self.token_value
    }
}

/// Puts the token into every form below the context.
///
/// An existing `input` with the field name gets the token as its value;
/// forms without one get a hidden input as their first child.
#[derive(Debug, Default, Clone, Copy)]
pub struct CsrfProtectionRenderer;

impl CsrfProtectionRenderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(
        &self,
        dom: &mut ArenaDom,
        context: NodeId,
        protection: &CsrfProtection,
    ) -> Result<()> {
        let forms = Selector::parse("form")?.select(dom, context);
        let field = Selector::parse(&format!(
            "input{}",
            attribute_equals_css("name", protection.field_name())
        ))?;
        debug!(
            "Adding CSRF field '{}' to {} form(s)",
            protection.field_name(),
            forms.len()
        );

        for form in forms {
            let existing = field.select(dom, form);
            if existing.is_empty() {
                let input = dom.create_element_like(form, "input");
                dom.set_attr(input, "type", "hidden");
                dom.set_attr(input, "name", protection.field_name());
                dom.set_attr(input, "value", protection.token_value());
                match dom.first_child(form) {
                    Some(first) => dom.insert_before(first, input),
                    None => dom.append(form, input),
                }
                continue;
            }
            for input in existing {
                dom.set_attr(input, "value", protection.token_value());
            }
        }
        Ok(())
    }
}

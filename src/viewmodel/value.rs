//! Values bound to markup by the view-model renderer.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// A value produced by a view model for one binding.
///
/// The renderer dispatches on this shape: flags keep or remove elements,
/// text replaces content, models bind attributes and nested properties,
/// sequences repeat the element.
#[derive(Clone)]
pub enum Value {
    Flag(bool),
    Text(String),
    Model(Rc<dyn ViewModel>),
    Sequence(Rc<dyn ModelSequence>),
    Number(f64),
    Null,
}

impl Value {
    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    pub fn model(model: impl ViewModel + 'static) -> Self {
        Value::Model(Rc::new(model))
    }

    pub fn sequence(entries: impl IntoIterator<Item = Value>) -> Self {
        Value::Sequence(Rc::new(entries.into_iter().collect::<Vec<_>>()))
    }

    /// Short name of the shape, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Flag(_) => "boolean",
            Value::Text(_) => "string",
            Value::Model(_) => "object",
            Value::Sequence(_) => "sequence",
            Value::Number(_) => "number",
            Value::Null => "null",
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Flag(b) => write!(f, "Flag({b})"),
            Value::Text(s) => write!(f, "Text({s:?})"),
            Value::Model(m) => match m.type_of() {
                Some(tag) => write!(f, "Model({tag})"),
                None => f.write_str("Model"),
            },
            Value::Sequence(s) => match s.count() {
                Some(n) => write!(f, "Sequence({n})"),
                None => f.write_str("Sequence(?)"),
            },
            Value::Number(n) => write!(f, "Number({n})"),
            Value::Null => f.write_str("Null"),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Flag(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl From<Vec<Value>> for Value {
    fn from(entries: Vec<Value>) -> Self {
        Value::Sequence(Rc::new(entries))
    }
}

/// A structured model bound by a `property` attribute.
///
/// Lookups for a property `p` try, in order: `invoke("p")`,
/// `invoke("getP")`, then `invoke_dynamic("p")`. Each receives the node's
/// current text content (or attribute value) as its only argument.
pub trait ViewModel {
    /// Call the operation named `name`; `None` when the model has none.
    fn invoke(&self, name: &str, current: &str) -> Option<Value>;

    /// Catch-all handler tried after the named operations.
    fn invoke_dynamic(&self, _name: &str, _current: &str) -> Option<Value> {
        None
    }

    /// Declared type tag, matched against `typeof` attributes.
    fn type_of(&self) -> Option<String> {
        None
    }
}

/// A sequence of values bound by a `property` attribute.
pub trait ModelSequence {
    /// Number of entries; `None` if the sequence cannot tell up front.
    fn count(&self) -> Option<usize>;

    fn entries(&self) -> Box<dyn Iterator<Item = Value> + '_>;
}

impl ModelSequence for Vec<Value> {
    fn count(&self) -> Option<usize> {
        Some(self.len())
    }

    fn entries(&self) -> Box<dyn Iterator<Item = Value> + '_> {
        Box::new(self.iter().cloned())
    }
}

/// Sequence backed by a producer that cannot report its length.
pub struct UncountedSequence<F>(pub F);

impl<F, I> ModelSequence for UncountedSequence<F>
where
    F: Fn() -> I,
    I: Iterator<Item = Value> + 'static,
{
    fn count(&self) -> Option<usize> {
        None
    }

    fn entries(&self) -> Box<dyn Iterator<Item = Value> + '_> {
        Box::new((self.0)())
    }
}

type Operation = Rc<dyn Fn(&str) -> Value>;
type DynamicOperation = Rc<dyn Fn(&str, &str) -> Value>;

/// A view model assembled in code.
///
/// ```
/// use stencil::viewmodel::{Record, Value};
///
/// let user = Record::new()
///     .field("name", "Jane")
///     .operation("greeting", |current| Value::text(format!("{current}, Jane")))
///     .type_tag("user");
/// # let _ = Value::model(user);
/// ```
#[derive(Clone, Default)]
pub struct Record {
    operations: HashMap<String, Operation>,
    dynamic: Option<DynamicOperation>,
    type_tag: Option<String>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Operation that returns a fixed value.
    pub fn field(self, name: &str, value: impl Into<Value>) -> Self {
        let value = value.into();
        self.operation(name, move |_| value.clone())
    }

    /// Operation computed from the node's current text or attribute value.
    pub fn operation(mut self, name: &str, op: impl Fn(&str) -> Value + 'static) -> Self {
        self.operations.insert(name.to_string(), Rc::new(op));
        self
    }

    /// Catch-all handler receiving `(name, current)`.
    pub fn dynamic(mut self, op: impl Fn(&str, &str) -> Value + 'static) -> Self {
        self.dynamic = Some(Rc::new(op));
        self
    }

    pub fn type_tag(mut self, tag: &str) -> Self {
        self.type_tag = Some(tag.to_string());
        self
    }
}

impl ViewModel for Record {
    fn invoke(&self, name: &str, current: &str) -> Option<Value> {
        self.operations.get(name).map(|op| op(current))
    }

    fn invoke_dynamic(&self, name: &str, current: &str) -> Option<Value> {
        self.dynamic.as_ref().map(|op| op(name, current))
    }

    fn type_of(&self) -> Option<String> {
        self.type_tag.clone()
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::model(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_operations() {
        let record = Record::new()
            .field("title", "Hello")
            .operation("echo", |current| Value::text(current.to_uppercase()));

        assert!(matches!(record.invoke("title", ""), Some(Value::Text(t)) if t == "Hello"));
        assert!(matches!(record.invoke("echo", "abc"), Some(Value::Text(t)) if t == "ABC"));
        assert!(record.invoke("missing", "").is_none());
        assert!(record.invoke_dynamic("missing", "").is_none());
    }

    #[test]
    fn test_record_dynamic_handler() {
        let record = Record::new().dynamic(|name, _| Value::text(format!("dyn:{name}")));
        assert!(
            matches!(record.invoke_dynamic("anything", ""), Some(Value::Text(t)) if t == "dyn:anything")
        );
    }

    #[test]
    fn test_sequence_counts() {
        let seq: Vec<Value> = vec!["a".into(), "b".into()];
        assert_eq!(seq.count(), Some(2));
        assert_eq!(seq.entries().count(), 2);

        let uncounted = UncountedSequence(|| vec![Value::Null].into_iter());
        assert_eq!(uncounted.count(), None);
        assert_eq!(uncounted.entries().count(), 1);
    }

    #[test]
    fn test_value_conversions() {
        assert_eq!(Value::from(true).kind(), "boolean");
        assert_eq!(Value::from(Some("x")).kind(), "string");
        assert_eq!(Value::from(None::<String>).kind(), "null");
        assert_eq!(Value::from(vec![Value::Null]).kind(), "sequence");
        assert_eq!(Value::from(Record::new()).kind(), "object");
    }
}

//! Static field-descriptor tables and the walk that applies them.
//!
//! A type opts into mapping by implementing [`IniSchema`]. Its schema is an
//! ordered list of [`Field`]s, each bound to an item key, a section, or
//! nothing. Accessors are plain function pointers, so non-capturing closures
//! can be written inline:
//!
//! ```
//! use inimap::mapper::{Field, IniSchema, Schema};
//!
//! #[derive(Debug, Default)]
//! struct Window {
//!     title: String,
//!     width: u32,
//! }
//!
//! impl IniSchema for Window {
//!     fn schema() -> Schema<Self> {
//!         Schema::new()
//!             .field(Field::scalar("title", "Title", |w: &Self| w.title.clone(), |w, v| w.title = v))
//!             .field(Field::scalar("width", "Width", |w: &Self| w.width, |w, v| w.width = v))
//!     }
//! }
//!
//! assert_eq!(Window::schema().fields().len(), 2);
//! ```
use std::cell::OnceCell;
use std::fmt;

use indexmap::IndexMap;

use super::diagnostics::{Diagnostic, Direction, DiagnosticsSink};
use super::scalar::{Scalar, ScalarKind, ScalarType};
use crate::catalog::{self, Section};
use crate::document::Document;
use crate::error::{IniError, Result};
use crate::parser::{self, Line};
use crate::quote;

/// String-to-string mapping stored with the indexed-key convention.
pub type IndexedMap = IndexMap<String, String>;

/// A type with a mapper schema.
pub trait IniSchema: Default + Sized + 'static {
    /// Build the field table for this type.
    fn schema() -> Schema<Self>;
}

/// What a field is bound to in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    /// An item key in the enclosing section.
    Key(&'static str),
    /// A whole section holding a nested value.
    Section(&'static str),
    /// Not mapped.
    Ignore,
}

/// Shape of a bound field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A single item.
    Scalar(ScalarKind),
    /// A run of `KEY.0`, `KEY.1`, … items.
    Map,
    /// A nested value stored in its own section.
    Nested,
}

type Getter<T> = Box<dyn Fn(&T) -> Scalar>;
type Setter<T> = Box<dyn Fn(&mut T, Scalar)>;

enum Slot<T> {
    Scalar {
        key: &'static str,
        kind: ScalarKind,
        get: Option<Getter<T>>,
        set: Option<Setter<T>>,
    },
    Map {
        key: &'static str,
        get: Option<fn(&T) -> &IndexedMap>,
        set: Option<fn(&mut T, IndexedMap)>,
    },
    Section {
        section: &'static str,
        nested: Box<dyn NestedAccess<T>>,
    },
    Ignore,
}

/// One entry of a [`Schema`].
pub struct Field<T> {
    name: &'static str,
    slot: Slot<T>,
}

impl<T: 'static> Field<T> {
    /// A scalar field with both accessors.
    #[must_use]
    pub fn scalar<V: ScalarType>(
        name: &'static str,
        key: &'static str,
        get: fn(&T) -> V,
        set: fn(&mut T, V),
    ) -> Self {
        Self::scalar_with(name, key, Some(get), Some(set))
    }

    /// A scalar field that is written but never read back.
    ///
    /// It is only serialized when read-only serialization is enabled.
    #[must_use]
    pub fn read_only<V: ScalarType>(name: &'static str, key: &'static str, get: fn(&T) -> V) -> Self {
        Self::scalar_with(name, key, Some(get), None)
    }

    /// A scalar field that is read but never written.
    #[must_use]
    pub fn write_only<V: ScalarType>(
        name: &'static str,
        key: &'static str,
        set: fn(&mut T, V),
    ) -> Self {
        Self::scalar_with(name, key, None, Some(set))
    }

    fn scalar_with<V: ScalarType>(
        name: &'static str,
        key: &'static str,
        get: Option<fn(&T) -> V>,
        set: Option<fn(&mut T, V)>,
    ) -> Self {
        let get = get.map(|get| -> Getter<T> { Box::new(move |value: &T| get(value).into_scalar()) });
        let set = set.map(|set| -> Setter<T> {
            Box::new(move |value: &mut T, scalar: Scalar| {
                if let Some(v) = V::from_scalar(scalar) {
                    set(value, v);
                }
            })
        });
        Self {
            name,
            slot: Slot::Scalar {
                key,
                kind: V::KIND,
                get,
                set,
            },
        }
    }

    /// A string map stored as `KEY.0`, `KEY.1`, … items.
    ///
    /// Map keys are written verbatim as item keys, so they should already
    /// carry the index suffix.
    #[must_use]
    pub fn map(
        name: &'static str,
        key: &'static str,
        get: fn(&T) -> &IndexedMap,
        set: fn(&mut T, IndexedMap),
    ) -> Self {
        Self {
            name,
            slot: Slot::Map {
                key,
                get: Some(get),
                set: Some(set),
            },
        }
    }

    /// A nested value stored in its own section.
    ///
    /// The nested type may not declare section fields of its own.
    #[must_use]
    pub fn section<U: IniSchema>(
        name: &'static str,
        section: &'static str,
        get: fn(&T) -> &U,
        get_mut: fn(&mut T) -> &mut U,
    ) -> Self {
        Self {
            name,
            slot: Slot::Section {
                section,
                nested: Box::new(Nested {
                    get,
                    get_mut,
                    schema: OnceCell::new(),
                }),
            },
        }
    }

    /// A field that is never mapped.
    #[must_use]
    pub const fn ignore(name: &'static str) -> Self {
        Self {
            name,
            slot: Slot::Ignore,
        }
    }
}

impl<T> Field<T> {
    /// Field name as declared.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Where the field lives in the document.
    #[must_use]
    pub const fn binding(&self) -> Binding {
        match &self.slot {
            Slot::Scalar { key, .. } | Slot::Map { key, .. } => Binding::Key(*key),
            Slot::Section { section, .. } => Binding::Section(*section),
            Slot::Ignore => Binding::Ignore,
        }
    }

    /// Shape of the field, or `None` for ignored fields.
    #[must_use]
    pub const fn kind(&self) -> Option<FieldKind> {
        match &self.slot {
            Slot::Scalar { kind, .. } => Some(FieldKind::Scalar(*kind)),
            Slot::Map { .. } => Some(FieldKind::Map),
            Slot::Section { .. } => Some(FieldKind::Nested),
            Slot::Ignore => None,
        }
    }

    /// `true` if the field can be read from a value.
    #[must_use]
    pub const fn has_getter(&self) -> bool {
        match &self.slot {
            Slot::Scalar { get, .. } => get.is_some(),
            Slot::Map { get, .. } => get.is_some(),
            Slot::Section { .. } => true,
            Slot::Ignore => false,
        }
    }

    /// `true` if the field can be assigned on a value.
    #[must_use]
    pub const fn has_setter(&self) -> bool {
        match &self.slot {
            Slot::Scalar { set, .. } => set.is_some(),
            Slot::Map { set, .. } => set.is_some(),
            Slot::Section { .. } => true,
            Slot::Ignore => false,
        }
    }
}

impl<T> fmt::Debug for Field<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("binding", &self.binding())
            .field("kind", &self.kind())
            .finish()
    }
}

/// Ordered field table plus document-level flags.
pub struct Schema<T> {
    fields: Vec<Field<T>>,
    handle_quoted_values: bool,
    serialize_read_only: bool,
}

impl<T> Default for Schema<T> {
    fn default() -> Self {
        Self {
            fields: Vec::new(),
            handle_quoted_values: false,
            serialize_read_only: false,
        }
    }
}

impl<T> fmt::Debug for Schema<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("fields", &self.fields)
            .field("handle_quoted_values", &self.handle_quoted_values)
            .field("serialize_read_only", &self.serialize_read_only)
            .finish()
    }
}

impl<T: 'static> Schema<T> {
    /// Create an empty schema with both flags off.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field.
    #[must_use]
    pub fn field(mut self, field: Field<T>) -> Self {
        self.fields.push(field);
        self
    }

    /// Quote every text value on write.
    ///
    /// Without it, text is quoted only when it holds a `;`, opens with a `"`,
    /// or has surrounding whitespace. Reads always strip one pair of quotes.
    #[must_use]
    pub const fn handle_quoted_values(mut self, on: bool) -> Self {
        self.handle_quoted_values = on;
        self
    }

    /// Also serialize fields that have a getter but no setter.
    #[must_use]
    pub const fn serialize_read_only(mut self, on: bool) -> Self {
        self.serialize_read_only = on;
        self
    }

    /// Fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[Field<T>] {
        &self.fields
    }

    /// Whether quote handling is declared on.
    #[must_use]
    pub const fn quotes_handled(&self) -> bool {
        self.handle_quoted_values
    }

    /// Whether read-only serialization is declared on.
    #[must_use]
    pub const fn read_only_serialized(&self) -> bool {
        self.serialize_read_only
    }

    /// Check the structural rules of the table.
    ///
    /// # Errors
    ///
    /// Returns [`IniError::SchemaViolation`] when a key or section name is
    /// empty, or when a nested type declares a section field itself.
    pub fn validate(&self) -> Result<()> {
        self.validate_at(0)
    }

    fn validate_at(&self, depth: usize) -> Result<()> {
        let type_name = short_type_name::<T>();
        for field in &self.fields {
            let violation = |reason: String| IniError::SchemaViolation {
                type_name,
                field: field.name,
                reason,
            };
            match &field.slot {
                Slot::Scalar { key, .. } | Slot::Map { key, .. } if key.trim().is_empty() => {
                    return Err(violation("empty item key".to_string()));
                }
                Slot::Scalar { key, .. } | Slot::Map { key, .. }
                    if !catalog::is_writable_key(key.trim()) =>
                {
                    return Err(violation(format!(
                        "item key '{key}' cannot contain '=' or ';' or start with '['"
                    )));
                }
                Slot::Section { section, nested } => {
                    if depth > 0 {
                        return Err(violation(format!(
                            "section '{section}' is nested inside another section; \
                             sections may only nest one level"
                        )));
                    }
                    if section.trim().is_empty() {
                        return Err(violation("empty section name".to_string()));
                    }
                    if !catalog::is_writable_section(section) {
                        return Err(violation(format!(
                            "section name '{section}' cannot contain ']' or a line break"
                        )));
                    }
                    nested.validate()?;
                }
                Slot::Scalar { .. } | Slot::Map { .. } | Slot::Ignore => {}
            }
        }
        Ok(())
    }

    pub(crate) fn write(&self, value: &T, section: &str, doc: &mut Document, cx: &Pass<'_>) {
        let type_name = short_type_name::<T>();
        for field in &self.fields {
            let skip = || {
                cx.sink.report(Diagnostic::FieldSkipped {
                    type_name,
                    field: field.name,
                    direction: Direction::Serialize,
                });
            };
            if !field.has_setter() && !cx.serialize_read_only && field.has_getter() {
                skip();
                continue;
            }
            match &field.slot {
                Slot::Scalar { key, get, .. } => {
                    let Some(get) = get else {
                        skip();
                        continue;
                    };
                    let rendered = match get(value) {
                        Scalar::Text(text) => render_text(&text, cx.handle_quoted_values),
                        scalar => Some(scalar.encode()),
                    };
                    if !rendered.is_some_and(|text| doc.set_value(section, key, &text)) {
                        cx.not_written(type_name, field.name, key);
                    }
                }
                Slot::Map { get, .. } => {
                    let Some(get) = get else {
                        skip();
                        continue;
                    };
                    for (entry_key, entry_value) in get(value) {
                        let rendered = render_text(entry_value, cx.handle_quoted_values);
                        if !rendered.is_some_and(|text| doc.set_value(section, entry_key, &text)) {
                            cx.not_written(type_name, field.name, entry_key);
                        }
                    }
                }
                Slot::Section {
                    section: name,
                    nested,
                } => nested.write(value, name, doc, cx),
                Slot::Ignore => {}
            }
        }
    }

    pub(crate) fn read(&self, value: &mut T, section: &str, doc: &Document, cx: &Pass<'_>) {
        let type_name = short_type_name::<T>();
        let items = doc.get_section(section).map(Section::items);
        for field in &self.fields {
            if !field.has_setter() && field.kind().is_some() {
                cx.sink.report(Diagnostic::FieldSkipped {
                    type_name,
                    field: field.name,
                    direction: Direction::Deserialize,
                });
                continue;
            }
            match &field.slot {
                Slot::Scalar {
                    key,
                    kind,
                    set: Some(set),
                    ..
                } => {
                    let Some(item) = items.and_then(|items| items.get_item(key)) else {
                        continue;
                    };
                    let text = item.value(true);
                    if let Some(scalar) = kind.decode(text) {
                        set(value, scalar);
                    } else if !text.trim().is_empty() {
                        cx.sink.report(Diagnostic::FieldDefaulted {
                            type_name,
                            field: field.name,
                            key: (*key).to_string(),
                            value: text.to_string(),
                        });
                    }
                }
                Slot::Map {
                    key, set: Some(set), ..
                } => {
                    let Some(items) = items else { continue };
                    let mut map = IndexedMap::new();
                    for index in 0_usize.. {
                        let entry_key = format!("{key}.{index}");
                        let Some(item) = items.get_item(&entry_key) else {
                            break;
                        };
                        map.insert(entry_key, item.value(true).to_string());
                    }
                    if !map.is_empty() {
                        set(value, map);
                    }
                }
                Slot::Section {
                    section: name,
                    nested,
                } => nested.read(value, name, doc, cx),
                Slot::Scalar { .. } | Slot::Map { .. } | Slot::Ignore => {}
            }
        }
    }
}

/// Settings shared by every field during one mapping pass.
pub(crate) struct Pass<'a> {
    pub(crate) handle_quoted_values: bool,
    pub(crate) serialize_read_only: bool,
    pub(crate) sink: &'a dyn DiagnosticsSink,
}

impl Pass<'_> {
    fn not_written(&self, type_name: &'static str, field: &'static str, key: &str) {
        self.sink.report(Diagnostic::ValueNotWritten {
            type_name,
            field,
            key: key.to_string(),
        });
    }
}

/// Render text so that parsing and unquoting give it back unchanged.
///
/// Text is quoted when `quote_all` is set or when it holds a `;`, opens with
/// a `"`, or has surrounding whitespace. `None` if no rendering reads back.
fn render_text(text: &str, quote_all: bool) -> Option<String> {
    let needs_quotes = quote_all
        || text.contains(';')
        || text.starts_with(quote::QUOTE)
        || text.trim() != text;
    let rendered = if needs_quotes {
        quote::to_quoted(text)
    } else {
        text.to_string()
    };
    if rendered.contains(['\r', '\n']) {
        return None;
    }
    let line = format!("k={rendered}");
    let reads_back = matches!(
        parser::classify(&line),
        Line::KeyValue { value, comment: None, .. } if quote::unquote(value) == text
    );
    reads_back.then_some(rendered)
}

trait NestedAccess<T> {
    fn validate(&self) -> Result<()>;
    fn write(&self, parent: &T, section: &str, doc: &mut Document, cx: &Pass<'_>);
    fn read(&self, parent: &mut T, section: &str, doc: &Document, cx: &Pass<'_>);
}

struct Nested<T, U> {
    get: fn(&T) -> &U,
    get_mut: fn(&mut T) -> &mut U,
    schema: OnceCell<Schema<U>>,
}

impl<T, U: IniSchema> Nested<T, U> {
    fn schema(&self) -> &Schema<U> {
        self.schema.get_or_init(U::schema)
    }
}

impl<T: 'static, U: IniSchema> NestedAccess<T> for Nested<T, U> {
    fn validate(&self) -> Result<()> {
        self.schema().validate_at(1)
    }

    fn write(&self, parent: &T, section: &str, doc: &mut Document, cx: &Pass<'_>) {
        self.schema().write((self.get)(parent), section, doc, cx);
    }

    fn read(&self, parent: &mut T, section: &str, doc: &Document, cx: &Pass<'_>) {
        self.schema().read((self.get_mut)(parent), section, doc, cx);
    }
}

/// Type name without its module path.
pub(crate) fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    let start = base.rfind("::").map_or(0, |i| i + 2);
    full.get(start..).unwrap_or(full)
}

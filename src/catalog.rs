//! In-memory catalog of sections and items.
//!
//! The catalog is a pure data structure: it performs no I/O and does not
//! enforce key uniqueness. Lookups compare names case-insensitively and
//! return the first match, so a hand-edited file that repeats a section or
//! key still loads; only the first occurrence is visible through lookups.
//!
//! The main (anonymous) section always occupies slot 0.
use serde::Serialize;

/// Compare two section names or item keys case-insensitively.
pub(crate) fn names_match(a: &str, b: &str) -> bool {
    if a.is_ascii() && b.is_ascii() {
        return a.eq_ignore_ascii_case(b);
    }
    a.to_lowercase() == b.to_lowercase()
}

/// Return `true` if `key` would be read back as the same key once written.
pub(crate) fn is_writable_key(key: &str) -> bool {
    !key.is_empty() && !key.starts_with('[') && !key.contains(['=', ';', '\r', '\n'])
}

/// Return `true` if `name` would be read back as the same section header.
pub(crate) fn is_writable_section(name: &str) -> bool {
    !name.contains([']', '\r', '\n'])
}

/// A single `key=value` entry.
///
/// # Examples
///
/// ```
/// use inimap::catalog::Item;
///
/// let item = Item::new("Title", "\"Quoted\"").with_comment(" shown in header");
/// assert_eq!(item.value(false), "\"Quoted\"");
/// assert_eq!(item.value(true), "Quoted");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Item {
    /// Key as it appeared in the file (case preserved).
    pub key: String,
    /// Value exactly as read, surrounding quotes included.
    pub raw_value: String,
    /// Text following the inline `;`, without the `;` itself.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl Item {
    /// Create an item without a comment.
    #[must_use]
    pub fn new(key: impl Into<String>, raw_value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            raw_value: raw_value.into(),
            comment: None,
        }
    }

    /// Attach an inline comment.
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// The value, optionally with one pair of surrounding quotes removed.
    #[must_use]
    pub fn value(&self, unquote: bool) -> &str {
        if unquote {
            crate::quote::unquote(&self.raw_value)
        } else {
            &self.raw_value
        }
    }
}

/// Ordered list of items belonging to one section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ItemList {
    items: Vec<Item>,
}

impl ItemList {
    /// Create an empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Append an item. Duplicate keys are kept.
    pub fn add(&mut self, item: Item) {
        self.items.push(item);
    }

    /// First item whose key matches case-insensitively.
    #[must_use]
    pub fn get_item(&self, key: &str) -> Option<&Item> {
        self.items.iter().find(|item| names_match(&item.key, key))
    }

    /// Mutable access to the first item whose key matches.
    pub fn get_item_mut(&mut self, key: &str) -> Option<&mut Item> {
        self.items.iter_mut().find(|item| names_match(&item.key, key))
    }

    /// Return `true` if an item with this key exists.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.get_item(key).is_some()
    }

    /// Remove the first item whose key matches and return it.
    pub fn remove(&mut self, key: &str) -> Option<Item> {
        let index = self.items.iter().position(|item| names_match(&item.key, key))?;
        Some(self.items.remove(index))
    }

    /// Iterate items in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Item> {
        self.items.iter()
    }

    /// Number of items, duplicates included.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.items.len()
    }

    /// Return `true` if the list holds no items.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Remove every item.
    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl<'a> IntoIterator for &'a ItemList {
    type Item = &'a Item;
    type IntoIter = std::slice::Iter<'a, Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl FromIterator<Item> for ItemList {
    fn from_iter<I: IntoIterator<Item = Item>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

/// A named group of items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    name: String,
    items: ItemList,
}

impl Section {
    /// Create an empty section.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            items: ItemList::new(),
        }
    }

    /// Section name as written between the brackets.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Return `true` for the anonymous section holding header-less items.
    #[must_use]
    pub const fn is_main(&self) -> bool {
        self.name.is_empty()
    }

    /// Items in this section.
    #[must_use]
    pub const fn items(&self) -> &ItemList {
        &self.items
    }

    /// Mutable access to the items.
    pub const fn items_mut(&mut self) -> &mut ItemList {
        &mut self.items
    }
}

/// Ordered collection of sections; slot 0 is always the main section.
///
/// # Examples
///
/// ```
/// use inimap::catalog::{Item, Section, SectionCatalog};
///
/// let mut catalog = SectionCatalog::new();
/// let mut net = Section::new("Network");
/// net.items_mut().add(Item::new("Port", "8080"));
/// catalog.add_section(net);
///
/// assert_eq!(catalog.section_names(), ["", "Network"]);
/// let port = catalog.get_section("NETWORK").and_then(|s| s.items().get_item("port"));
/// assert_eq!(port.map(|i| i.raw_value.as_str()), Some("8080"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionCatalog {
    sections: Vec<Section>,
}

impl Default for SectionCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl SectionCatalog {
    /// Name of the main section.
    pub const MAIN: &'static str = "";

    /// Create a catalog holding only an empty main section.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sections: vec![Section::new(Self::MAIN)],
        }
    }

    /// Append a section. Never merges with an existing same-name section.
    pub fn add_section(&mut self, section: Section) {
        self.sections.push(section);
    }

    /// First section whose name matches case-insensitively.
    #[must_use]
    pub fn get_section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| names_match(&s.name, name))
    }

    /// Mutable access to the first section whose name matches.
    pub fn get_section_mut(&mut self, name: &str) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| names_match(&s.name, name))
    }

    /// The first matching section, appending a new one if none exists.
    #[allow(clippy::indexing_slicing)] // index comes from position() or push()
    pub fn section_entry(&mut self, name: &str) -> &mut Section {
        let index = if let Some(i) = self.sections.iter().position(|s| names_match(&s.name, name)) {
            i
        } else {
            self.sections.push(Section::new(name));
            self.sections.len() - 1
        };
        &mut self.sections[index]
    }

    /// The most recently added section (the main section if none was added).
    #[allow(clippy::indexing_slicing)] // never empty: slot 0 is always present
    pub(crate) fn last_section_mut(&mut self) -> &mut Section {
        if self.sections.is_empty() {
            self.sections.push(Section::new(Self::MAIN));
        }
        let last = self.sections.len() - 1;
        &mut self.sections[last]
    }

    /// The main section.
    #[must_use]
    pub fn main(&self) -> &Section {
        self.sections.first().unwrap_or(&EMPTY_MAIN)
    }

    /// Remove the first section whose name matches.
    ///
    /// The main section is never removed; its items are cleared instead.
    /// Returns `false` if no section matched.
    pub fn remove_section(&mut self, name: &str) -> bool {
        if name.is_empty() {
            self.section_entry(Self::MAIN).items_mut().clear();
            return true;
        }
        let Some(index) = self.sections.iter().position(|s| names_match(&s.name, name)) else {
            return false;
        };
        self.sections.remove(index);
        true
    }

    /// Sections in catalog order.
    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Section names in catalog order.
    #[must_use]
    pub fn section_names(&self) -> Vec<&str> {
        self.sections.iter().map(Section::name).collect()
    }

    /// Total number of items across all sections.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.sections.iter().map(|s| s.items.len()).sum()
    }

    /// Reset to a catalog holding only an empty main section.
    pub fn clear(&mut self) {
        self.sections.clear();
        self.sections.push(Section::new(Self::MAIN));
    }
}

static EMPTY_MAIN: Section = Section {
    name: String::new(),
    items: ItemList::new(),
};

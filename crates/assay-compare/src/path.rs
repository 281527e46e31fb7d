//! Dotted/bracketed addresses into a value tree.
//!
//! Paths look like `someArray[0].value`. The root is the empty string and
//! first-level fields carry no leading dot. Array indices appear literally in
//! reported diffs; [`FieldPath::index_erased`] rewrites every `[<digits>]` to
//! `[]` so a single exclusion rule covers all elements of an array field.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// A literal array index such as `[12]`.
static ARRAY_INDEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[0-9]+\]").expect("array index pattern is valid"));

/// Address of a location inside a compared value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldPath(String);

impl FieldPath {
    /// The root path (empty string).
    pub fn root() -> Self {
        Self::default()
    }

    /// Returns `true` for the root path.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// The path as written in diffs.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Path of a mapping field below this one.
    pub fn key(&self, field: &str) -> Self {
        if self.is_root() {
            Self(field.to_string())
        } else {
            Self(format!("{}.{}", self.0, field))
        }
    }

    /// Path of an array element below this one.
    pub fn index(&self, index: usize) -> Self {
        Self(format!("{}[{}]", self.0, index))
    }

    /// The path with every literal array index replaced by `[]`.
    ///
    /// ```
    /// use assay_compare::FieldPath;
    ///
    /// let path = FieldPath::root().key("items").index(12).key("price");
    /// assert_eq!(path.as_str(), "items[12].price");
    /// assert_eq!(path.index_erased(), "items[].price");
    /// ```
    pub fn index_erased(&self) -> String {
        erase_indices(&self.0)
    }
}

fn erase_indices(path: &str) -> String {
    ARRAY_INDEX.replace_all(path, "[]").into_owned()
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FieldPath {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for FieldPath {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for FieldPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_is_empty() {
        let root = FieldPath::root();
        assert!(root.is_root());
        assert_eq!(root.as_str(), "");
    }

    #[test]
    fn first_level_field_has_no_leading_dot() {
        assert_eq!(FieldPath::root().key("id").as_str(), "id");
    }

    #[test]
    fn nested_fields_and_indices() {
        let path = FieldPath::root()
            .key("someArray")
            .index(0)
            .key("value");
        assert_eq!(path.to_string(), "someArray[0].value");
    }

    #[test]
    fn root_array_elements() {
        assert_eq!(FieldPath::root().index(3).as_str(), "[3]");
        assert_eq!(FieldPath::root().index(3).index_erased(), "[]");
    }

    #[test]
    fn erases_every_index() {
        let path = FieldPath::from("a[0].b[17][2].c");
        assert_eq!(path.index_erased(), "a[].b[][].c");
    }

    #[test]
    fn leaves_non_numeric_brackets_alone() {
        assert_eq!(erase_indices("a[x].b[]"), "a[x].b[]");
        assert_eq!(erase_indices("a[12"), "a[12");
    }

    #[test]
    fn keeps_unicode_field_names() {
        assert_eq!(erase_indices("prix€[4].név"), "prix€[].név");
    }
}

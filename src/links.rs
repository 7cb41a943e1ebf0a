use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

/// Display names (an author's "given family" or a journal title) already present in the
/// knowledge base, mapped to the id of their node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkTable(HashMap<String, String>);

impl LinkTable {
    /// Collect every `[[Name^id]]` reference in `document`. A later reference to the same name
    /// replaces an earlier one.
    pub fn from_document(document: &str) -> Self {
        static LINK_RE: Lazy<Regex> =
            Lazy::new(|| Regex::new(r"\[\[([^\[\]\n]+?)\^([^\[\]\n^]+)\]\]").unwrap());

        LINK_RE
            .captures_iter(document)
            .map(|c| (c[1].to_owned(), c[2].to_owned()))
            .collect()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn insert(&mut self, name: impl Into<String>, id: impl Into<String>) {
        self.0.insert(name.into(), id.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for LinkTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = LinkTable::default();
        for (k, v) in iter {
            table.insert(k, v);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_references() {
        let doc = "- Existing stuff\n  - Author:: [[Jane Doe^abc123]]\n  \
                   - Journal:: [[Nature^n4tUr3]] and [[Cell^c3ll]]\n";
        let t = LinkTable::from_document(doc);
        assert_eq!(t.len(), 3);
        assert_eq!(t.get("Jane Doe"), Some("abc123"));
        assert_eq!(t.get("Nature"), Some("n4tUr3"));
        assert_eq!(t.get("Cell"), Some("c3ll"));
    }

    #[test]
    fn ignores_plain_links_and_dates() {
        let t = LinkTable::from_document("[[journal article]] [[date:2020-01-01]] [[^bare]]");
        assert!(t.is_empty());
    }

    #[test]
    fn later_reference_wins() {
        let t = LinkTable::from_document("[[A B^one]]\n[[A B^two]]");
        assert_eq!(t.get("A B"), Some("two"));
    }

    #[test]
    fn names_survive_extraction() {
        proptest::proptest!(|(name in "[A-Za-z][A-Za-z .'-]{0,30}", id in "[A-Za-z0-9_-]{1,16}")| {
            let t = LinkTable::from_document(&format!("- [[{name}^{id}]]"));
            proptest::prop_assert_eq!(t.get(&name), Some(id.as_str()));
        })
    }
}

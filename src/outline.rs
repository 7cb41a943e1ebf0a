//! The outline text format: one node per line, two spaces of indent per level.

use std::fmt::Display;

pub const ARTICLE_TAG: &str = "#[[journal article]]";
pub const JOURNAL_TAG: &str = "#[[journal (publication) (Tanarian Brain)]]";
pub const AUTHOR_TAG: &str = "#author";
pub const YEAR_TAG: &str = "#year";
/// Fixed status node every new article is linked to.
pub const SOURCE_STATUS: &str = "WoGDs0D2cBwU";

const INDENT: &str = "  ";

/// `[[^id]]`
pub fn reference(id: &str) -> String {
    format!("[[^{id}]]")
}

#[derive(Debug, Default)]
pub struct Outline {
    lines: Vec<String>,
}

impl Outline {
    pub fn new() -> Self {
        Self::default()
    }

    /// `- text` at `depth`.
    pub fn node(&mut self, depth: usize, text: impl Display) -> &mut Self {
        self.lines.push(format!("{}- {text}", INDENT.repeat(depth)));
        self
    }

    /// `- Name:: value` at `depth`, or a bare `- Name::` when the value is empty.
    pub fn field(&mut self, depth: usize, name: &str, value: impl Display) -> &mut Self {
        let value = value.to_string();
        if value.is_empty() {
            self.node(depth, format_args!("{name}::"))
        } else {
            self.node(depth, format_args!("{name}:: {value}"))
        }
    }

    pub fn finish(self) -> String {
        self.lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indents_two_spaces_per_level() {
        let mut o = Outline::new();
        o.node(0, "root").field(1, "Volume", 3).field(1, "Issue", "");
        o.node(3, "deep");
        assert_eq!(
            o.finish(),
            "- root\n  - Volume:: 3\n  - Issue::\n      - deep"
        );
    }

    #[test]
    fn empty_outline_is_empty_text() {
        assert_eq!(Outline::new().finish(), "");
    }
}

use serde::Serialize;
use serde_json::Value;

use crate::{
    links::LinkTable,
    outline::{AUTHOR_TAG, Outline, reference},
    schema::{Fields, FromRaw, Loc, Violations},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorAffiliation {
    pub name: String,
}

impl FromRaw for AuthorAffiliation {
    fn from_raw(value: &Value, loc: &Loc, violations: &mut Violations) -> Option<Self> {
        let mut f = Fields::open(value, loc, violations)?;
        Some(AuthorAffiliation {
            name: f.required("name")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Author {
    pub given: String,
    pub family: String,
    /// `first` or `additional`.
    pub sequence: String,
    pub affiliation: Vec<AuthorAffiliation>,
}

impl Author {
    /// "given family", the key looked up in a [`LinkTable`].
    pub fn full_name(&self) -> String {
        format!("{} {}", self.given, self.family)
    }

    /// Either a single reference to an existing node, or a new `#author` node with its
    /// affiliations nested under `Company::`.
    pub fn write_outline(&self, out: &mut Outline, depth: usize, links: &LinkTable) {
        let name = self.full_name();
        if let Some(id) = links.get(&name) {
            out.node(depth, reference(id));
            return;
        }
        out.node(depth, format_args!("{name} {AUTHOR_TAG}"));
        out.field(depth + 1, "Company", "");
        for affiliation in &self.affiliation {
            out.node(depth + 2, affiliation.name.replace('\r', ""));
        }
    }

    pub fn render(&self, depth: usize, links: &LinkTable) -> String {
        let mut out = Outline::new();
        self.write_outline(&mut out, depth, links);
        out.finish()
    }
}

impl FromRaw for Author {
    fn from_raw(value: &Value, loc: &Loc, violations: &mut Violations) -> Option<Self> {
        let mut f = Fields::open(value, loc, violations)?;
        let given = f.required_text("given");
        let family = f.required_text("family");
        let sequence = f.required("sequence");
        let affiliation = f.required("affiliation");
        Some(Author {
            given: given?,
            family: family?,
            sequence: sequence?,
            affiliation: affiliation?,
        })
    }
}

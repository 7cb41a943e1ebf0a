//! The typed record of one work as returned by a DOI resolver, and its outline rendering.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::{
    error::{RenderError, SchemaValidationError, ViolationKind},
    links::LinkTable,
    outline::{ARTICLE_TAG, JOURNAL_TAG, Outline, SOURCE_STATUS, YEAR_TAG, reference},
    schema::{self, Fields, FromRaw, Loc, Violations},
};

mod author;
mod date;
mod entities;

pub use author::{Author, AuthorAffiliation};
pub use date::Date;
pub use entities::{
    ContentDomain, FunderElement, Institution, JournalIssue, LicenseElement, Link, Reference,
    Resource,
};

/// Journal title used when neither a container title nor an institution is known.
pub const NOT_FOUND: &str = "**Not Found**";

/// `container-title` comes either as one string or as a list whose first entry is canonical.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ContainerTitle {
    Single(String),
    Multiple(Vec<String>),
}

impl ContainerTitle {
    /// The canonical title, if there is a non-empty one.
    pub fn primary(&self) -> Option<&str> {
        let title = match self {
            ContainerTitle::Single(s) => Some(s.as_str()),
            ContainerTitle::Multiple(v) => v.first().map(String::as_str),
        };
        title.filter(|t| !t.is_empty())
    }
}

impl FromRaw for ContainerTitle {
    fn from_raw(value: &Value, loc: &Loc, violations: &mut Violations) -> Option<Self> {
        match value {
            Value::String(s) => Some(ContainerTitle::Single(s.clone())),
            Value::Array(items) => {
                let titles: Option<Vec<String>> = items
                    .iter()
                    .map(|v| v.as_str().map(str::to_owned))
                    .collect();
                if titles.is_none() {
                    violations.push(loc.clone(), ViolationKind::StringOrList);
                }
                titles.map(ContainerTitle::Multiple)
            }
            _ => {
                violations.push(loc.clone(), ViolationKind::StringOrList);
                None
            }
        }
    }
}

/// One bibliographic work.
///
/// Only `DOI`, `title`, `URL`, `author`, and `container-title` are required; everything else is
/// kept if the source sends it. Unknown keys are ignored.
///
/// Serializes under the underscored field names, keeping the source's `DOI`, `URL`, `ISSN`, and
/// `type` spellings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Work {
    #[serde(rename = "DOI")]
    pub doi: String,
    /// Italic markup already replaced, see [`sanitize_title`].
    pub title: String,
    #[serde(rename = "URL")]
    pub url: String,
    pub author: Vec<Author>,
    pub container_title: ContainerTitle,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub indexed: Option<Date>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<Vec<LicenseElement>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub funder: Option<Vec<FunderElement>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_domain: Option<ContentDomain>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_print: Option<Date>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<Date>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_referenced_by_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_online: Option<Date>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<Vec<Reference>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<Vec<Link>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deposited: Option<Date>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_title: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued: Option<Date>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub references_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub journal_issue: Option<JournalIssue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternative_id: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relation: Option<Map<String, Value>>,
    #[serde(rename = "ISSN", skip_serializing_if = "Option::is_none")]
    pub issn: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container_title_short: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<Date>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub institution: Option<Vec<Institution>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<Resource>,
}

/// `<i>…</i>` becomes `__…__`.
pub fn sanitize_title(title: &str) -> String {
    title.replace("<i>", "__").replace("</i>", "__")
}

fn from_container_title(w: &Work) -> Option<&str> {
    w.container_title.primary()
}

fn from_institution(w: &Work) -> Option<&str> {
    w.institution
        .as_ref()
        .and_then(|i| i.first())
        .map(|i| i.name.as_str())
}

type Derivation = fn(&Work) -> Option<&str>;

/// Where the journal title comes from, in priority order.
static JOURNAL_TITLE_SOURCES: &[Derivation] = &[from_container_title, from_institution];

fn published(w: &Work) -> Option<&Date> {
    w.published.as_ref()
}

fn issued(w: &Work) -> Option<&Date> {
    w.issued.as_ref()
}

fn published_print(w: &Work) -> Option<&Date> {
    w.published_print.as_ref()
}

fn published_online(w: &Work) -> Option<&Date> {
    w.published_online.as_ref()
}

type DateSource = fn(&Work) -> Option<&Date>;

/// Dates that can stand in for the publication date, in priority order.
static PUBLICATION_DATE_SOURCES: &[(&str, DateSource)] = &[
    ("published", published),
    ("issued", issued),
    ("published-print", published_print),
    ("published-online", published_online),
];

impl Work {
    /// Validate a raw resolver response.
    pub fn from_value(raw: &Value) -> Result<Self, SchemaValidationError> {
        let work = schema::validate::<Work>(raw, "Work");
        match &work {
            Ok(w) => tracing::debug!(doi = %w.doi, "validated work"),
            Err(e) => tracing::debug!(violations = e.violations.len(), "work failed validation"),
        }
        work
    }

    pub fn journal_title(&self) -> &str {
        JOURNAL_TITLE_SOURCES
            .iter()
            .find_map(|f| f(self))
            .unwrap_or(NOT_FOUND)
    }

    /// `published`, or the first date that can stand in for it.
    pub fn publication_date(&self) -> Option<&Date> {
        let (field, date) = PUBLICATION_DATE_SOURCES
            .iter()
            .find_map(|(field, f)| f(self).map(|d| (*field, d)))?;
        if field != "published" {
            tracing::warn!(doi = %self.doi, "no `published` date, using `{field}`");
        }
        Some(date)
    }

    /// The outline for this work. Names found in `links` become references to the existing nodes
    /// instead of new ones.
    pub fn render(&self, links: &LinkTable) -> Result<String, RenderError> {
        let date = self
            .publication_date()
            .ok_or(RenderError::MissingPublicationDate)?;

        let journal_title = self.journal_title();
        let journal = match links.get(journal_title) {
            Some(id) => reference(id),
            None => format!("{journal_title} {JOURNAL_TAG}"),
        };

        let mut out = Outline::new();
        out.node(0, format_args!("{} {ARTICLE_TAG}", self.title))
            .field(1, "Title", &self.title)
            .field(1, "Source Status (Tanarian Brain)", reference(SOURCE_STATUS))
            .field(1, "Journal", journal)
            .field(1, "Volume", self.volume.as_deref().unwrap_or_default())
            .field(1, "Issue", self.issue.as_deref().unwrap_or_default())
            .field(1, "Publication Date (Tanarian Brain)", date.render())
            .field(1, "DOI", &self.doi)
            .field(
                1,
                "Year (Tanarian Brain)",
                format_args!("{} {YEAR_TAG}", date.year()),
            );

        if let Some(subject) = self.subject.as_ref().filter(|s| !s.is_empty()) {
            out.field(1, "Tags", subject.join(", "));
        }

        if !self.author.is_empty() {
            out.field(1, "Author", "");
            for author in &self.author {
                author.write_outline(&mut out, 2, links);
            }
        }

        Ok(out.finish())
    }
}

impl FromRaw for Work {
    fn from_raw(value: &Value, loc: &Loc, violations: &mut Violations) -> Option<Self> {
        let mut f = Fields::open(value, loc, violations)?;
        let doi = f.required("DOI");
        let title: Option<String> = f.required("title");
        let url = f.required("URL");
        let author = f.required("author");
        let container_title = f.required("container_title");

        let work = Work {
            indexed: f.optional("indexed"),
            reference_count: f.optional("reference_count"),
            publisher: f.optional("publisher"),
            issue: f.optional("issue"),
            license: f.optional("license"),
            funder: f.optional("funder"),
            content_domain: f.optional("content_domain"),
            published_print: f.optional("published_print"),
            kind: f.optional("type"),
            created: f.optional("created"),
            page: f.optional("page"),
            source: f.optional("source"),
            is_referenced_by_count: f.optional("is_referenced_by_count"),
            prefix: f.optional("prefix"),
            volume: f.optional("volume"),
            member: f.optional("member"),
            published_online: f.optional("published_online"),
            reference: f.optional("reference"),
            language: f.optional("language"),
            link: f.optional("link"),
            deposited: f.optional("deposited"),
            score: f.optional("score"),
            subtitle: f.optional("subtitle"),
            short_title: f.optional("short_title"),
            issued: f.optional("issued"),
            references_count: f.optional("references_count"),
            journal_issue: f.optional("journal_issue"),
            alternative_id: f.optional("alternative_id"),
            relation: f.optional("relation"),
            issn: f.optional("ISSN"),
            container_title_short: f.optional("container_title_short"),
            published: f.optional("published"),
            subject: f.optional("subject"),
            institution: f.optional("institution"),
            resource: f.optional("resource"),

            doi: doi?,
            title: sanitize_title(&title?),
            url: url?,
            author: author?,
            container_title: container_title?,
        };
        Some(work)
    }
}

//! The smaller records nested inside a [`Work`](super::Work).

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use super::Date;
use crate::schema::{Fields, FromRaw, Loc, Violations};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Institution {
    pub name: String,
}

impl FromRaw for Institution {
    fn from_raw(value: &Value, loc: &Loc, violations: &mut Violations) -> Option<Self> {
        let mut f = Fields::open(value, loc, violations)?;
        Some(Institution {
            name: f.required("name")?,
        })
    }
}

/// One entry of the work's bibliography.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reference {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doi_asserted_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_page: Option<String>,
    #[serde(rename = "DOI", skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub journal_title: Option<String>,
}

impl FromRaw for Reference {
    fn from_raw(value: &Value, loc: &Loc, violations: &mut Violations) -> Option<Self> {
        let mut f = Fields::open(value, loc, violations)?;
        let key = f.required("key");
        Some(Reference {
            doi_asserted_by: f.optional("doi_asserted_by"),
            first_page: f.optional("first_page"),
            doi: f.optional("DOI"),
            volume: f.optional("volume"),
            author: f.optional("author"),
            year: f.optional("year"),
            journal_title: f.optional("journal_title"),
            key: key?,
        })
    }
}

/// A full-text or similar link for the work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    #[serde(rename = "URL")]
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intended_application: Option<String>,
}

impl FromRaw for Link {
    fn from_raw(value: &Value, loc: &Loc, violations: &mut Violations) -> Option<Self> {
        let mut f = Fields::open(value, loc, violations)?;
        let url = f.required("URL");
        Some(Link {
            content_type: f.optional("content_type"),
            content_version: f.optional("content_version"),
            intended_application: f.optional("intended_application"),
            url: url?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunderElement {
    #[serde(rename = "DOI", skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doi_asserted_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub award: Option<Vec<String>>,
}

impl FromRaw for FunderElement {
    fn from_raw(value: &Value, loc: &Loc, violations: &mut Violations) -> Option<Self> {
        let mut f = Fields::open(value, loc, violations)?;
        Some(FunderElement {
            doi: f.optional("DOI"),
            name: f.optional("name"),
            doi_asserted_by: f.optional("doi_asserted_by"),
            award: f.optional("award"),
        })
    }
}

/// License terms, e.g. a Creative Commons URL that applies from `start`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LicenseElement {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<Date>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay_in_days: Option<i64>,
    #[serde(rename = "URL", skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl FromRaw for LicenseElement {
    fn from_raw(value: &Value, loc: &Loc, violations: &mut Violations) -> Option<Self> {
        let mut f = Fields::open(value, loc, violations)?;
        Some(LicenseElement {
            start: f.optional("start"),
            content_version: f.optional("content_version"),
            delay_in_days: f.optional("delay_in_days"),
            url: f.optional("URL"),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentDomain {
    pub domain: Vec<String>,
    pub crossmark_restriction: bool,
}

impl FromRaw for ContentDomain {
    fn from_raw(value: &Value, loc: &Loc, violations: &mut Violations) -> Option<Self> {
        let mut f = Fields::open(value, loc, violations)?;
        let domain = f.required("domain");
        let crossmark_restriction = f.required("crossmark_restriction");
        Some(ContentDomain {
            domain: domain?,
            crossmark_restriction: crossmark_restriction?,
        })
    }
}

/// Where the work is hosted, e.g. `primary.URL`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resource {
    pub primary: BTreeMap<String, String>,
}

impl FromRaw for Resource {
    fn from_raw(value: &Value, loc: &Loc, violations: &mut Violations) -> Option<Self> {
        let mut f = Fields::open(value, loc, violations)?;
        Some(Resource {
            primary: f.required("primary")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JournalIssue {
    pub issue: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_print: Option<Date>,
}

impl FromRaw for JournalIssue {
    fn from_raw(value: &Value, loc: &Loc, violations: &mut Violations) -> Option<Self> {
        let mut f = Fields::open(value, loc, violations)?;
        let issue = f.required("issue");
        Some(JournalIssue {
            published_print: f.optional("published_print"),
            issue: issue?,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::schema::validate;

    #[test]
    fn reference_reads_dashed_keys() {
        let r: Reference = validate(
            &json!({
                "key": "e_1_2_1",
                "doi-asserted-by": "crossref",
                "first-page": "112",
                "DOI": "10.1000/x",
                "journal-title": "Nature",
                "unstructured": "ignored"
            }),
            "Reference",
        )
        .unwrap();
        assert_eq!(r.doi_asserted_by.as_deref(), Some("crossref"));
        assert_eq!(r.first_page.as_deref(), Some("112"));
        assert_eq!(r.doi.as_deref(), Some("10.1000/x"));
        assert_eq!(r.journal_title.as_deref(), Some("Nature"));
        assert_eq!(r.year, None);
    }

    #[test]
    fn reference_needs_key() {
        let err = validate::<Reference>(&json!({"DOI": "10.1000/x"}), "Reference").unwrap_err();
        assert!(err.names("key"));
    }

    #[test]
    fn license_start_is_a_date() {
        let l: LicenseElement = validate(
            &json!({
                "start": {"date-parts": [[2015, 1, 1]]},
                "content-version": "vor",
                "delay-in-days": 0,
                "URL": "https://creativecommons.org/licenses/by/4.0/"
            }),
            "LicenseElement",
        )
        .unwrap();
        assert_eq!(l.start.map(|d| d.render()).as_deref(), Some("[[date:2015-01-01]]"));
        assert_eq!(l.delay_in_days, Some(0));

        let raw = json!({"start": {"date-parts": [[]]}});
        let err = validate::<LicenseElement>(&raw, "LicenseElement").unwrap_err();
        assert!(err.names("start.date-parts"));
    }

    #[test]
    fn content_domain_fields_are_required() {
        let err = validate::<ContentDomain>(&json!({"domain": "x"}), "ContentDomain").unwrap_err();
        assert!(err.names("domain"));
        assert!(err.names("crossmark-restriction"));
    }

    #[test]
    fn resource_primary_is_a_string_map() {
        let r: Resource =
            validate(&json!({"primary": {"URL": "https://example.org/a"}}), "Resource").unwrap();
        assert_eq!(r.primary.get("URL").map(String::as_str), Some("https://example.org/a"));
        let err = validate::<Resource>(&json!({"primary": {"URL": 1}}), "Resource").unwrap_err();
        assert!(err.names("primary.URL"));
    }

    #[test]
    fn serializes_with_source_spellings() {
        let r = Reference {
            key: "e_1".into(),
            doi_asserted_by: Some("crossref".into()),
            first_page: None,
            doi: Some("10.1000/x".into()),
            volume: None,
            author: None,
            year: None,
            journal_title: None,
        };
        assert_eq!(
            serde_json::to_value(&r).unwrap(),
            json!({"key": "e_1", "doi_asserted_by": "crossref", "DOI": "10.1000/x"})
        );
    }
}

//! One DOI in, one document out.

use serde_json::Value;

use crate::{
    error::Error, identifier::Doi, links::LinkTable, record::Work, resolver::MetadataSource,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Format {
    /// The outline for import into the knowledge base.
    #[default]
    Outline,
    /// The normalized record as JSON.
    Json,
}

/// Fetch `input` from `source` and render it.
///
/// On failure the error's display is the text to hand back instead of the document.
pub fn process(
    input: &str,
    source: &impl MetadataSource,
    links: &LinkTable,
    format: Format,
) -> Result<String, Error> {
    let doi = Doi::parse(input).ok_or_else(|| Error::Unrecognised {
        input: input.trim().to_owned(),
    })?;
    let raw = source.fetch(&doi).map_err(|source| Error::Fetch {
        doi: input.trim().to_owned(),
        source,
    })?;
    normalize(&raw, links, format)
}

/// Validate an already fetched response and render it.
pub fn normalize(raw: &Value, links: &LinkTable, format: Format) -> Result<String, Error> {
    let work = Work::from_value(raw)?;
    match format {
        Format::Outline => work.render(links).map_err(|source| Error::Render {
            doi: work.doi.clone(),
            source,
        }),
        Format::Json => serde_json::to_string_pretty(&work).map_err(|source| Error::Encode {
            doi: work.doi.clone(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, collections::HashMap};

    use serde_json::json;

    use super::*;
    use crate::error::FetchError;

    /// Serves canned responses by DOI; anything else is a 404.
    #[derive(Default)]
    struct Canned {
        works: HashMap<String, Value>,
        calls: Cell<usize>,
    }

    impl MetadataSource for Canned {
        fn fetch(&self, doi: &Doi<'_>) -> Result<Value, FetchError> {
            self.calls.set(self.calls.get() + 1);
            self.works
                .get(doi.as_str())
                .cloned()
                .ok_or(FetchError::Status(404))
        }
    }

    fn canned() -> Canned {
        let mut works = HashMap::new();
        works.insert(
            "10.1000/xyz".to_owned(),
            json!({
                "DOI": "10.x/y",
                "title": "T",
                "URL": "u",
                "author": [{"given": "A", "family": "B", "sequence": "first", "affiliation": []}],
                "container-title": ["J"],
                "published": {"date-parts": [[2020, 3]]}
            }),
        );
        works.insert(
            "10.1000/undated".to_owned(),
            json!({
                "DOI": "10.1000/undated",
                "title": "T",
                "URL": "u",
                "author": [],
                "container-title": "J"
            }),
        );
        works.insert("10.1000/untitled".to_owned(), json!({"DOI": "10.1000/untitled"}));
        Canned {
            works,
            ..Canned::default()
        }
    }

    #[test]
    fn end_to_end() {
        let out =
            process("10.1000/xyz", &canned(), &LinkTable::default(), Format::Outline).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "- T #[[journal article]]");
        assert!(lines.contains(&"  - Journal:: J #[[journal (publication) (Tanarian Brain)]]"));
        assert!(lines.contains(&"  - Publication Date (Tanarian Brain):: [[date:2020-03-01]]"));
        assert!(lines.iter().any(|l| l.starts_with("  - Year") && l.ends_with("#year")));
    }

    #[test]
    fn unavailable_source_is_one_line() {
        let err = process("10.1000/missing", &canned(), &LinkTable::default(), Format::Outline)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "- *ERROR* DOI 10.1000/missing gave a response code of 404."
        );
    }

    #[test]
    fn validation_errors_are_reported_in_full() {
        let err = process("10.1000/untitled", &canned(), &LinkTable::default(), Format::Outline)
            .unwrap_err();
        let text = err.to_string();
        assert!(text.starts_with("4 validation errors for Work\n"), "{text}");
        for field in ["title", "URL", "author", "container-title"] {
            assert!(text.contains(&format!("\n{field}\n  Field required")), "{text}");
        }
    }

    #[test]
    fn missing_date_is_reported_not_fatal() {
        let err = process("10.1000/undated", &canned(), &LinkTable::default(), Format::Outline)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "- *ERROR* DOI 10.1000/undated has no publication date."
        );
    }

    #[test]
    fn unrecognised_input_never_reaches_source() {
        let source = canned();
        let err =
            process("not a doi", &source, &LinkTable::default(), Format::Outline).unwrap_err();
        assert_eq!(err.to_string(), "- *ERROR* unrecognised identifier: not a doi");
        assert_eq!(source.calls.get(), 0);
    }

    #[test]
    fn json_format_uses_underscored_keys() {
        let input = "https://doi.org/10.1000/xyz";
        let out = process(input, &canned(), &LinkTable::default(), Format::Json).unwrap();
        let value: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["DOI"], json!("10.x/y"));
        assert_eq!(value["container_title"], json!(["J"]));
        assert_eq!(value["published"]["date_parts"], json!([[2020, 3]]));
        assert!(value.get("container-title").is_none());
    }
}

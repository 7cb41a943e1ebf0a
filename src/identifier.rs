use once_cell::sync::Lazy;
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use regex::Regex;
use url::Url;

const PATH_SEGMENT_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// A DOI found in user input, split into its registrant prefix and item suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Doi<'a> {
    name: &'a str,
    prefix: &'a str,
    suffix: &'a str,
}

impl<'a> Doi<'a> {
    pub fn parse(identifier: &'a str) -> Option<Self> {
        let mut s = identifier.trim();

        // Normalise common textual prefixes.
        if let Some(rest) = s
            .strip_prefix("doi:")
            .or_else(|| s.strip_prefix("DOI:"))
            .or_else(|| s.strip_prefix("urn:doi:"))
            .or_else(|| s.strip_prefix("URN:DOI:"))
        {
            s = rest.trim_start();
        }

        // Drop query string or fragment early if present.
        if let Some(idx) = s.find(['?', '#']) {
            s = &s[..idx];
        }

        // Trim trailing punctuation commonly found in prose.
        s = s.trim_end_matches(|c: char| {
            matches!(c, '.' | ',' | ';' | ':' | ')' | ']' | '}' | '\"' | '\'')
        });

        // Find a DOI anywhere, so resolver URLs like https://dx.doi.org/10.1000/182 work too.
        // Case-insensitive, based on Crossref guidance.
        static DOI_ANYWHERE_RE: Lazy<Regex> =
            Lazy::new(|| Regex::new(r"(?i)\b(10\.\d{4,9})/([-._;()/:A-Z0-9]+)\b").unwrap());

        let caps = DOI_ANYWHERE_RE.captures(s)?;

        Some(Doi {
            name: caps.get(0)?.as_str(),
            prefix: caps.get(1)?.as_str(),
            suffix: caps.get(2)?.as_str(),
        })
    }

    /// The full DOI, e.g. `10.1000/182`.
    pub fn as_str(&self) -> &'a str {
        self.name
    }

    pub fn prefix(&self) -> &'a str {
        self.prefix
    }

    pub fn suffix(&self) -> &'a str {
        self.suffix
    }

    /// `<base>/<prefix>/<suffix>` with the suffix percent-encoded.
    pub fn to_url(&self, base: &Url) -> Result<Url, url::ParseError> {
        let enc_suffix = utf8_percent_encode(self.suffix, PATH_SEGMENT_ENCODE_SET).to_string();
        base.join(&format!("{}/{}", self.prefix, enc_suffix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::strategy::Strategy;

    // Allowed characters in DOI suffix per our regex: [-._;()/:A-Z0-9]+ (case-insensitive)
    fn doi_suffix_char() -> impl Strategy<Value = char> {
        let uppers = proptest::sample::select(('A'..='Z').collect::<Vec<_>>());
        let lowers = proptest::sample::select(('a'..='z').collect::<Vec<_>>());
        let digits = proptest::sample::select(('0'..='9').collect::<Vec<_>>());
        let punct = proptest::sample::select(vec!['-', '.', '_', ';', '(', ')', '/']);
        proptest::prop_oneof![uppers, lowers, digits, punct]
    }

    // Ends with an alphanumeric to satisfy the trailing \b.
    fn doi_suffix(min: usize, max: usize) -> impl Strategy<Value = String> {
        let last = proptest::prop_oneof![
            proptest::sample::select(('A'..='Z').collect::<Vec<_>>()),
            proptest::sample::select(('a'..='z').collect::<Vec<_>>()),
            proptest::sample::select(('0'..='9').collect::<Vec<_>>()),
        ];
        (min..=max).prop_flat_map(move |len| {
            if len == 1 {
                last.clone().prop_map(|c| c.to_string()).boxed()
            } else {
                (
                    proptest::collection::vec(doi_suffix_char(), len - 1),
                    last.clone(),
                )
                    .prop_map(|(mut v, last)| {
                        v.push(last);
                        v.into_iter().collect::<String>()
                    })
                    .boxed()
            }
        })
    }

    fn doi_core() -> impl Strategy<Value = (String, String, String)> {
        (
            proptest::collection::vec(
                proptest::sample::select(('0'..='9').collect::<Vec<_>>()),
                4..=9,
            )
            .prop_map(|v| v.into_iter().collect::<String>()),
            doi_suffix(1, 64),
        )
            .prop_map(|(digits, suffix)| {
                let prefix = format!("10.{digits}");
                let full = format!("{}/{}", prefix, suffix);
                (full, prefix, suffix)
            })
    }

    #[test]
    fn parses_known_forms() {
        for input in [
            "10.1074/jbc.M204252200",
            "doi:10.1074/jbc.M204252200",
            "https://doi.org/10.1074/jbc.M204252200",
            "https://dx.doi.org/10.1074/jbc.M204252200?via=x",
            "see (10.1074/jbc.M204252200).",
        ] {
            let doi = Doi::parse(input).expect(input);
            assert_eq!(doi.as_str(), "10.1074/jbc.M204252200");
            assert_eq!(doi.prefix(), "10.1074");
            assert_eq!(doi.suffix(), "jbc.M204252200");
        }
    }

    #[test]
    fn parse_finds_generated_doi() {
        const PREFIXES: &[&str] = &["", "doi:", "DOI: ", "https://doi.org/"];
        proptest::proptest!(|(t in doi_core(), pre in proptest::sample::select(PREFIXES))| {
            let (full, prefix, suffix) = t;
            let input = format!("{pre}{full}");
            let d = Doi::parse(&input).expect("should parse");
            proptest::prop_assert_eq!(d.prefix(), prefix.as_str());
            proptest::prop_assert_eq!(d.suffix(), suffix.as_str());
        })
    }

    #[test]
    fn parse_rejects_non_doi() {
        proptest::proptest!(|(s in "[A-Za-z0-9 _-]{1,64}")| {
            proptest::prop_assume!(!s.contains("10."));
            proptest::prop_assert!(Doi::parse(&s).is_none());
        })
    }

    #[test]
    fn url_joins_onto_resolver() {
        let base = Url::parse("https://doi.org/").unwrap();
        let doi = Doi::parse("10.1000/a b{c}").unwrap();
        assert_eq!(doi.suffix(), "a");
        let doi = Doi::parse("10.1002/(SICI)1097-4636").unwrap();
        let url = doi.to_url(&base).unwrap();
        assert_eq!(url.as_str(), "https://doi.org/10.1002/(SICI)1097-4636");
    }
}

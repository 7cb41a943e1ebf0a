//! Normalize DOI metadata into a typed record and render it as an outline for a note-taking
//! knowledge base.
//!
//! ```
//! use serde_json::json;
//! use tana_doi::{LinkTable, Work};
//!
//! let work = Work::from_value(&json!({
//!     "DOI": "10.1000/182",
//!     "title": "The DOI Handbook",
//!     "URL": "https://doi.org/10.1000/182",
//!     "author": [],
//!     "container-title": "DOI Foundation",
//!     "published": {"date-parts": [[2023, 4]]}
//! }))
//! .unwrap();
//!
//! let links = LinkTable::from_document("- [[DOI Foundation^f0und]]");
//! let outline = work.render(&links).unwrap();
//! assert!(outline.contains("  - Journal:: [[^f0und]]"));
//! ```

pub mod alias;
pub mod cli;
pub mod error;
pub mod identifier;
pub mod links;
pub mod outline;
pub mod pipeline;
pub mod record;
pub mod resolver;
pub mod schema;

pub use error::{Error, FetchError, RenderError, SchemaValidationError};
pub use identifier::Doi;
pub use links::LinkTable;
pub use pipeline::{Format, normalize, process};
pub use record::{Author, ContainerTitle, Date, Work};
pub use resolver::{HttpResolver, MetadataSource, ResolverConfig};

//! medgen-core: profile synthesis and schema normalization
//!
//! This crate holds the pure half of the pipeline: the output schema,
//! prompt construction, reconciliation of generated values into flat rows,
//! conditions cleaning, and merging into an uploaded CSV dataset.

pub mod conditions;
pub mod error;
pub mod merge;
pub mod normalize;
pub mod prompt;
pub mod schema;
pub mod table;
pub mod value;

pub use error::{CoreError, Result};
pub use merge::merge_rows;
pub use normalize::{NormalizedRow, normalize_profile, normalize_profiles};
pub use prompt::{CONTEXT_CHAR_LIMIT, PROFILES_PER_REQUEST, build_prompt};
pub use schema::{COLUMNS, FieldKind};
pub use table::Table;
pub use value::FieldValue;

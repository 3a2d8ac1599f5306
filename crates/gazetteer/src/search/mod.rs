//! The federated search engine.
//!
//! [`type_search`] implements the single generic type-scoped searcher;
//! [`aggregate`] fans it out across entity types for the `search` operation;
//! [`autocomplete`] fans it out under pre-split quotas for typeahead.

pub(crate) mod aggregate;
pub(crate) mod autocomplete;
pub(crate) mod type_search;

pub use autocomplete::{MIN_TERM_LEN, Quotas, split_quotas};

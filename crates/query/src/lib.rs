//! `query` crate — pure query construction.
//!
//! Two sublanguages reach the platform: flat filter-query strings for
//! single-entity reads and searches, and structured `<fetch>` documents for
//! joined reads. Everything here is text production; no I/O.

pub mod builders;
pub mod fetch;
pub mod filter;

pub use builders::{co_owners, flow_solutions, flows_by_solution};
pub use fetch::{Condition, EntityBlock, FetchDoc, LinkEntity, Operator};
pub use filter::{escape_quotes, search_filter, solutions_filter, SearchKind};

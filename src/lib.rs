pub mod catalog;
pub mod cli;
pub mod client;
pub mod constants;
pub mod content;
pub mod error;
pub mod reporting;
pub mod selection;
pub mod store;
pub mod web;

pub use client::ApiClient;
pub use content::{compose, page_slug, slugify, PageContent, PurposeKind, WhyUsItem};
pub use error::{Error, Result};
pub use selection::SelectionState;
pub use store::{BulkOutcome, DynamicPage, PageCandidate, PageStore};

//! Solr implementation of the search index repository.
//!
//! This module provides the concrete [`SearchIndexRepository`] backed by a
//! single Solr core over HTTP: query translation, document codec, and the
//! commit discipline that gives the write path read-your-write semantics.
//!
//! [`SearchIndexRepository`]: crate::interfaces::SearchIndexRepository

mod document;
mod query;
mod repository;

pub use repository::SolrRepository;

//! Access to reference contig sequences.
//!
//! - [`ReferenceView`]: the bases of one contig; positions past the end are absent, not errors
//! - [`ReferenceProvider`]: loads a contig by name (indexed FASTA, or in memory)
//! - [`ReferenceCache`]: single-slot cache in front of a provider, keyed by contig id
//! - [`SequenceDictionary`]: header `@SQ` lengths and `M5` checksums for validating loads
//!
//! [`ReferenceView`]: view::ReferenceView
//! [`ReferenceProvider`]: provider::ReferenceProvider
//! [`ReferenceCache`]: cache::ReferenceCache
//! [`SequenceDictionary`]: dictionary::SequenceDictionary

pub mod cache;
pub mod dictionary;
pub mod provider;
pub mod view;

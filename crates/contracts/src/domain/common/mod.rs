//! Common types and traits for all aggregates

pub mod aggregate_id;
pub mod localized_text;

// Re-exports
pub use aggregate_id::AggregateId;
pub use localized_text::LocalizedText;

//! Category tree: build from flat records, search, expand, multi-select.

pub mod builder;
pub mod data_source;
pub mod error;
pub mod filter;
pub mod forest;
pub mod selection;
pub mod session;

pub use builder::{build, build_with_report, BuildReport};
pub use data_source::{
    CategoryDataSource, FetchedCategories, HttpCategoryDataSource, InMemoryCategoryDataSource,
};
pub use error::{DataSourceError, IntegrityWarning};
pub use filter::{filter, match_ranges};
pub use forest::{CategoryNode, Forest, TreeRow};
pub use selection::{SelectAllState, SelectionSession};
pub use session::{CategoryTreeSession, LoadOutcome, LoadTicket};

use contracts::domain::a001_category::aggregate::CategoryId;
use thiserror::Error;

/// Loading categories from the catalog API failed as a whole
#[derive(Debug, Error)]
pub enum DataSourceError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("catalog API responded with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("response is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("response has no category list: {0}")]
    UnexpectedShape(String),
}

/// Non-fatal problems found while building the tree
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntegrityWarning {
    #[error("category {id} references missing parent {parent_id}, treated as root")]
    OrphanParent {
        id: CategoryId,
        parent_id: CategoryId,
    },

    #[error("category {id} appears more than once, later copy skipped")]
    DuplicateId { id: CategoryId },

    #[error("category {id} is part of a parent cycle and is not reachable from any root")]
    Unreachable { id: CategoryId },
}

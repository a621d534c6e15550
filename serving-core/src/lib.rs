//! Serving Core Library
//!
//! Provides the types shared by the model server and its tooling:
//! - Transport scalars and native model labels
//! - The table assembled from request rows
//! - Classifier capabilities and the model families an artifact can hold
//! - Tracing initialization

pub mod model;
pub mod scalar;
pub mod table;

// Re-export commonly used items
pub use model::{
    ArtifactError, Classifier, DecisionTree, LinearRegression, LogisticRegression, ModelArtifact,
    ModelError, ModelInput, ProbabilisticClassifier, TreeNode,
};
pub use scalar::{Label, Scalar};
pub use table::{Table, TableError};

/// Initialize tracing with standard configuration
pub fn init_tracing(service_name: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{service_name}=info,tower_http=debug")));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Initialize tracing with JSON output (for production)
pub fn init_tracing_json(service_name: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{service_name}=info,tower_http=info")));

    tracing_subscriber::fmt().with_env_filter(filter).json().init();
}

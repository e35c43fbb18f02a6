pub mod loaders;
pub mod query;
pub mod repository;
pub mod status;

pub use loaders::{default_query_specs, load_query_specs};
pub use query::{AnalysisQuerySpec, BatchReport, QueryOutcome, QueryResult};
pub use repository::RepositoryRef;
pub use status::IndexingStatus;

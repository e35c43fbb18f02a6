pub mod toml_loader;

pub use toml_loader::{default_query_specs, load_query_specs};

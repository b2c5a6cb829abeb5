//! Core dataset model, schema normalization, filtering and ranking for
//! movie rating analytics.

pub mod artifact;
pub mod config;
pub mod error;
pub mod filter;
pub mod lookup;
pub mod normalize;
pub mod rank;
pub mod summary;
pub mod types;

pub use artifact::{Artifact, ArtifactFormat};
pub use config::{columns, AliasMap, EngineConfig};
pub use error::{Error, Result};
pub use filter::{apply_filters, filter_options, FilterOptions, FilterSelection};
pub use lookup::{MetadataLookup, MovieMetadata};
pub use normalize::SchemaNormalizer;
pub use rank::{rank_top, Direction, RankedEntry, RankedSummary, Rankings};
pub use summary::DatasetSummary;
pub use types::{Dataset, TabularFormat, Value};

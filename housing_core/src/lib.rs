pub mod address_parser;
pub mod analytics;
pub mod data_loader;
pub mod deduplicator;
pub mod error;
pub mod models;
pub mod normalizer;
pub mod pipeline;
pub mod writer;

pub use address_parser::{parse_property_address, AddressParser, ParsedAddress};
pub use analytics::Analytics;
pub use data_loader::DataLoader;
pub use deduplicator::Deduplicator;
pub use error::{HousingError, Result};
pub use models::{PipelineConfig, RawRecord, Record, RollingPoint, Summary, Vacancy};
pub use normalizer::FieldNormalizer;
pub use pipeline::{Pipeline, PipelineOutput, RunReport};

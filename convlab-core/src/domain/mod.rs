//! Domain types for ConvLab

pub mod dataset;
pub mod series;
pub mod variation;

pub use dataset::{DatasetError, RawDailyRecord, RawDataset, RawVariation};
pub use series::{Granularity, ParseGranularityError, ProcessedPoint, ProcessedSeries};
pub use variation::{Variation, VariationRegistry, DEFAULT_PALETTE};

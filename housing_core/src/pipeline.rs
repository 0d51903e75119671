use crate::address_parser::{AddressParser, ParseStats};
use crate::analytics::Analytics;
use crate::data_loader::DataLoader;
use crate::deduplicator::Deduplicator;
use crate::error::Result;
use crate::models::{PipelineConfig, RawRecord, Record, RollingPoint, Summary};
use crate::normalizer::{FieldNormalizer, NormalizeStats};
use log::info;
use serde::Serialize;
use std::path::Path;

/// Counters for one run, written out as the JSON run report.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct RunReport {
    pub config: PipelineConfig,
    pub loaded: usize,
    pub normalize: NormalizeStats,
    pub addresses: ParseStats,
    pub duplicates_removed: usize,
    pub removed_ids: Vec<u64>,
    pub retained: usize,
    pub cities: usize,
}

#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub records: Vec<Record>,
    pub summaries: Vec<Summary>,
    pub rolling: Vec<RollingPoint>,
    pub report: RunReport,
}

/// Loader → FieldNormalizer → AddressParser → Deduplicator → Analytics.
pub struct Pipeline {
    config: PipelineConfig,
    loader: DataLoader,
    normalizer: FieldNormalizer,
    parser: AddressParser,
    deduplicator: Deduplicator,
    analytics: Analytics,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            analytics: Analytics::new(config.rolling_preceding),
            config,
            loader: DataLoader::new(),
            normalizer: FieldNormalizer::new(),
            parser: AddressParser::new(),
            deduplicator: Deduplicator::new(),
        }
    }

    /// Load a CSV file and run every stage. Only loading can fail.
    pub fn run_path(&self, path: impl AsRef<Path>) -> Result<PipelineOutput> {
        let raw = self.loader.load_path(path)?;
        Ok(self.run(raw))
    }

    pub fn run(&self, raw: Vec<RawRecord>) -> PipelineOutput {
        let mut report = RunReport {
            config: self.config.clone(),
            loaded: raw.len(),
            ..RunReport::default()
        };

        let (mut records, normalize_stats) = self.normalizer.normalize(raw);
        report.normalize = normalize_stats;

        report.addresses = self.parser.apply(&mut records);

        let dedup = self.deduplicator.deduplicate(records);
        report.duplicates_removed = dedup.removed_ids.len();
        report.removed_ids = dedup.removed_ids;
        report.retained = dedup.records.len();
        let records = dedup.records;

        let (summaries, rolling) = if self.config.skip_analytics {
            info!("Analytics skipped");
            (Vec::new(), Vec::new())
        } else {
            (
                self.analytics.summarize(&records),
                self.analytics.rolling_sale_price(&records),
            )
        };
        report.cities = summaries.len();

        PipelineOutput {
            records,
            summaries,
            rolling,
            report,
        }
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}

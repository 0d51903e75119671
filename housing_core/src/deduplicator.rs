use crate::models::Record;
use chrono::NaiveDate;
use log::info;
use std::collections::{HashMap, HashSet};

/// Rows that agree on all four fields describe the same sale.
pub type DuplicateKey<'a> = (&'a str, Option<&'a str>, NaiveDate, &'a str);

pub fn duplicate_key(record: &Record) -> DuplicateKey<'_> {
    (
        record.parcel_id.as_str(),
        record.property_address.as_deref(),
        record.sale_date,
        record.legal_reference.as_str(),
    )
}

#[derive(Debug, Clone, Default)]
pub struct DedupOutcome {
    pub records: Vec<Record>,
    pub removed_ids: Vec<u64>,
}

pub struct Deduplicator;

impl Default for Deduplicator {
    fn default() -> Self {
        Self::new()
    }
}

impl Deduplicator {
    pub fn new() -> Self {
        Self
    }

    /// Keep the row with the highest UniqueID in every duplicate class.
    /// Survivors keep their input order.
    pub fn deduplicate(&self, records: Vec<Record>) -> DedupOutcome {
        let keep: HashSet<usize> = {
            let mut winners: HashMap<DuplicateKey<'_>, (u64, usize)> = HashMap::new();
            for (idx, record) in records.iter().enumerate() {
                winners
                    .entry(duplicate_key(record))
                    .and_modify(|best| {
                        if record.unique_id > best.0 {
                            *best = (record.unique_id, idx);
                        }
                    })
                    .or_insert((record.unique_id, idx));
            }
            winners.into_values().map(|(_, idx)| idx).collect()
        };

        let mut outcome = DedupOutcome::default();
        for (idx, record) in records.into_iter().enumerate() {
            if keep.contains(&idx) {
                outcome.records.push(record);
            } else {
                outcome.removed_ids.push(record.unique_id);
            }
        }

        info!(
            "Removed {} duplicate rows, {} remain",
            outcome.removed_ids.len(),
            outcome.records.len()
        );
        outcome
    }
}

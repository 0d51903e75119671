use crate::address_parser::split_owner_address;
use crate::models::{RawRecord, Record, Vacancy};
use chrono::NaiveDate;
use log::{debug, info, warn};
use serde::Serialize;
use std::collections::HashMap;

const DISPLAY_DATE_FORMAT: &str = "%m/%d/%Y";

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct NormalizeStats {
    pub backfilled: usize,
    pub ambiguous_backfills: usize,
    pub unresolved_missing_addresses: usize,
    pub owner_addresses_unsplit: usize,
}

/// Display-only rendering of a sale date.
pub fn display_date(date: NaiveDate) -> String {
    date.format(DISPLAY_DATE_FORMAT).to_string()
}

/// Trim surrounding whitespace; a value that is blank after trimming is null.
pub fn normalize_whitespace(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Fill null PropertyAddress values from other rows of the same parcel.
///
/// The candidate with the lowest UniqueID wins. When candidates disagree the
/// row still gets that address but the case is counted as ambiguous.
pub fn backfill_property_addresses(records: &mut [Record], stats: &mut NormalizeStats) {
    let mut candidates: HashMap<String, Vec<(u64, String)>> = HashMap::new();
    for record in records.iter() {
        if let Some(address) = &record.property_address {
            candidates
                .entry(record.parcel_id.clone())
                .or_default()
                .push((record.unique_id, address.clone()));
        }
    }
    for parcel_candidates in candidates.values_mut() {
        parcel_candidates.sort_by_key(|(id, _)| *id);
    }

    for record in records.iter_mut().filter(|r| r.property_address.is_none()) {
        let Some(parcel_candidates) = candidates.get(&record.parcel_id) else {
            stats.unresolved_missing_addresses += 1;
            continue;
        };
        let Some((source_id, address)) = parcel_candidates
            .iter()
            .find(|(id, _)| *id != record.unique_id)
        else {
            stats.unresolved_missing_addresses += 1;
            continue;
        };

        let distinct = parcel_candidates
            .iter()
            .filter(|(_, candidate)| candidate != address)
            .count();
        if distinct > 0 {
            warn!(
                "Ambiguous backfill for UniqueID {} (parcel {}): using {:?} from UniqueID {}",
                record.unique_id, record.parcel_id, address, source_id
            );
            stats.ambiguous_backfills += 1;
        }

        debug!("UniqueID {} backfilled from UniqueID {}", record.unique_id, source_id);
        record.property_address = Some(address.clone());
        stats.backfilled += 1;
    }
}

pub struct FieldNormalizer;

impl Default for FieldNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Move raw rows into the cleaned schema and run every normalization pass.
    pub fn normalize(&self, raw: Vec<RawRecord>) -> (Vec<Record>, NormalizeStats) {
        let mut stats = NormalizeStats::default();
        let mut records: Vec<Record> = raw
            .into_iter()
            .map(|row| self.clean_row(row, &mut stats))
            .collect();

        let pass_stats = self.apply(&mut records);
        stats.backfilled = pass_stats.backfilled;
        stats.ambiguous_backfills = pass_stats.ambiguous_backfills;
        stats.unresolved_missing_addresses = pass_stats.unresolved_missing_addresses;

        (records, stats)
    }

    /// Table-level passes over cleaned rows. Running this again on its own
    /// output changes nothing.
    pub fn apply(&self, records: &mut [Record]) -> NormalizeStats {
        let mut stats = NormalizeStats::default();

        for record in records.iter_mut() {
            record.property_address = normalize_whitespace(record.property_address.as_deref());
            record.sold_as_vacant = Vacancy::from_raw(Some(record.sold_as_vacant.as_str()));
            record.sale_date_text = display_date(record.sale_date);
        }

        backfill_property_addresses(records, &mut stats);

        info!(
            "Backfilled {} property addresses ({} ambiguous, {} still missing)",
            stats.backfilled, stats.ambiguous_backfills, stats.unresolved_missing_addresses
        );
        stats
    }

    fn clean_row(&self, raw: RawRecord, stats: &mut NormalizeStats) -> Record {
        let owner_parts = raw.owner_address.as_deref().and_then(|address| {
            let parts = split_owner_address(address);
            if parts.is_none() {
                debug!("UniqueID {}: cannot split OwnerAddress {:?}", raw.unique_id, address);
                stats.owner_addresses_unsplit += 1;
            }
            parts
        });
        let (owner_split_address, owner_split_city, owner_split_state) = match owner_parts {
            Some(parts) => (Some(parts.address), Some(parts.city), Some(parts.state)),
            None => (None, None, None),
        };

        Record {
            unique_id: raw.unique_id,
            parcel_id: raw.parcel_id,
            land_use: raw.land_use,
            property_address: normalize_whitespace(raw.property_address.as_deref()),
            street_number: None,
            designator: None,
            city: None,
            address_malformed: false,
            sale_date: raw.sale_date,
            sale_date_text: display_date(raw.sale_date),
            sale_price: raw.sale_price,
            legal_reference: raw.legal_reference,
            sold_as_vacant: Vacancy::from_raw(raw.sold_as_vacant.as_deref()),
            owner_name: raw.owner_name,
            owner_split_address,
            owner_split_city,
            owner_split_state,
            acreage: raw.acreage,
            land_value: raw.land_value,
            building_value: raw.building_value,
            total_value: raw.total_value,
            year_built: raw.year_built,
            bedrooms: raw.bedrooms,
            full_bath: raw.full_bath,
            half_bath: raw.half_bath,
        }
    }
}

use crate::error::{HousingError, Result};
use crate::models::RawRecord;
use chrono::{NaiveDate, NaiveDateTime};
use log::{debug, info};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%B %d, %Y", "%m/%d/%Y"];
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Header row of the published dataset, cells kept as text until validated.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CsvRow {
    #[serde(rename = "UniqueID")]
    unique_id: Option<String>,
    #[serde(rename = "ParcelID")]
    parcel_id: Option<String>,
    #[serde(rename = "LandUse")]
    land_use: Option<String>,
    #[serde(rename = "PropertyAddress")]
    property_address: Option<String>,
    #[serde(rename = "SaleDate")]
    sale_date: Option<String>,
    #[serde(rename = "SalePrice")]
    sale_price: Option<String>,
    #[serde(rename = "LegalReference")]
    legal_reference: Option<String>,
    #[serde(rename = "SoldAsVacant")]
    sold_as_vacant: Option<String>,
    #[serde(rename = "OwnerName")]
    owner_name: Option<String>,
    #[serde(rename = "OwnerAddress")]
    owner_address: Option<String>,
    #[serde(rename = "Acreage")]
    acreage: Option<String>,
    #[serde(rename = "TaxDistrict")]
    tax_district: Option<String>,
    #[serde(rename = "LandValue")]
    land_value: Option<String>,
    #[serde(rename = "BuildingValue")]
    building_value: Option<String>,
    #[serde(rename = "TotalValue")]
    total_value: Option<String>,
    #[serde(rename = "YearBuilt")]
    year_built: Option<String>,
    #[serde(rename = "Bedrooms")]
    bedrooms: Option<String>,
    #[serde(rename = "FullBath")]
    full_bath: Option<String>,
    #[serde(rename = "HalfBath")]
    half_bath: Option<String>,
}

pub struct DataLoader;

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load the raw dataset from a CSV file
    pub fn load_path(&self, path: impl AsRef<Path>) -> Result<Vec<RawRecord>> {
        let path = path.as_ref();
        info!("Loading housing records from {}", path.display());
        let file = File::open(path)?;
        self.load_reader(file)
    }

    /// Load the raw dataset from any CSV source. Fails on the first row that
    /// cannot be turned into a record.
    pub fn load_reader<R: Read>(&self, reader: R) -> Result<Vec<RawRecord>> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::Headers)
            .from_reader(reader);

        let mut records = Vec::new();
        let mut seen_ids = HashSet::new();

        for (idx, row) in csv_reader.deserialize::<CsvRow>().enumerate() {
            // Line 1 is the header
            let line = idx as u64 + 2;
            let row = row?;
            let record = convert_row(row, line)?;

            if !seen_ids.insert(record.unique_id) {
                return Err(HousingError::load(
                    line,
                    "UniqueID",
                    format!("duplicate UniqueID {}", record.unique_id),
                ));
            }
            records.push(record);
        }

        info!("Loaded {} records", records.len());
        Ok(records)
    }
}

fn convert_row(row: CsvRow, line: u64) -> Result<RawRecord> {
    let unique_id = required(row.unique_id, line, "UniqueID")?;
    let unique_id = unique_id
        .parse::<u64>()
        .map_err(|_| HousingError::load(line, "UniqueID", format!("not an integer: {unique_id:?}")))?;

    let parcel_id = required(row.parcel_id, line, "ParcelID")?;

    let sale_date_raw = required(row.sale_date, line, "SaleDate")?;
    let sale_date = parse_sale_date(&sale_date_raw).ok_or_else(|| {
        HousingError::load(line, "SaleDate", format!("unrecognized date: {sale_date_raw:?}"))
    })?;

    Ok(RawRecord {
        unique_id,
        parcel_id,
        land_use: non_empty(row.land_use),
        property_address: row.property_address.filter(|s| !s.trim().is_empty()),
        sale_date,
        sale_price: parse_amount(row.sale_price.as_deref(), line, "SalePrice")?,
        legal_reference: row.legal_reference.unwrap_or_default(),
        sold_as_vacant: row.sold_as_vacant,
        owner_name: non_empty(row.owner_name),
        owner_address: non_empty(row.owner_address),
        acreage: parse_amount(row.acreage.as_deref(), line, "Acreage")?,
        tax_district: non_empty(row.tax_district),
        land_value: parse_amount(row.land_value.as_deref(), line, "LandValue")?,
        building_value: parse_amount(row.building_value.as_deref(), line, "BuildingValue")?,
        total_value: parse_amount(row.total_value.as_deref(), line, "TotalValue")?,
        year_built: parse_count::<i32>(row.year_built.as_deref(), line, "YearBuilt")?,
        bedrooms: parse_count::<u32>(row.bedrooms.as_deref(), line, "Bedrooms")?,
        full_bath: parse_count::<u32>(row.full_bath.as_deref(), line, "FullBath")?,
        half_bath: parse_count::<u32>(row.half_bath.as_deref(), line, "HalfBath")?,
    })
}

fn required(value: Option<String>, line: u64, column: &str) -> Result<String> {
    non_empty(value).ok_or_else(|| HousingError::load(line, column, "missing required value"))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Parse a sale date in any of the layouts the dataset has been published with.
pub fn parse_sale_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Some(date);
        }
    }
    NaiveDateTime::parse_from_str(value, DATETIME_FORMAT)
        .ok()
        .map(|dt| dt.date())
}

/// True when every `,` in the integer part separates a group of three digits.
fn thousands_grouped(digits: &str) -> bool {
    let integer = digits.split('.').next().unwrap_or_default();
    let integer = integer.strip_prefix('-').unwrap_or(integer);
    let mut groups = integer.split(',');
    let lead_ok = groups.next().is_some_and(|lead| (1..=3).contains(&lead.len()));
    lead_ok && groups.all(|group| group.len() == 3)
}

/// Parse a currency or plain numeric cell. A leading `$` and thousands
/// separators are stripped; an empty cell is null.
pub fn parse_amount(value: Option<&str>, line: u64, column: &str) -> Result<Option<f64>> {
    let Some(value) = value else {
        return Ok(None);
    };
    let trimmed = value.trim();
    let digits = trimmed.strip_prefix('$').unwrap_or(trimmed);
    if digits.contains(',') && !thousands_grouped(digits) {
        return Err(HousingError::load(
            line,
            column,
            format!("misplaced thousands separator: {value:?}"),
        ));
    }
    let cleaned = digits.replace(',', "");
    if cleaned.is_empty() {
        return Ok(None);
    }

    match cleaned.parse::<f64>() {
        Ok(amount) if amount.is_finite() => {
            if cleaned != trimmed {
                debug!("line {}: {} {:?} read as {}", line, column, value, amount);
            }
            Ok(Some(amount))
        }
        _ => Err(HousingError::load(line, column, format!("not a number: {value:?}"))),
    }
}

/// Parse an integral count such as Bedrooms, accepting `3` as well as `3.0`.
fn parse_count<T: TryFrom<i64>>(value: Option<&str>, line: u64, column: &str) -> Result<Option<T>> {
    let Some(amount) = parse_amount(value, line, column)? else {
        return Ok(None);
    };
    if amount.fract() != 0.0 {
        return Err(HousingError::load(line, column, format!("not a whole number: {amount}")));
    }
    T::try_from(amount as i64)
        .map(Some)
        .map_err(|_| HousingError::load(line, column, format!("out of range: {amount}")))
}

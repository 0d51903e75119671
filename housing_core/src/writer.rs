use crate::error::Result;
use crate::models::{Record, Summary};
use chrono::Datelike;
use log::info;
use polars::prelude::*;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Days from 0001-01-01 to 1970-01-01, the epoch of Arrow date columns.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Serialize rows as CSV with a header taken from the row type.
pub fn write_csv<W: Write, T: Serialize>(writer: W, rows: &[T]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_records_csv(path: impl AsRef<Path>, records: &[Record]) -> Result<()> {
    let path = path.as_ref();
    write_csv(File::create(path)?, records)?;
    info!("Wrote {} cleaned records to {}", records.len(), path.display());
    Ok(())
}

pub fn write_summaries_csv(path: impl AsRef<Path>, summaries: &[Summary]) -> Result<()> {
    let path = path.as_ref();
    write_csv(File::create(path)?, summaries)?;
    info!("Wrote {} city summaries to {}", summaries.len(), path.display());
    Ok(())
}

pub fn write_json<T: Serialize>(path: impl AsRef<Path>, value: &T) -> Result<()> {
    let file = File::create(path.as_ref())?;
    serde_json::to_writer_pretty(file, value)?;
    Ok(())
}

fn str_column<'a>(name: &str, values: impl Iterator<Item = Option<&'a str>>) -> Series {
    Series::new(name.into(), values.collect::<Vec<_>>())
}

/// Columnar copy of the cleaned table.
pub fn records_to_dataframe(records: &[Record]) -> PolarsResult<DataFrame> {
    let sale_days: Vec<i32> = records
        .iter()
        .map(|r| r.sale_date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE)
        .collect();

    DataFrame::new(vec![
        Series::new(
            "UniqueID".into(),
            records.iter().map(|r| r.unique_id).collect::<Vec<u64>>(),
        ),
        str_column("ParcelID", records.iter().map(|r| Some(r.parcel_id.as_str()))),
        str_column("LandUse", records.iter().map(|r| r.land_use.as_deref())),
        str_column("PropertyAddress", records.iter().map(|r| r.property_address.as_deref())),
        str_column("StreetNumber", records.iter().map(|r| r.street_number.as_deref())),
        str_column("Designator", records.iter().map(|r| r.designator.as_deref())),
        str_column("City", records.iter().map(|r| r.city.as_deref())),
        Series::new(
            "AddressMalformed".into(),
            records.iter().map(|r| r.address_malformed).collect::<Vec<bool>>(),
        ),
        Series::new("SaleDate".into(), sale_days).cast(&DataType::Date)?,
        str_column("SaleDateText", records.iter().map(|r| Some(r.sale_date_text.as_str()))),
        Series::new(
            "SalePrice".into(),
            records.iter().map(|r| r.sale_price).collect::<Vec<Option<f64>>>(),
        ),
        str_column("LegalReference", records.iter().map(|r| Some(r.legal_reference.as_str()))),
        str_column("SoldAsVacant", records.iter().map(|r| Some(r.sold_as_vacant.as_str()))),
        str_column("OwnerName", records.iter().map(|r| r.owner_name.as_deref())),
        str_column("OwnerSplitAddress", records.iter().map(|r| r.owner_split_address.as_deref())),
        str_column("OwnerSplitCity", records.iter().map(|r| r.owner_split_city.as_deref())),
        str_column("OwnerSplitState", records.iter().map(|r| r.owner_split_state.as_deref())),
        Series::new(
            "Acreage".into(),
            records.iter().map(|r| r.acreage).collect::<Vec<Option<f64>>>(),
        ),
        Series::new(
            "LandValue".into(),
            records.iter().map(|r| r.land_value).collect::<Vec<Option<f64>>>(),
        ),
        Series::new(
            "BuildingValue".into(),
            records.iter().map(|r| r.building_value).collect::<Vec<Option<f64>>>(),
        ),
        Series::new(
            "TotalValue".into(),
            records.iter().map(|r| r.total_value).collect::<Vec<Option<f64>>>(),
        ),
        Series::new(
            "YearBuilt".into(),
            records.iter().map(|r| r.year_built).collect::<Vec<Option<i32>>>(),
        ),
        Series::new(
            "Bedrooms".into(),
            records.iter().map(|r| r.bedrooms).collect::<Vec<Option<u32>>>(),
        ),
        Series::new(
            "FullBath".into(),
            records.iter().map(|r| r.full_bath).collect::<Vec<Option<u32>>>(),
        ),
        Series::new(
            "HalfBath".into(),
            records.iter().map(|r| r.half_bath).collect::<Vec<Option<u32>>>(),
        ),
    ])
}

pub fn write_records_parquet(path: impl AsRef<Path>, records: &[Record]) -> Result<()> {
    let path = path.as_ref();
    let mut df = records_to_dataframe(records)?;
    ParquetWriter::new(File::create(path)?).finish(&mut df)?;
    info!("Wrote Parquet copy ({} rows) to {}", df.height(), path.display());
    Ok(())
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of rows preceding the current one in the rolling sale-price window.
pub const DEFAULT_ROLLING_PRECEDING: usize = 30;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PipelineConfig {
    pub rolling_preceding: usize, // window = current row + this many preceding rows
    pub skip_analytics: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            rolling_preceding: DEFAULT_ROLLING_PRECEDING,
            skip_analytics: false,
        }
    }
}

impl PipelineConfig {
    pub fn window_rows(&self) -> usize {
        self.rolling_preceding + 1
    }
}

/// One row of the dataset exactly as the loader read it.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub unique_id: u64,
    pub parcel_id: String,
    pub land_use: Option<String>,
    pub property_address: Option<String>,
    pub sale_date: NaiveDate,
    pub sale_price: Option<f64>,
    pub legal_reference: String,
    pub sold_as_vacant: Option<String>,
    pub owner_name: Option<String>,
    pub owner_address: Option<String>,
    pub acreage: Option<f64>,
    pub tax_district: Option<String>,
    pub land_value: Option<f64>,
    pub building_value: Option<f64>,
    pub total_value: Option<f64>,
    pub year_built: Option<i32>,
    pub bedrooms: Option<u32>,
    pub full_bath: Option<u32>,
    pub half_bath: Option<u32>,
}

impl RawRecord {
    /// Minimal row used by tests, benches and demos.
    pub fn new(unique_id: u64, parcel_id: &str, sale_date: NaiveDate) -> Self {
        Self {
            unique_id,
            parcel_id: parcel_id.to_string(),
            land_use: None,
            property_address: None,
            sale_date,
            sale_price: None,
            legal_reference: String::new(),
            sold_as_vacant: None,
            owner_name: None,
            owner_address: None,
            acreage: None,
            tax_district: None,
            land_value: None,
            building_value: None,
            total_value: None,
            year_built: None,
            bedrooms: None,
            full_bath: None,
            half_bath: None,
        }
    }
}

/// Tri-state SoldAsVacant flag.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Vacancy {
    True,
    False,
    Unknown,
}

impl Vacancy {
    /// Total mapping from the raw column. Already-normalized literals map to
    /// themselves so the pass can be re-run on cleaned output.
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw {
            Some("Yes") | Some("True") => Vacancy::True,
            Some("No") | Some("False") => Vacancy::False,
            _ => Vacancy::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Vacancy::True => "True",
            Vacancy::False => "False",
            Vacancy::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Vacancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A cleaned row. OwnerAddress and TaxDistrict are not part of this schema.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Record {
    #[serde(rename = "UniqueID")]
    pub unique_id: u64,
    #[serde(rename = "ParcelID")]
    pub parcel_id: String,
    pub land_use: Option<String>,
    pub property_address: Option<String>,
    pub street_number: Option<String>,
    pub designator: Option<String>,
    pub city: Option<String>,
    pub address_malformed: bool,
    pub sale_date: NaiveDate,
    pub sale_date_text: String,
    pub sale_price: Option<f64>,
    pub legal_reference: String,
    pub sold_as_vacant: Vacancy,
    pub owner_name: Option<String>,
    pub owner_split_address: Option<String>,
    pub owner_split_city: Option<String>,
    pub owner_split_state: Option<String>,
    pub acreage: Option<f64>,
    pub land_value: Option<f64>,
    pub building_value: Option<f64>,
    pub total_value: Option<f64>,
    pub year_built: Option<i32>,
    pub bedrooms: Option<u32>,
    pub full_bath: Option<u32>,
    pub half_bath: Option<u32>,
}

/// Per-city analytics row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Summary {
    #[serde(rename = "City")]
    pub city: Option<String>,
    #[serde(rename = "AverageTotalValueByCity")]
    pub average_total_value: Option<f64>,
    #[serde(rename = "AverageSalePriceByCity")]
    pub average_sale_price: Option<f64>,
    #[serde(rename = "Rolling30DaySumSalePrice")]
    pub rolling_sum_sale_price: Option<f64>,
    #[serde(rename = "MedianSalePrice")]
    pub median_sale_price: Option<f64>,
}

impl Summary {
    pub fn empty(city: Option<String>) -> Self {
        Self {
            city,
            average_total_value: None,
            average_sale_price: None,
            rolling_sum_sale_price: None,
            median_sale_price: None,
        }
    }

    pub fn city_label(&self) -> &str {
        self.city.as_deref().unwrap_or("<no city>")
    }
}

/// One entry of the rolling sale-price series.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct RollingPoint {
    #[serde(rename = "UniqueID")]
    pub unique_id: u64,
    pub city: Option<String>,
    pub sale_date: NaiveDate,
    pub sale_price: f64,
    pub rolling_sum: f64,
}

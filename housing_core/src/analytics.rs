use crate::models::{Record, RollingPoint, Summary, DEFAULT_ROLLING_PRECEDING};
use log::info;
use std::collections::{BTreeMap, HashMap};

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Arithmetic mean rounded to cents. `None` for an empty group.
pub fn mean_rounded(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(round2(values.iter().sum::<f64>() / values.len() as f64))
}

/// Continuous median: interpolates between the two middle values of an even
/// sized group.
pub fn continuous_median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[mid])
    } else {
        Some(sorted[mid - 1] + (sorted[mid] - sorted[mid - 1]) * 0.5)
    }
}

/// Row-count window: each output is the sum of the value at that position and
/// up to `preceding` values before it.
pub fn rolling_sums(values: &[f64], preceding: usize) -> Vec<f64> {
    (0..values.len())
        .map(|i| values[i.saturating_sub(preceding)..=i].iter().sum())
        .collect()
}

#[derive(Default)]
struct CityGroup {
    total_values: Vec<f64>,
    sale_prices: Vec<f64>,
}

pub struct Analytics {
    rolling_preceding: usize,
}

impl Default for Analytics {
    fn default() -> Self {
        Self::new(DEFAULT_ROLLING_PRECEDING)
    }
}

impl Analytics {
    pub fn new(rolling_preceding: usize) -> Self {
        Self { rolling_preceding }
    }

    fn group_by_city<'a>(&self, records: &'a [Record]) -> BTreeMap<Option<&'a str>, CityGroup> {
        let mut groups: BTreeMap<Option<&str>, CityGroup> = BTreeMap::new();

        for record in records {
            let group = groups.entry(record.city.as_deref()).or_default();
            if let Some(total_value) = record.total_value {
                group.total_values.push(total_value);
            }
            if let Some(price) = record.sale_price {
                group.sale_prices.push(price);
            }
        }
        groups
    }

    /// Rolling sale-price sum over the whole table, rows ordered by SaleDate
    /// then UniqueID. Rows without a SalePrice take no window slot.
    pub fn rolling_sale_price(&self, records: &[Record]) -> Vec<RollingPoint> {
        let mut sales: Vec<(&Record, f64)> = records
            .iter()
            .filter_map(|r| r.sale_price.map(|price| (r, price)))
            .collect();
        sales.sort_by(|(a, _), (b, _)| a.sale_date.cmp(&b.sale_date).then(a.unique_id.cmp(&b.unique_id)));

        let prices: Vec<f64> = sales.iter().map(|(_, price)| *price).collect();
        let sums = rolling_sums(&prices, self.rolling_preceding);

        sales
            .into_iter()
            .zip(sums)
            .map(|((record, sale_price), rolling_sum)| RollingPoint {
                unique_id: record.unique_id,
                city: record.city.clone(),
                sale_date: record.sale_date,
                sale_price,
                rolling_sum,
            })
            .collect()
    }

    /// One Summary per city. A metric whose source column is null for every
    /// row of the city is reported as `None`. The rolling sum is the value of
    /// the table-wide series at the city's last sale.
    pub fn summarize(&self, records: &[Record]) -> Vec<Summary> {
        let mut last_rolling: HashMap<Option<String>, f64> = HashMap::new();
        for point in self.rolling_sale_price(records) {
            last_rolling.insert(point.city, point.rolling_sum);
        }

        let summaries: Vec<Summary> = self
            .group_by_city(records)
            .into_iter()
            .map(|(city, group)| {
                let city = city.map(str::to_string);
                Summary {
                    rolling_sum_sale_price: last_rolling.get(&city).copied(),
                    city,
                    average_total_value: mean_rounded(&group.total_values),
                    average_sale_price: mean_rounded(&group.sale_prices),
                    median_sale_price: continuous_median(&group.sale_prices),
                }
            })
            .collect();

        info!("Summarized {} records into {} cities", records.len(), summaries.len());
        summaries
    }
}

use chrono::NaiveDate;
use housing_core::{Pipeline, RawRecord};

fn sale(id: u64, parcel: &str, address: Option<&str>, date: (i32, u32, u32), price: f64) -> RawRecord {
    let mut row = RawRecord::new(id, parcel, NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap());
    row.property_address = address.map(str::to_string);
    row.sale_price = Some(price);
    row.legal_reference = format!("{:04}{:02}{:02}-{id:07}", date.0, date.1, date.2);
    row
}

fn main() {
    // A small slice of the Nashville sales table
    let rows = vec![
        sale(2045, "007 00 0 125.00", Some("1808  FOX CHASE DR, GOODLETTSVILLE"), (2013, 4, 9), 240_000.0),
        sale(16918, "007 00 0 125.00", None, (2014, 6, 10), 366_000.0),
        sale(54582, "105 11 0 080.00", Some("1129  CAMPBELL RD, GOODLETTSVILLE"), (2016, 7, 29), 120_000.0),
        sale(43076, "105 03 0 068.00", Some("2817  DALE DR, NASHVILLE"), (2015, 1, 20), 190_000.0),
        sale(43077, "105 03 0 068.00", Some("2817  DALE DR, NASHVILLE"), (2015, 1, 20), 190_000.0),
        sale(39432, "105 03 0 068.00", Some("2817  DALE DR, NASHVILLE"), (2016, 3, 4), 255_000.0),
    ];

    let output = Pipeline::default().run(rows);

    println!("Nashville Housing Cleaning");
    println!("==========================");
    println!("Loaded: {}", output.report.loaded);
    println!("Backfilled addresses: {}", output.report.normalize.backfilled);
    println!("Duplicates removed: {:?}", output.report.removed_ids);
    println!();

    for record in &output.records {
        println!(
            "  {:>6} {:<10} {:<5} {:<16} {:<15}",
            record.unique_id,
            record.sale_date_text,
            record.street_number.as_deref().unwrap_or("-"),
            record.designator.as_deref().unwrap_or("-"),
            record.city.as_deref().unwrap_or("-"),
        );
    }
    println!();

    println!("City Summary:");
    for summary in &output.summaries {
        println!(
            "  {}: avg price ${:.2}, median ${:.2}, rolling sum ${:.2}",
            summary.city_label(),
            summary.average_sale_price.unwrap_or_default(),
            summary.median_sale_price.unwrap_or_default(),
            summary.rolling_sum_sale_price.unwrap_or_default(),
        );
    }
}

use housing_core::writer::{write_json, write_records_csv, write_records_parquet, write_summaries_csv};
use housing_core::{HousingError, Pipeline, PipelineConfig, Summary, Vacancy};
use polars::prelude::*;
use std::fs;
use std::io::Write;

const HEADER: &str = "UniqueID ,ParcelID,LandUse,PropertyAddress,SaleDate,SalePrice,LegalReference,SoldAsVacant,OwnerName,OwnerAddress,Acreage,TaxDistrict,LandValue,BuildingValue,TotalValue,YearBuilt,Bedrooms,FullBath,HalfBath";

const ROWS: &[&str] = &[
    "2045,007 00 0 125.00,SINGLE FAMILY,\"1808  FOX CHASE DR, GOODLETTSVILLE\",\"April 9, 2013\",240000,20130412-0036474,No,\"FRAZIER, CYRENTHA\",\"1808  FOX CHASE DR, GOODLETTSVILLE, TN\",2.3,GENERAL SERVICES DISTRICT,50000,168200,235700,1986,3,3,0",
    "16918,007 00 0 125.00,SINGLE FAMILY,,\"June 10, 2014\",\"$366,000\",20140619-0053768,Yes,,,,,,,,,,,",
    "16919,007 00 0 125.00,SINGLE FAMILY,,\"June 10, 2014\",\"$366,000\",20140619-0053768,Yes,,,,,,,,,,,",
    "54582,105 11 0 080.00,VACANT RESIDENTIAL LAND,\" 1129  CAMPBELL RD, GOODLETTSVILLE \",2016-07-29,\"120,000\",20160801-0080685,N,,,,,,,,,,,",
    "43076,105 03 0 068.00,SINGLE FAMILY,\"2817  DALE DR, NASHVILLE\",2015-01-20,190000,20150128-0008228,Y,,,,,30000,100000,130000,,,,",
    "99,LOT ONLY,VACANT,NO ADDRESS RECORDED,2015-02-02,,20150202-0000001,,,,,,,,,,,,",
];

fn write_input(dir: &tempfile::TempDir) -> std::path::PathBuf {
    let path = dir.path().join("nashville_housing.csv");
    let mut file = fs::File::create(&path).unwrap();
    writeln!(file, "{HEADER}").unwrap();
    for row in ROWS {
        writeln!(file, "{row}").unwrap();
    }
    path
}

#[test]
fn cleans_and_summarizes_a_csv_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(&dir);

    let output = Pipeline::default().run_path(&input).unwrap();
    let report = &output.report;

    assert_eq!(report.loaded, 6);
    assert_eq!(report.normalize.backfilled, 2);
    assert_eq!(report.addresses.malformed, 1);
    assert_eq!(report.removed_ids, vec![16918]);
    assert_eq!(report.retained, 5);

    let backfilled = output.records.iter().find(|r| r.unique_id == 16919).unwrap();
    assert_eq!(backfilled.property_address.as_deref(), Some("1808  FOX CHASE DR, GOODLETTSVILLE"));
    assert_eq!(backfilled.city.as_deref(), Some("GOODLETTSVILLE"));
    assert_eq!(backfilled.sold_as_vacant, Vacancy::True);
    assert_eq!(backfilled.sale_price, Some(366_000.0));
    assert_eq!(backfilled.sale_date_text, "06/10/2014");

    let vacant_land = output.records.iter().find(|r| r.unique_id == 54582).unwrap();
    assert_eq!(vacant_land.property_address.as_deref(), Some("1129  CAMPBELL RD, GOODLETTSVILLE"));
    assert_eq!(vacant_land.designator.as_deref(), Some("CAMPBELL RD"));
    assert_eq!(vacant_land.sold_as_vacant, Vacancy::Unknown);

    let goodlettsville = output
        .summaries
        .iter()
        .find(|s| s.city.as_deref() == Some("GOODLETTSVILLE"))
        .unwrap();
    assert_eq!(goodlettsville.average_sale_price, Some(242_000.0));
    assert_eq!(goodlettsville.median_sale_price, Some(240_000.0));
    // The window runs over every priced sale, so the Nashville sale of
    // January 2015 counts toward GOODLETTSVILLE's latest value.
    assert_eq!(goodlettsville.rolling_sum_sale_price, Some(916_000.0));
    assert_eq!(goodlettsville.average_total_value, Some(235_700.0));

    let nashville = output
        .summaries
        .iter()
        .find(|s| s.city.as_deref() == Some("NASHVILLE"))
        .unwrap();
    assert_eq!(nashville.rolling_sum_sale_price, Some(796_000.0));

    let rolling_ids: Vec<u64> = output.rolling.iter().map(|p| p.unique_id).collect();
    assert_eq!(rolling_ids, vec![2045, 16919, 43076, 54582]);

    let no_city = output.summaries.iter().find(|s| s.city.is_none()).unwrap();
    assert_eq!(no_city, &Summary::empty(None));
}

#[test]
fn writes_every_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(&dir);
    let output = Pipeline::default().run_path(&input).unwrap();

    let cleaned = dir.path().join("cleaned.csv");
    let summary = dir.path().join("summary.csv");
    let parquet = dir.path().join("cleaned.parquet");
    let report = dir.path().join("report.json");

    write_records_csv(&cleaned, &output.records).unwrap();
    write_summaries_csv(&summary, &output.summaries).unwrap();
    write_records_parquet(&parquet, &output.records).unwrap();
    write_json(&report, &output.report).unwrap();

    let cleaned_text = fs::read_to_string(&cleaned).unwrap();
    assert_eq!(cleaned_text.lines().count(), 1 + output.records.len());
    assert!(!cleaned_text.contains("GENERAL SERVICES DISTRICT"));

    let summary_text = fs::read_to_string(&summary).unwrap();
    assert!(summary_text.starts_with(
        "City,AverageTotalValueByCity,AverageSalePriceByCity,Rolling30DaySumSalePrice,MedianSalePrice"
    ));

    let df = ParquetReader::new(fs::File::open(&parquet).unwrap()).finish().unwrap();
    assert_eq!(df.height(), output.records.len());

    let report_json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(report_json["retained"], 5);
    assert_eq!(report_json["config"]["rolling_preceding"], 30);
}

#[test]
fn skip_analytics_leaves_summary_empty() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(&dir);
    let config = PipelineConfig {
        skip_analytics: true,
        ..PipelineConfig::default()
    };

    let output = Pipeline::new(config).run_path(&input).unwrap();
    assert!(output.summaries.is_empty());
    assert_eq!(output.records.len(), 5);
}

#[test]
fn unreadable_input_aborts_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.csv");
    assert!(matches!(Pipeline::default().run_path(&missing), Err(HousingError::Io(_))));

    let bad = dir.path().join("bad.csv");
    fs::write(&bad, format!("{HEADER}\nabc,P1,,,2014-01-02,,R,,,,,,,,,,,,\n")).unwrap();
    assert!(matches!(
        Pipeline::default().run_path(&bad),
        Err(HousingError::Load { ref column, .. }) if column == "UniqueID"
    ));
}

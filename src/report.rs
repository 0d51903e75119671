use housing_core::{RunReport, Summary};
use std::time::Duration;

fn money(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("${:.2}", v),
        None => "-".to_string(),
    }
}

pub fn print_run_summary(report: &RunReport, summaries: &[Summary], elapsed: Duration) {
    println!("\n🏠 Nashville Housing Pipeline");
    println!("{}", "=".repeat(60));
    println!("📥 Loaded records:          {}", report.loaded);
    println!("🧹 Addresses backfilled:    {}", report.normalize.backfilled);
    if report.normalize.ambiguous_backfills > 0 {
        println!("⚠️  Ambiguous backfills:     {}", report.normalize.ambiguous_backfills);
    }
    if report.normalize.unresolved_missing_addresses > 0 {
        println!("⚠️  Addresses still missing: {}", report.normalize.unresolved_missing_addresses);
    }
    println!("📍 Addresses parsed:        {}", report.addresses.parsed);
    if report.addresses.malformed > 0 {
        println!("⚠️  Malformed addresses:     {}", report.addresses.malformed);
    }
    println!("🔁 Duplicates removed:      {}", report.duplicates_removed);
    println!("📊 Records retained:        {}", report.retained);

    if !summaries.is_empty() {
        println!("\nCity Summary (rolling window = {} rows)", report.config.window_rows());
        println!("{}", "-".repeat(60));
        println!(
            "{:<20} {:>14} {:>14} {:>16} {:>14}",
            "City", "Avg Value", "Avg Price", "Rolling Sum", "Median Price"
        );
        for summary in summaries {
            println!(
                "{:<20} {:>14} {:>14} {:>16} {:>14}",
                summary.city_label(),
                money(summary.average_total_value),
                money(summary.average_sale_price),
                money(summary.rolling_sum_sale_price),
                money(summary.median_sale_price),
            );
        }
    }

    println!("{}", "=".repeat(60));
    println!("✅ Completed in {:?}", elapsed);
}

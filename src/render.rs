//! Terminal tables for the `report` and `cache stats` commands.

use cache::SnapshotStats;
use chrono::{DateTime, Utc};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, ContentArrangement, Table};
use core_types::{FetchStatus, HeatmapColor, PriceDirection};
use dashboard::{Dashboard, DataSource};
use rust_decimal::Decimal;

pub fn print_dashboard(dashboard: &Dashboard, now: DateTime<Utc>) {
    println!("{}", overview_table(dashboard, now));
    println!("{}", fundamentals_table(dashboard));
    println!("{}", endpoint_table(dashboard));
    if !dashboard.report.monthly.is_empty() {
        println!("Monthly");
        println!("{}", monthly_table(dashboard));
    }
    if !dashboard.report.weekly.is_empty() {
        println!("Weekly");
        println!("{}", weekly_table(dashboard));
    }
    println!("Daily volume heatmap");
    println!("{}", daily_table(dashboard));
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn pct(value: Decimal) -> String {
    format!("{:.2}%", value)
}

fn money(value: Decimal) -> String {
    format!("{:.2}", value)
}

fn signed_cell(value: Decimal) -> Cell {
    let cell = Cell::new(pct(value));
    if value > Decimal::ZERO {
        cell.fg(Color::Green)
    } else if value < Decimal::ZERO {
        cell.fg(Color::Red)
    } else {
        cell
    }
}

fn overview_table(dashboard: &Dashboard, now: DateTime<Utc>) -> Table {
    let stats = &dashboard.report.stats;
    let source = match dashboard.source {
        DataSource::Cache => format!(
            "cache ({} min old)",
            (now - dashboard.last_fetched).num_minutes().max(0)
        ),
        DataSource::Network => "network".to_string(),
    };
    let day = |date: Option<chrono::NaiveDate>| date.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string());

    let mut table = new_table(vec!["Overview", ""]);
    table
        .add_row(vec![Cell::new("Symbol"), Cell::new(&dashboard.query.symbol)])
        .add_row(vec![
            Cell::new("Requested range"),
            Cell::new(format!("{} to {}", dashboard.query.start_date, dashboard.query.end_date)),
        ])
        .add_row(vec![Cell::new("Source"), Cell::new(source)])
        .add_row(vec![
            Cell::new("Trading days"),
            Cell::new(stats.total_trading_days),
        ])
        .add_row(vec![Cell::new("Total return"), signed_cell(stats.total_return)])
        .add_row(vec![Cell::new("Avg daily return"), signed_cell(stats.avg_daily_return)])
        .add_row(vec![Cell::new("Volatility"), Cell::new(pct(stats.volatility))])
        .add_row(vec![Cell::new("Sharpe ratio"), Cell::new(money(stats.sharpe_ratio))])
        .add_row(vec![Cell::new("Max drawdown"), Cell::new(pct(stats.max_drawdown))])
        .add_row(vec![Cell::new("Win rate"), Cell::new(pct(stats.win_rate))])
        .add_row(vec![
            Cell::new("Best day"),
            Cell::new(format!("{} ({})", day(stats.best_day.date), pct(stats.best_day.daily_return))),
        ])
        .add_row(vec![
            Cell::new("Worst day"),
            Cell::new(format!("{} ({})", day(stats.worst_day.date), pct(stats.worst_day.daily_return))),
        ])
        .add_row(vec![
            Cell::new("Price range"),
            Cell::new(format!("{} - {}", money(stats.price_range.min), money(stats.price_range.max))),
        ])
        .add_row(vec![Cell::new("Total volume"), Cell::new(stats.total_volume)])
        .add_row(vec![
            Cell::new("Avg daily volume"),
            Cell::new(stats.avg_daily_volume.round_dp(0)),
        ]);
    table
}

fn fundamentals_table(dashboard: &Dashboard) -> Table {
    let mut table = new_table(vec!["Fundamentals", ""]);

    match &dashboard.company_rating {
        Some(rating) => table.add_row(vec![
            Cell::new("Rating"),
            Cell::new(format!("{} (overall {}/5)", rating.rating, rating.overall_score)),
        ]),
        None => table.add_row(vec!["Rating", "-"]),
    };

    match &dashboard.price_targets {
        Some(target) => {
            let last_close = dashboard
                .report
                .records
                .iter()
                .max_by_key(|r| r.raw.date)
                .map(|r| r.raw.close);
            let upside = last_close
                .and_then(|close| target.consensus_upside_pct(close))
                .map(pct)
                .unwrap_or_else(|| "-".to_string());
            table
                .add_row(vec![
                    Cell::new("Price target"),
                    Cell::new(format!(
                        "{} (low {}, high {})",
                        money(target.target_consensus),
                        money(target.target_low),
                        money(target.target_high)
                    )),
                ])
                .add_row(vec![Cell::new("Upside vs last close"), Cell::new(upside)]);
        }
        None => {
            table.add_row(vec!["Price target", "-"]);
        }
    }

    match dashboard.analyst_estimates.first() {
        Some(estimate) => table.add_row(vec![
            Cell::new("Analyst estimates"),
            Cell::new(format!(
                "{} periods; {} EPS avg {} (revenue avg {})",
                dashboard.analyst_estimates.len(),
                estimate.date,
                money(estimate.eps_avg),
                estimate.revenue_avg.round_dp(0)
            )),
        ]),
        None => table.add_row(vec!["Analyst estimates", "-"]),
    };

    table
}

fn endpoint_table(dashboard: &Dashboard) -> Table {
    let mut table = new_table(vec!["Endpoint", "Status"]);
    for endpoint in core_types::Endpoint::ALL {
        let status = match dashboard.fetch_status.get(endpoint) {
            FetchStatus::Success => Cell::new("ok").fg(Color::Green),
            FetchStatus::Pending => Cell::new("pending"),
            FetchStatus::Failed { message } => Cell::new(format!("error: {message}")).fg(Color::Red),
        };
        table.add_row(vec![Cell::new(endpoint), status]);
    }
    table
}

fn monthly_table(dashboard: &Dashboard) -> Table {
    let mut table = new_table(vec![
        "Month", "Return", "Avg volatility", "Volume", "High", "Low", "Days", "Win rate",
    ]);
    for month in &dashboard.report.monthly {
        table.add_row(vec![
            Cell::new(format!("{} {}", month.month, month.year)),
            signed_cell(month.monthly_return),
            Cell::new(pct(month.avg_volatility)),
            Cell::new(month.total_volume),
            Cell::new(money(month.highest_price)),
            Cell::new(money(month.lowest_price)),
            Cell::new(month.trading_days),
            Cell::new(pct(month.win_rate)),
        ]);
    }
    table
}

fn weekly_table(dashboard: &Dashboard) -> Table {
    let mut table = new_table(vec![
        "Week", "Return", "Avg volatility", "Volume", "High", "Low", "Days",
    ]);
    for week in &dashboard.report.weekly {
        table.add_row(vec![
            Cell::new(format!("{} to {}", week.week_start, week.week_end)),
            signed_cell(week.weekly_return),
            Cell::new(pct(week.avg_volatility)),
            Cell::new(week.total_volume),
            Cell::new(money(week.highest_price)),
            Cell::new(money(week.lowest_price)),
            Cell::new(week.trading_days),
        ]);
    }
    table
}

fn heatmap_cell(color: HeatmapColor) -> Cell {
    let terminal_color = match color {
        HeatmapColor::PaleGreen => Color::DarkGreen,
        HeatmapColor::Green => Color::Green,
        HeatmapColor::Yellow => Color::Yellow,
        HeatmapColor::Orange => Color::DarkYellow,
        HeatmapColor::Red => Color::Red,
    };
    Cell::new("█".repeat(usize::from(color.ordinal()) + 1)).fg(terminal_color)
}

fn daily_table(dashboard: &Dashboard) -> Table {
    let mut table = new_table(vec![
        "Date", "Close", "Return", "", "Volume", "Level", "Percentile", "Heat", "Volatility",
    ]);

    let mut records: Vec<_> = dashboard.report.records.iter().collect();
    records.sort_by_key(|r| r.raw.date);

    for (record, day) in records.iter().zip(&dashboard.report.daily) {
        let arrow = match record.price_direction {
            PriceDirection::Up => Cell::new(record.price_direction.arrow()).fg(Color::Green),
            PriceDirection::Down => Cell::new(record.price_direction.arrow()).fg(Color::Red),
            PriceDirection::Flat => Cell::new(record.price_direction.arrow()),
        };
        table.add_row(vec![
            Cell::new(record.raw.date),
            Cell::new(money(record.raw.close)),
            signed_cell(day.daily_return),
            arrow,
            Cell::new(record.raw.volume),
            Cell::new(record.volume_level),
            Cell::new(record.volume_percentile.round_dp(1)),
            heatmap_cell(record.volume_heatmap_color),
            Cell::new(pct(record.volatility)),
        ]);
    }
    table
}

pub fn cache_stats_table(stats: &[SnapshotStats]) -> Table {
    let mut table = new_table(vec![
        "Symbol", "Date range", "Age (min)", "API calls", "Completed", "Size (bytes)",
    ]);
    for entry in stats {
        table.add_row(vec![
            Cell::new(&entry.symbol),
            Cell::new(&entry.date_range),
            Cell::new(entry.data_age_minutes),
            Cell::new(entry.api_calls_count),
            Cell::new(format!("{}/{}", entry.completed_calls, entry.total_calls)),
            Cell::new(entry.total_size),
        ]);
    }
    table
}

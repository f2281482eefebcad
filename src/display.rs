use crate::heatmap::HeatmapData;
use crate::models::{ActivityEvent, ActivityMetrics, MaintenanceWindow};
use crate::recommender::time_description;
use chrono::{Local, TimeZone};
use colored::*;
use comfy_table::{Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};

pub fn print_warning(message: &str) {
    eprintln!("{} {}", "Warning:".yellow(), message);
}

pub fn print_error(message: &str) {
    eprintln!("{} {}", "Error:".red(), message);
}

pub fn print_info(message: &str) {
    println!("{} {}", "Info:".blue(), message);
}

fn print_header(title: &str) {
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
    println!("{}", "═".repeat(72).bright_black());
    println!(
        "{}  {}",
        title.bright_blue().bold(),
        format!("Generated {}", timestamp).dimmed()
    );
    println!("{}", "═".repeat(72).bright_black());
    println!();
}

fn format_timestamp(millis: i64, date_format: &str) -> String {
    match Local.timestamp_millis_opt(millis).single() {
        Some(dt) => dt.format(date_format).to_string(),
        None => millis.to_string(),
    }
}

/// Unicode bar scaled to a 0-100 intensity
fn activity_bar(intensity: f64, width: usize) -> String {
    let filled = ((intensity / 100.0) * width as f64).round() as usize;
    let filled = filled.min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

pub fn display_metrics_enhanced(metrics: &ActivityMetrics, date_format: &str) {
    print_header("📊 Activity Metrics");

    println!("{}", "📈 Summary".bright_green().bold());
    println!(
        "  Total Activities (30d): {}",
        metrics.total_activities.to_string().bright_white().bold()
    );
    println!(
        "  Last 24 Hours:          {}",
        metrics.last_24_hours.to_string().bright_white()
    );
    println!(
        "  Last 7 Days:            {}",
        metrics.last_7_days.to_string().bright_white()
    );
    println!(
        "  Peak Hour:              {}",
        time_description(metrics.peak_hour, 1).bright_red()
    );
    println!(
        "  Quietest Hour:          {}",
        time_description(metrics.low_activity_hour, 1).bright_green()
    );
    println!(
        "  Last Updated:           {}",
        format_timestamp(metrics.last_updated, date_format).dimmed()
    );
    println!();
    println!("{}", "═".repeat(72).bright_black());
}

pub fn display_metrics_table(metrics: &ActivityMetrics, date_format: &str) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            Cell::new("Metric").fg(Color::Cyan),
            Cell::new("Value").fg(Color::Cyan),
        ]);

    table.add_row(vec![
        Cell::new("Total Activities (30d)"),
        Cell::new(metrics.total_activities),
    ]);
    table.add_row(vec![
        Cell::new("Last 24 Hours"),
        Cell::new(metrics.last_24_hours),
    ]);
    table.add_row(vec![Cell::new("Last 7 Days"), Cell::new(metrics.last_7_days)]);
    table.add_row(vec![
        Cell::new("Peak Hour"),
        Cell::new(time_description(metrics.peak_hour, 1)),
    ]);
    table.add_row(vec![
        Cell::new("Quietest Hour"),
        Cell::new(time_description(metrics.low_activity_hour, 1)),
    ]);
    table.add_row(vec![
        Cell::new("Last Updated"),
        Cell::new(format_timestamp(metrics.last_updated, date_format)),
    ]);

    println!("{}", table);
}

pub fn display_metrics_json(metrics: &ActivityMetrics) {
    match serde_json::to_string_pretty(metrics) {
        Ok(json) => println!("{}", json),
        Err(e) => print_error(&format!("failed to serialize metrics: {}", e)),
    }
}

pub fn display_windows_enhanced(windows: &[MaintenanceWindow]) {
    print_header("🔧 Recommended Maintenance Windows");

    if windows.is_empty() {
        print_info("No viable low-activity window found; every candidate crosses a busy hour");
        return;
    }

    for (rank, window) in windows.iter().enumerate() {
        let confidence_display = format!("{:.0}%", window.confidence);
        let confidence_colored = if window.confidence >= 75.0 {
            confidence_display.bright_green()
        } else if window.confidence >= 50.0 {
            confidence_display.yellow()
        } else {
            confidence_display.red()
        };
        println!(
            "  {}. {}  {} {}  {} {}",
            (rank + 1).to_string().bold(),
            window.description.bright_white().bold(),
            "confidence".dimmed(),
            confidence_colored,
            "est. activity".dimmed(),
            window.estimated_activity.to_string().bright_white()
        );
    }
    println!();
    println!("{}", "═".repeat(72).bright_black());
}

pub fn display_windows_table(windows: &[MaintenanceWindow]) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            Cell::new("#").fg(Color::Cyan),
            Cell::new("Window").fg(Color::Cyan),
            Cell::new("Est. Activity").fg(Color::Cyan),
            Cell::new("Confidence").fg(Color::Cyan),
        ]);

    for (rank, window) in windows.iter().enumerate() {
        table.add_row(vec![
            Cell::new(rank + 1),
            Cell::new(&window.description),
            Cell::new(window.estimated_activity),
            Cell::new(format!("{:.0}%", window.confidence)),
        ]);
    }

    println!("{}", table);
}

pub fn display_windows_json(windows: &[MaintenanceWindow]) {
    match serde_json::to_string_pretty(windows) {
        Ok(json) => println!("{}", json),
        Err(e) => print_error(&format!("failed to serialize windows: {}", e)),
    }
}

pub fn display_heatmap(heatmap: &HeatmapData) {
    print_header("🗓️ Activity Heatmap");

    println!("{}", "Hourly (trailing 7 days)".bright_green().bold());
    for bucket in &heatmap.hourly {
        println!(
            "  {:>5} {} {}",
            bucket.label.dimmed(),
            activity_bar(bucket.intensity, 30),
            bucket.activity
        );
    }
    println!();

    println!("{}", "Daily (trailing 7 days)".bright_green().bold());
    for bucket in &heatmap.daily {
        println!(
            "  {:>5} {} {}",
            bucket.label.dimmed(),
            activity_bar(bucket.intensity, 30),
            bucket.activity
        );
    }
    println!();
    println!("{}", "═".repeat(72).bright_black());
}

pub fn display_heatmap_json(heatmap: &HeatmapData) {
    match serde_json::to_string_pretty(heatmap) {
        Ok(json) => println!("{}", json),
        Err(e) => print_error(&format!("failed to serialize heatmap: {}", e)),
    }
}

pub fn display_logs_table(events: &[ActivityEvent], date_format: &str) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            Cell::new("Time").fg(Color::Cyan),
            Cell::new("Action").fg(Color::Cyan),
            Cell::new("User").fg(Color::Cyan),
            Cell::new("Metadata").fg(Color::Cyan),
        ]);

    for event in events {
        let metadata = if event.metadata.is_empty() {
            String::new()
        } else {
            serde_json::to_string(&event.metadata).unwrap_or_default()
        };
        table.add_row(vec![
            Cell::new(format_timestamp(event.timestamp, date_format)),
            Cell::new(&event.action),
            Cell::new(&event.user_id),
            Cell::new(metadata),
        ]);
    }

    println!("{}", table);
}

pub fn display_logs_json(events: &[ActivityEvent]) {
    match serde_json::to_string_pretty(events) {
        Ok(json) => println!("{}", json),
        Err(e) => print_error(&format!("failed to serialize logs: {}", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_bar_scales_with_intensity() {
        assert_eq!(activity_bar(0.0, 10), "░░░░░░░░░░");
        assert_eq!(activity_bar(100.0, 10), "██████████");
        assert_eq!(activity_bar(50.0, 10), "█████░░░░░");
    }

    #[test]
    fn test_activity_bar_clamps_overflow() {
        assert_eq!(activity_bar(150.0, 4), "████");
    }

    #[test]
    fn test_format_timestamp_uses_date_format() {
        let millis = Local
            .with_ymd_and_hms(2026, 6, 1, 12, 0, 0)
            .unwrap()
            .timestamp_millis();
        assert_eq!(format_timestamp(millis, "%Y"), "2026");
    }
}

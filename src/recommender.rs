use crate::error::{MaintlyticsError, Result};
use crate::helpers::compare_floats;
use crate::models::{ActivityMetrics, MaintenanceWindow};

/// Maximum number of windows returned per prediction
const MAX_RECOMMENDATIONS: usize = 5;
/// A window is only viable when every hour in it stays at or below this
/// fraction of the peak hourly activity
const HIGH_ACTIVITY_THRESHOLD: f64 = 0.3;

/// Rank candidate maintenance windows of `duration_hours` by how little
/// historical activity falls within them
///
/// Scans all 24 start hours, sums the hourly pattern over each wrapped
/// span, drops any window containing an hour busier than 30% of the peak
/// hour, and returns the 5 quietest windows. Without metrics a fixed set
/// of three overnight defaults is returned instead.
pub fn predict_optimal_windows(
    metrics: Option<&ActivityMetrics>,
    duration_hours: u32,
) -> Result<Vec<MaintenanceWindow>> {
    if !(1..=24).contains(&duration_hours) {
        return Err(MaintlyticsError::validation_error(
            "duration_hours",
            "must be between 1 and 24",
        ));
    }

    let Some(metrics) = metrics else {
        return Ok(default_windows());
    };

    let pattern = &metrics.hourly_pattern;
    let peak = *pattern.iter().max().unwrap_or(&0);
    let threshold = peak as f64 * HIGH_ACTIVITY_THRESHOLD;

    let mut recommendations = Vec::new();
    for start_hour in 0..24u32 {
        let mut total_activity = 0u64;
        let mut viable = true;

        for offset in 0..duration_hours {
            let hour = ((start_hour + offset) % 24) as usize;
            total_activity += pattern[hour];
            if pattern[hour] as f64 > threshold {
                viable = false;
                break;
            }
        }

        if viable {
            recommendations.push(MaintenanceWindow {
                start_hour,
                end_hour: (start_hour + duration_hours) % 24,
                estimated_activity: total_activity,
                confidence: calculate_confidence(total_activity, pattern),
                description: time_description(start_hour, duration_hours),
            });
        }
    }

    recommendations.sort_by(|a, b| {
        a.estimated_activity
            .cmp(&b.estimated_activity)
            .then_with(|| compare_floats(b.confidence, a.confidence))
    });
    recommendations.truncate(MAX_RECOMMENDATIONS);
    Ok(recommendations)
}

/// Confidence (0-100) that a window with `window_activity` events is a
/// safe maintenance slot, relative to the average hourly activity
///
/// The denominator assumes a 2-hour baseline window regardless of the
/// requested duration; kept as-is for compatibility with historical
/// scores.
fn calculate_confidence(window_activity: u64, pattern: &[u64; 24]) -> f64 {
    let total: u64 = pattern.iter().sum();
    let average = total as f64 / 24.0;
    if average == 0.0 {
        return 50.0;
    }
    let ratio = window_activity as f64 / (average * 2.0);
    ((1.0 - ratio) * 100.0).clamp(0.0, 100.0)
}

/// 12-hour-clock rendering of a window's time range
pub fn time_description(start_hour: u32, duration_hours: u32) -> String {
    let end_hour = (start_hour + duration_hours) % 24;
    format!("{} - {}", format_hour(start_hour), format_hour(end_hour))
}

fn format_hour(hour: u32) -> String {
    let period = if hour >= 12 { "PM" } else { "AM" };
    let display_hour = match hour {
        0 => 12,
        h if h > 12 => h - 12,
        h => h,
    };
    format!("{}:00 {}", display_hour, period)
}

/// Fixed overnight windows returned when no activity data exists yet
fn default_windows() -> Vec<MaintenanceWindow> {
    vec![
        MaintenanceWindow {
            start_hour: 2,
            end_hour: 4,
            estimated_activity: 0,
            confidence: 70.0,
            description: "2:00 AM - 4:00 AM (Default low-activity period)".to_string(),
        },
        MaintenanceWindow {
            start_hour: 3,
            end_hour: 5,
            estimated_activity: 0,
            confidence: 65.0,
            description: "3:00 AM - 5:00 AM (Default low-activity period)".to_string(),
        },
        MaintenanceWindow {
            start_hour: 1,
            end_hour: 3,
            estimated_activity: 0,
            confidence: 60.0,
            description: "1:00 AM - 3:00 AM (Default low-activity period)".to_string(),
        },
    ]
}

use crate::models::ActivityMetrics;
use serde::Serialize;

const DAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Normalized view of the hourly and daily patterns for visualization
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HeatmapData {
    pub hourly: Vec<HourlyBucket>,
    pub daily: Vec<DailyBucket>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HourlyBucket {
    pub hour: u32,
    pub activity: u64,
    /// 0-100, normalized against the busiest hour
    pub intensity: f64,
    pub label: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DailyBucket {
    pub day: u32,
    pub activity: u64,
    /// 0-100, normalized against the busiest day
    pub intensity: f64,
    pub label: String,
}

/// Derive heatmap buckets from the metrics document, or `None` when no
/// metrics exist yet
///
/// Each series is normalized against its own maximum; an all-zero series
/// maps to zero intensity throughout.
pub fn heatmap_data(metrics: Option<&ActivityMetrics>) -> Option<HeatmapData> {
    let metrics = metrics?;

    let max_hourly = *metrics.hourly_pattern.iter().max().unwrap_or(&0);
    let max_daily = *metrics.daily_pattern.iter().max().unwrap_or(&0);

    let hourly = metrics
        .hourly_pattern
        .iter()
        .enumerate()
        .map(|(hour, &activity)| HourlyBucket {
            hour: hour as u32,
            activity,
            intensity: intensity(activity, max_hourly),
            label: format!("{}:00", hour),
        })
        .collect();

    let daily = metrics
        .daily_pattern
        .iter()
        .enumerate()
        .map(|(day, &activity)| DailyBucket {
            day: day as u32,
            activity,
            intensity: intensity(activity, max_daily),
            label: DAY_LABELS[day].to_string(),
        })
        .collect();

    Some(HeatmapData { hourly, daily })
}

fn intensity(activity: u64, max: u64) -> f64 {
    if max > 0 {
        (activity as f64 / max as f64) * 100.0
    } else {
        0.0
    }
}

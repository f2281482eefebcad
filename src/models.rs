use chrono::{DateTime, Datelike, Local, Timelike};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Sentinel user id recorded when the caller does not identify the user
pub const ANONYMOUS_USER: &str = "anonymous";

/// A single timestamped record of a user action, the atomic unit of the log
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActivityEvent {
    pub id: String,
    /// Milliseconds since epoch at capture time
    pub timestamp: i64,
    /// Hour of day (0-23) derived from the timestamp in local time
    #[serde(rename = "hourOfDay")]
    pub hour_of_day: u32,
    /// Day of week (0-6, 0 = Sunday) derived from the timestamp in local time
    #[serde(rename = "dayOfWeek")]
    pub day_of_week: u32,
    pub action: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    /// Action-specific key-value payload, opaque to the recommender
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl ActivityEvent {
    /// Build an event for `action` captured at `now`, deriving the
    /// hour-of-day and day-of-week buckets in local time
    pub fn record(
        action: &str,
        user_id: Option<&str>,
        metadata: Map<String, Value>,
        now: DateTime<Local>,
    ) -> Self {
        ActivityEvent {
            id: Uuid::new_v4().to_string(),
            timestamp: now.timestamp_millis(),
            hour_of_day: now.hour(),
            day_of_week: now.weekday().num_days_from_sunday(),
            action: action.to_string(),
            user_id: user_id.unwrap_or(ANONYMOUS_USER).to_string(),
            metadata,
        }
    }
}

/// Summary statistics derived from the activity log
///
/// A pure fold over the current log: recomputed wholesale after every log
/// mutation and overwritten in storage as a single document. The hourly and
/// daily patterns only count events within the trailing 7 days; the scalar
/// totals cover the full retained (30-day) log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActivityMetrics {
    #[serde(rename = "totalActivities")]
    pub total_activities: u64,
    #[serde(rename = "last24Hours")]
    pub last_24_hours: u64,
    #[serde(rename = "last7Days")]
    pub last_7_days: u64,
    /// Event counts bucketed by hour of day, index = hour
    #[serde(rename = "hourlyPattern")]
    pub hourly_pattern: [u64; 24],
    /// Event counts bucketed by day of week, index = day (0 = Sunday)
    #[serde(rename = "dailyPattern")]
    pub daily_pattern: [u64; 7],
    /// Index of the busiest hour (first index on ties)
    #[serde(rename = "peakHour")]
    pub peak_hour: u32,
    /// Index of the quietest hour (first index on ties)
    #[serde(rename = "lowActivityHour")]
    pub low_activity_hour: u32,
    /// Milliseconds since epoch of this recomputation
    #[serde(rename = "lastUpdated")]
    pub last_updated: i64,
}

/// A proposed contiguous span of hours recommended as low-disruption
/// for taking the system offline. Computed on demand, never persisted.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MaintenanceWindow {
    #[serde(rename = "startHour")]
    pub start_hour: u32,
    /// End hour, wrapping past midnight (`(start + duration) % 24`)
    #[serde(rename = "endHour")]
    pub end_hour: u32,
    /// Sum of the hourly pattern over the window's span
    #[serde(rename = "estimatedActivity")]
    pub estimated_activity: u64,
    /// Heuristic score (0-100) of how much quieter this window is
    /// than the historical average
    pub confidence: f64,
    /// Human-readable 12-hour-clock rendering of the time range
    pub description: String,
}

use crate::models::{ActivityEvent, ActivityMetrics};
use anyhow::Result;
use csv::Writer;
use std::fs::File;
use std::path::Path;

pub fn export_logs_to_csv(events: &[ActivityEvent], path: &Path) -> Result<()> {
    let mut wtr = Writer::from_writer(File::create(path)?);

    // Write header
    wtr.write_record([
        "Id",
        "Timestamp",
        "Hour Of Day",
        "Day Of Week",
        "Action",
        "User Id",
        "Metadata",
    ])?;

    // Write data
    for event in events {
        let metadata = if event.metadata.is_empty() {
            String::new()
        } else {
            serde_json::to_string(&event.metadata)?
        };
        wtr.write_record(&[
            event.id.clone(),
            event.timestamp.to_string(),
            event.hour_of_day.to_string(),
            event.day_of_week.to_string(),
            event.action.clone(),
            event.user_id.clone(),
            metadata,
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

pub fn export_patterns_to_csv(metrics: &ActivityMetrics, path: &Path) -> Result<()> {
    let mut wtr = Writer::from_writer(File::create(path)?);

    wtr.write_record(["Series", "Bucket", "Activity"])?;

    for (hour, count) in metrics.hourly_pattern.iter().enumerate() {
        wtr.write_record(&["hourly".to_string(), hour.to_string(), count.to_string()])?;
    }
    for (day, count) in metrics.daily_pattern.iter().enumerate() {
        wtr.write_record(&["daily".to_string(), day.to_string(), count.to_string()])?;
    }

    wtr.flush()?;
    Ok(())
}

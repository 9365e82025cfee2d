use time::{Duration, OffsetDateTime};

/// Humanized distance between `then` and `now`, e.g. "3 days ago".
pub fn relative_date(then: OffsetDateTime, now: OffsetDateTime) -> String {
    let delta = now - then;
    let phrase = humanize(delta.abs());
    if delta.is_negative() {
        format!("in {}", phrase)
    } else {
        format!("{} ago", phrase)
    }
}

fn humanize(d: Duration) -> String {
    let secs = d.whole_seconds();
    let mins = (secs as f64 / 60.0).round() as i64;
    let hours = (secs as f64 / 3600.0).round() as i64;
    let days = (secs as f64 / 86400.0).round() as i64;

    match secs {
        s if s < 45 => "a few seconds".to_string(),
        s if s < 90 => "a minute".to_string(),
        s if s < 45 * 60 => format!("{} minutes", mins),
        s if s < 90 * 60 => "an hour".to_string(),
        s if s < 22 * 3600 => format!("{} hours", hours),
        s if s < 36 * 3600 => "a day".to_string(),
        s if s < 26 * 86400 => format!("{} days", days),
        s if s < 45 * 86400 => "a month".to_string(),
        s if s < 320 * 86400 => format!("{} months", (days as f64 / 30.0).round() as i64),
        s if s < 548 * 86400 => "a year".to_string(),
        _ => format!("{} years", (days as f64 / 365.0).round() as i64),
    }
}

use std::{error, fmt};

/// Returned for durations that can not be displayed (negative, NaN, infinite).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvalidArgument {
    pub seconds: f64,
}

impl error::Error for InvalidArgument {}

impl fmt::Display for InvalidArgument {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Duration must be a finite, non-negative number of seconds, got {}.",
            self.seconds
        )
    }
}

/// Formats a number of seconds as a travel time label like `"2 hours 5 mins"`.
///
/// Seconds are rounded to whole minutes. Hours are pluralized, minutes are
/// always labeled "mins".
pub fn format_duration(seconds: f64) -> Result<String, InvalidArgument> {
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(InvalidArgument { seconds });
    }
    let total_minutes = (seconds / 60.0).round() as u64;
    Ok(format_minutes(total_minutes))
}

/// Same as [`format_duration`] for whole seconds, which are always valid.
pub fn format_duration_secs(seconds: u64) -> String {
    let total_minutes = seconds / 60 + u64::from(seconds % 60 >= 30);
    format_minutes(total_minutes)
}

fn format_minutes(total_minutes: u64) -> String {
    if total_minutes < 60 {
        return format!("{} mins", total_minutes);
    }

    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;
    let unit = if hours == 1 { "hour" } else { "hours" };
    if minutes > 0 {
        format!("{} {} {} mins", hours, unit, minutes)
    } else {
        format!("{} {}", hours, unit)
    }
}

use chrono::{DateTime, NaiveTime, TimeZone, Timelike, Utc};

use crate::error::ClockError;

pub(crate) const PLACEHOLDER_TIME: &str = "00:00";

/// The program currently scheduled on the channel. Read once, never
/// mutated by the display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AiringWindow {
    pub title: String,
    pub url: Option<String>,
    /// "HH:MM", UTC.
    pub start_time: Option<String>,
    /// "HH:MM", UTC.
    pub end_time: Option<String>,
}

impl AiringWindow {
    pub fn is_airing(&self) -> bool {
        self.start_time.is_some() && self.end_time.is_some()
    }
}

/// A 12-hour clock face. `am` and `pm` are both false for the placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockReading {
    pub display: String,
    pub am: bool,
    pub pm: bool,
}

impl ClockReading {
    pub fn placeholder() -> Self {
        Self {
            display: PLACEHOLDER_TIME.to_string(),
            am: false,
            pm: false,
        }
    }

    pub fn suffix(&self) -> &'static str {
        if self.pm {
            "PM"
        } else if self.am {
            "AM"
        } else {
            "--"
        }
    }
}

/// Convert an "HH:MM" UTC time of day into a 12-hour reading in `zone`,
/// anchored on the UTC date of `today`.
pub fn to_zone<Tz: TimeZone>(
    utc_hhmm: &str,
    today: DateTime<Utc>,
    zone: &Tz,
) -> Result<ClockReading, ClockError> {
    let time = NaiveTime::parse_from_str(utc_hhmm.trim(), "%H:%M")
        .map_err(|_| ClockError::Invalid(utc_hhmm.to_string()))?;
    let at = Utc
        .from_utc_datetime(&today.date_naive().and_time(time))
        .with_timezone(zone);
    let (is_pm, hour) = at.hour12();
    Ok(ClockReading {
        display: format!("{hour:02}:{:02}", at.minute()),
        am: !is_pm,
        pm: is_pm,
    })
}

/// Format an optional "HH:MM" UTC time for display in the local zone.
/// Missing or unparseable input yields the placeholder.
pub fn format_local(utc_hhmm: Option<&str>) -> ClockReading {
    let Some(raw) = utc_hhmm else {
        return ClockReading::placeholder();
    };
    match to_zone(raw, Utc::now(), &chrono::Local) {
        Ok(reading) => reading,
        Err(e) => {
            tracing::warn!("airing time: {e}");
            ClockReading::placeholder()
        }
    }
}

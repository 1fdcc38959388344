use chrono::{DateTime, Utc};

/// Display format for stored timestamps
pub const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M";

/// Source of creation/modification timestamps
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    fn stamp(&self) -> String {
        self.now().format(TIMESTAMP_FORMAT).to_string()
    }
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to a single instant
#[cfg(test)]
pub struct FixedClock(pub DateTime<Utc>);

#[cfg(test)]
impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_stamp_uses_display_format() {
        let clock = FixedClock(Utc.with_ymd_and_hms(2025, 3, 7, 9, 5, 59).unwrap());
        assert_eq!(clock.stamp(), "2025/03/07 09:05");
    }
}

use core::fmt::{self, Display};
use std::time::{SystemTime, UNIX_EPOCH};

/// Wall-clock timestamp, in UTC
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Default)]
pub struct TimeStamp {
    pub year        : u16,
    pub month       : u8,
    pub day_of_week : u8,
    pub day         : u8,
    pub hour        : u8,
    pub minute      : u8,
    pub second      : u8,
    pub millisecond : u16,
}

impl TimeStamp {
    const MILLIS_PER_DAY: u64 = 24 * 60 * 60 * 1000;

    /// Create a timestamp from the number of milliseconds since the unix epoch.
    pub fn from_unix_millis(millis: u64) -> Self {
        let days = millis / Self::MILLIS_PER_DAY;
        let day_millis = millis % Self::MILLIS_PER_DAY;

        let (year, month, day) = civil_from_days(days as i64);
        // 1970-01-01 was a thursday, 0 == sunday
        let day_of_week = ((days + 4) % 7) as u8;

        Self {
            year,
            month,
            day_of_week,
            day,
            hour: (day_millis / 3_600_000) as u8,
            minute: (day_millis / 60_000 % 60) as u8,
            second: (day_millis / 1000 % 60) as u8,
            millisecond: (day_millis % 1000) as u16,
        }
    }
}

// TODO: customizable formatter
impl Display for TimeStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!("{}-{:02}-{:02} {:02}:{:02}:{:02}.{:03}", self.year, self.month, self.day, self.hour, self.minute, self.second, self.millisecond))
    }
}

/// Get the current timestamp.
///
/// A clock set before the unix epoch results in the epoch itself.
pub fn get_timestamp() -> TimeStamp {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |dur| dur.as_millis() as u64);
    TimeStamp::from_unix_millis(millis)
}

// Days since 1970-01-01 to a (year, month, day) in the proleptic gregorian calendar.
fn civil_from_days(days: i64) -> (u16, u8, u8) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400 + if month <= 2 { 1 } else { 0 };
    (year as u16, month as u8, day as u8)
}

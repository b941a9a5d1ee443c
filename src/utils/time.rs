// IST helpers. Batch schedules, session windows and EMI due dates are all
// business-day concepts anchored to Asia/Kolkata (UTC+05:30, no DST).

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};

const IST_OFFSET_SECONDS: i32 = 5 * 3600 + 30 * 60;

pub fn ist_offset() -> FixedOffset {
    // +05:30 is always in range
    FixedOffset::east_opt(IST_OFFSET_SECONDS).expect("valid IST offset")
}

pub fn ist_now() -> DateTime<FixedOffset> {
    Utc::now().with_timezone(&ist_offset())
}

pub fn ist_today() -> NaiveDate {
    ist_now().date_naive()
}

/// Convert a UTC instant to IST
pub fn to_ist(instant: DateTime<Utc>) -> DateTime<FixedOffset> {
    instant.with_timezone(&ist_offset())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_ist_conversion() {
        let utc = Utc.with_ymd_and_hms(2026, 1, 15, 20, 0, 0).unwrap();
        let ist = to_ist(utc);
        // 20:00 UTC is 01:30 next day in IST
        assert_eq!(ist.date_naive(), NaiveDate::from_ymd_opt(2026, 1, 16).unwrap());
        assert_eq!(ist.format("%H:%M").to_string(), "01:30");
    }
}

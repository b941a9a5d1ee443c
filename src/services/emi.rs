// Installment schedule math, lesson gating and batch progress
//
// All date arithmetic here is calendar math in IST; callers pass in the
// current IST instant so everything stays deterministic and testable.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime};
use serde::Serialize;

/// Join buttons appear this long before a session starts
pub const JOIN_WINDOW_MINUTES: i64 = 30;

/// One row of an installment plan before it is persisted
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PlannedInstallment {
    pub installment_number: i32,
    pub amount_paise: i64,
    pub due_date: NaiveDate,
    pub paid: bool,
}

/// Installment amount: the rupee price split n ways, rounded to the
/// nearest paisa
pub fn installment_amount_paise(price_paise: i64, installments: u32) -> i64 {
    (price_paise as f64 / installments as f64).round() as i64
}

/// Days between due dates: the course length split across the plan,
/// never less than one day
pub fn interval_days(session_count: i64, installments: u32) -> i64 {
    (session_count / installments as i64).max(1)
}

/// Build the full plan. The first installment is the one charged at
/// checkout, so it is created already paid.
pub fn build_schedule(
    price_paise: i64,
    installments: u32,
    batch_start: NaiveDate,
    session_count: i64,
) -> Vec<PlannedInstallment> {
    let amount = installment_amount_paise(price_paise, installments);
    let interval = interval_days(session_count, installments);

    (0..installments as i64)
        .map(|i| PlannedInstallment {
            installment_number: (i + 1) as i32,
            amount_paise: amount,
            due_date: batch_start + Duration::days(i * interval),
            paid: i == 0,
        })
        .collect()
}

/// Lessons released per paid installment (ceiling split)
pub fn lessons_per_installment(total_lessons: i64, total_emis: i64) -> i64 {
    if total_emis <= 0 {
        return total_lessons;
    }
    (total_lessons + total_emis - 1) / total_emis
}

/// Highest lesson sequence the student may open
pub fn unlocked_lessons(total_lessons: i64, total_emis: i64, paid_emis: i64) -> i64 {
    (lessons_per_installment(total_lessons, total_emis) * paid_emis).min(total_lessons)
}

/// A lesson is locked when the plan is not fully paid and its sequence
/// sits past the unlocked window
pub fn is_lesson_locked(sequence: i32, fully_paid: bool, unlocked: i64) -> bool {
    !fully_paid && sequence as i64 > unlocked
}

/// Lesson N runs on the Nth day of the batch
pub fn lesson_date(batch_start: NaiveDate, sequence: i32) -> NaiveDate {
    batch_start + Duration::days((sequence - 1) as i64)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MeetingStatus {
    NotStarted,
    Join,
    Completed,
}

impl MeetingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MeetingStatus::NotStarted => "meeting not started",
            MeetingStatus::Join => "join meeting",
            MeetingStatus::Completed => "meeting completed",
        }
    }
}

/// Where a lesson's live session stands relative to now. The join window
/// opens 30 minutes before the session start and closes at its end.
pub fn meeting_status(
    now: DateTime<FixedOffset>,
    lesson_date: NaiveDate,
    start_time: NaiveTime,
    end_time: NaiveTime,
) -> MeetingStatus {
    let now_local = now.naive_local();
    let opens = lesson_date.and_time(start_time) - Duration::minutes(JOIN_WINDOW_MINUTES);
    let closes = lesson_date.and_time(end_time);

    if now_local < opens {
        MeetingStatus::NotStarted
    } else if now_local <= closes {
        MeetingStatus::Join
    } else {
        MeetingStatus::Completed
    }
}

/// Day-level progress through a batch
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BatchProgress {
    pub total_days: i64,
    pub days_completed: i64,
    pub total_lessons: i64,
    pub completed_lessons: i64,
    pub percent: i32,
}

/// Progress is counted in whole days since the batch start; today's
/// session counts once its end time has passed.
pub fn batch_progress(
    now: DateTime<FixedOffset>,
    start: NaiveDate,
    end: NaiveDate,
    session_end_time: NaiveTime,
    total_lessons: i64,
) -> BatchProgress {
    let today = now.date_naive();
    let total_days = (end - start).num_days() + 1;

    let mut days = if today < start {
        0
    } else {
        let mut elapsed = (today - start).num_days();
        if now.time() > session_end_time {
            elapsed += 1;
        }
        elapsed
    };
    days = days.clamp(0, total_days);

    let completed_lessons = days.min(total_lessons);
    let percent = if total_lessons > 0 {
        ((completed_lessons as f64 / total_lessons as f64) * 100.0).round() as i32
    } else {
        0
    };

    BatchProgress {
        total_days,
        days_completed: days,
        total_lessons,
        completed_lessons,
        percent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::time::ist_offset;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn ist(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<FixedOffset> {
        ist_offset()
            .with_ymd_and_hms(y, m, d, h, min, 0)
            .unwrap()
    }

    // ==== AMOUNTS ====

    #[test]
    fn test_installment_amount_splits_evenly() {
        // 30000.00 INR over 3 = 10000.00 each
        assert_eq!(installment_amount_paise(3_000_000, 3), 1_000_000);
    }

    #[test]
    fn test_installment_amount_rounds() {
        // 1000.00 INR over 3 = 333.33 (33333.33.. paise rounds to 33333)
        assert_eq!(installment_amount_paise(100_000, 3), 33_333);
        // 50.00 INR over 3 = 16.67
        assert_eq!(installment_amount_paise(5_000, 3), 1_667);
    }

    // ==== SCHEDULE ====

    #[test]
    fn test_interval_floor_with_minimum() {
        assert_eq!(interval_days(30, 3), 10);
        assert_eq!(interval_days(7, 3), 2);
        // Short course: plan still spaces by at least a day
        assert_eq!(interval_days(2, 3), 1);
        assert_eq!(interval_days(0, 2), 1);
    }

    #[test]
    fn test_schedule_three_installments() {
        let plan = build_schedule(3_000_000, 3, date(2026, 9, 1), 30);
        assert_eq!(plan.len(), 3);

        assert_eq!(plan[0].installment_number, 1);
        assert_eq!(plan[0].due_date, date(2026, 9, 1));
        assert!(plan[0].paid);

        assert_eq!(plan[1].due_date, date(2026, 9, 11));
        assert!(!plan[1].paid);

        assert_eq!(plan[2].due_date, date(2026, 9, 21));
        assert!(!plan[2].paid);
    }

    #[test]
    fn test_schedule_two_installments() {
        let plan = build_schedule(500_000, 2, date(2026, 9, 1), 21);
        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0].amount_paise, 250_000);
        // 21 / 2 floors to 10 days
        assert_eq!(plan[1].due_date, date(2026, 9, 11));
    }

    // ==== LESSON GATING ====

    #[test]
    fn test_lessons_per_installment_ceils() {
        assert_eq!(lessons_per_installment(30, 3), 10);
        assert_eq!(lessons_per_installment(31, 3), 11);
        assert_eq!(lessons_per_installment(1, 3), 1);
    }

    #[test]
    fn test_unlocked_lessons_caps_at_total() {
        // 31 lessons over 3 EMIs: 11 per installment but never above 31
        assert_eq!(unlocked_lessons(31, 3, 1), 11);
        assert_eq!(unlocked_lessons(31, 3, 2), 22);
        assert_eq!(unlocked_lessons(31, 3, 3), 31);
    }

    #[test]
    fn test_lock_rule() {
        let unlocked = unlocked_lessons(30, 3, 1);
        assert!(!is_lesson_locked(10, false, unlocked));
        assert!(is_lesson_locked(11, false, unlocked));
        // Fully paid plans are never locked
        assert!(!is_lesson_locked(30, true, unlocked));
    }

    // ==== MEETING WINDOWS ====

    #[test]
    fn test_meeting_window() {
        let lesson = date(2026, 9, 5);
        let start = time(18, 0);
        let end = time(19, 30);

        // 17:29 is one minute before the window opens
        assert_eq!(
            meeting_status(ist(2026, 9, 5, 17, 29), lesson, start, end),
            MeetingStatus::NotStarted
        );
        assert_eq!(
            meeting_status(ist(2026, 9, 5, 17, 30), lesson, start, end),
            MeetingStatus::Join
        );
        assert_eq!(
            meeting_status(ist(2026, 9, 5, 19, 30), lesson, start, end),
            MeetingStatus::Join
        );
        assert_eq!(
            meeting_status(ist(2026, 9, 5, 19, 31), lesson, start, end),
            MeetingStatus::Completed
        );
    }

    #[test]
    fn test_meeting_other_days() {
        let lesson = date(2026, 9, 5);
        let start = time(18, 0);
        let end = time(19, 30);

        assert_eq!(
            meeting_status(ist(2026, 9, 4, 23, 0), lesson, start, end),
            MeetingStatus::NotStarted
        );
        assert_eq!(
            meeting_status(ist(2026, 9, 6, 9, 0), lesson, start, end),
            MeetingStatus::Completed
        );
    }

    // ==== BATCH PROGRESS ====

    #[test]
    fn test_progress_before_start() {
        let p = batch_progress(
            ist(2026, 8, 30, 12, 0),
            date(2026, 9, 1),
            date(2026, 9, 30),
            time(19, 30),
            30,
        );
        assert_eq!(p.days_completed, 0);
        assert_eq!(p.completed_lessons, 0);
        assert_eq!(p.percent, 0);
        assert_eq!(p.total_days, 30);
    }

    #[test]
    fn test_progress_mid_batch_before_session_end() {
        // Day 10 of the batch, before today's session ends
        let p = batch_progress(
            ist(2026, 9, 10, 12, 0),
            date(2026, 9, 1),
            date(2026, 9, 30),
            time(19, 30),
            30,
        );
        assert_eq!(p.days_completed, 9);
        assert_eq!(p.completed_lessons, 9);
        assert_eq!(p.percent, 30);
    }

    #[test]
    fn test_progress_mid_batch_after_session_end() {
        let p = batch_progress(
            ist(2026, 9, 10, 20, 0),
            date(2026, 9, 1),
            date(2026, 9, 30),
            time(19, 30),
            30,
        );
        assert_eq!(p.days_completed, 10);
        assert_eq!(p.percent, 33);
    }

    #[test]
    fn test_progress_caps_after_batch_end() {
        let p = batch_progress(
            ist(2026, 10, 15, 12, 0),
            date(2026, 9, 1),
            date(2026, 9, 30),
            time(19, 30),
            30,
        );
        assert_eq!(p.days_completed, 30);
        assert_eq!(p.completed_lessons, 30);
        assert_eq!(p.percent, 100);
    }

    #[test]
    fn test_progress_fewer_lessons_than_days() {
        // 10 lessons spread over a 30-day window
        let p = batch_progress(
            ist(2026, 9, 25, 20, 0),
            date(2026, 9, 1),
            date(2026, 9, 30),
            time(19, 30),
            10,
        );
        assert_eq!(p.days_completed, 25);
        assert_eq!(p.completed_lessons, 10);
        assert_eq!(p.percent, 100);
    }
}

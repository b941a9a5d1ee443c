// The student lesson view as a whole: installment gating decides which
// lessons open, the calendar decides which session is joinable.

use chrono::{NaiveDate, NaiveTime, TimeZone};
use learnify_backend_core::services::emi::{
    self, batch_progress, is_lesson_locked, lesson_date, meeting_status, unlocked_lessons,
    MeetingStatus,
};
use learnify_backend_core::utils::time::ist_offset;

const TOTAL_LESSONS: i64 = 30;
const TOTAL_EMIS: i64 = 3;

fn batch_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 9, 1).unwrap()
}

#[test]
fn one_paid_installment_opens_the_first_third() {
    let unlocked = unlocked_lessons(TOTAL_LESSONS, TOTAL_EMIS, 1);
    assert_eq!(unlocked, 10);

    for seq in 1..=10 {
        assert!(!is_lesson_locked(seq, false, unlocked));
    }
    for seq in 11..=30 {
        assert!(is_lesson_locked(seq, false, unlocked));
    }
}

#[test]
fn paying_the_plan_off_unlocks_everything() {
    let unlocked = unlocked_lessons(TOTAL_LESSONS, TOTAL_EMIS, 3);
    assert_eq!(unlocked, TOTAL_LESSONS);
    assert!(!is_lesson_locked(30, true, unlocked));
}

#[test]
fn lessons_land_on_consecutive_batch_days() {
    assert_eq!(lesson_date(batch_start(), 1), batch_start());
    assert_eq!(
        lesson_date(batch_start(), 15),
        NaiveDate::from_ymd_opt(2026, 9, 15).unwrap()
    );
}

#[test]
fn join_window_tracks_the_lesson_day() {
    let start = NaiveTime::from_hms_opt(18, 0, 0).unwrap();
    let end = NaiveTime::from_hms_opt(19, 30, 0).unwrap();
    let day_five = lesson_date(batch_start(), 5);

    let at = |h: u32, m: u32| {
        ist_offset()
            .with_ymd_and_hms(2026, 9, 5, h, m, 0)
            .unwrap()
    };

    assert_eq!(
        meeting_status(at(17, 0), day_five, start, end),
        MeetingStatus::NotStarted
    );
    assert_eq!(
        meeting_status(at(17, 45), day_five, start, end),
        MeetingStatus::Join
    );
    assert_eq!(
        meeting_status(at(20, 0), day_five, start, end),
        MeetingStatus::Completed
    );
}

#[test]
fn progress_and_gating_agree_mid_course() {
    // Evening of day 10: the session is over, ten lessons delivered
    let now = ist_offset()
        .with_ymd_and_hms(2026, 9, 10, 21, 0, 0)
        .unwrap();
    let progress = batch_progress(
        now,
        batch_start(),
        NaiveDate::from_ymd_opt(2026, 9, 30).unwrap(),
        NaiveTime::from_hms_opt(19, 30, 0).unwrap(),
        TOTAL_LESSONS,
    );

    assert_eq!(progress.completed_lessons, 10);
    assert_eq!(progress.percent, 33);

    // A student one installment in can open exactly the delivered lessons
    assert_eq!(
        emi::unlocked_lessons(TOTAL_LESSONS, TOTAL_EMIS, 1),
        progress.completed_lessons
    );
}

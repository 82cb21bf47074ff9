//! Draw round arithmetic.
//!
//! Draws happen every Saturday at 20:45 Korea time, starting with round 1 on
//! 2002-12-07. All functions take the wall clock explicitly as a
//! [`NaiveDateTime`] in KST; [`kst_now`] supplies it in production.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc, Weekday};

const FIRST_DRAW_YEAR: i32 = 2002;
const FIRST_DRAW_MONTH: u32 = 12;
const FIRST_DRAW_DAY: u32 = 7;

pub const DRAW_HOUR: u32 = 20;
pub const DRAW_MINUTE: u32 = 45;

const KST_OFFSET_HOURS: i64 = 9;

fn first_draw_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(FIRST_DRAW_YEAR, FIRST_DRAW_MONTH, FIRST_DRAW_DAY)
        .unwrap_or(NaiveDate::MIN)
}

fn draw_time() -> NaiveTime {
    NaiveTime::from_hms_opt(DRAW_HOUR, DRAW_MINUTE, 0).unwrap_or_default()
}

/// Current wall clock in Korea Standard Time.
pub fn kst_now() -> NaiveDateTime {
    Utc::now().naive_utc() + Duration::hours(KST_OFFSET_HOURS)
}

/// 從第一期開始經過幾週 + 1
pub fn draw_number_by_date(date: NaiveDateTime) -> i32 {
    let first = first_draw_date().and_time(NaiveTime::default());
    let weeks = (date - first).num_days() / 7;
    weeks as i32 + 1
}

/// Latest round whose draw has taken place at `now`. On a Saturday before
/// 20:45 that is still last week's round.
pub fn current_draw_number(now: NaiveDateTime) -> i32 {
    let draw_at = now.date().and_time(draw_time());
    if is_draw_day(now.date()) && now < draw_at {
        return draw_number_by_date(now - Duration::days(7));
    }
    draw_number_by_date(now)
}

/// 尚未開獎的下一期，新登錄的彩券用這個期數
pub fn upcoming_draw_round(now: NaiveDateTime) -> i32 {
    current_draw_number(now) + 1
}

/// `None` when the round lies outside the calendar chrono can represent.
pub fn draw_date_by_number(round: i32) -> Option<NaiveDate> {
    let weeks = i64::from(round) - 1;
    let offset = Duration::try_days(weeks.checked_mul(7)?)?;
    first_draw_date().checked_add_signed(offset)
}

pub fn draw_datetime_by_number(round: i32) -> Option<NaiveDateTime> {
    draw_date_by_number(round).map(|date| date.and_time(draw_time()))
}

pub fn is_draw_day(date: NaiveDate) -> bool {
    date.weekday() == Weekday::Sat
}

/// Nearest Saturday 20:45 that is not before `now`.
pub fn next_draw_datetime(now: NaiveDateTime) -> NaiveDateTime {
    let days_until_saturday = 6 - i64::from(now.weekday().num_days_from_sunday());
    let next = (now.date() + Duration::days(days_until_saturday)).and_time(draw_time());

    if now > next {
        next + Duration::days(7)
    } else {
        next
    }
}

pub fn time_until_next_draw(now: NaiveDateTime) -> Duration {
    next_draw_datetime(now) - now
}

/// `yyyy.MM.dd`
pub fn format_draw_date(date: NaiveDate) -> String {
    date.format("%Y.%m.%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_first_draw_is_round_one() {
        assert_eq!(draw_number_by_date(at(2002, 12, 7, 0, 0)), 1);
        assert_eq!(draw_number_by_date(at(2002, 12, 13, 23, 59)), 1);
        assert_eq!(draw_number_by_date(at(2002, 12, 14, 0, 0)), 2);
    }

    #[test]
    fn test_known_round() {
        // 2024-01-06 是第 1101 期
        assert_eq!(draw_number_by_date(at(2024, 1, 6, 21, 0)), 1101);
        assert_eq!(draw_date_by_number(1101), NaiveDate::from_ymd_opt(2024, 1, 6));
        assert_eq!(draw_datetime_by_number(1101), Some(at(2024, 1, 6, 20, 45)));
    }

    #[test]
    fn test_round_boundaries() {
        assert_eq!(draw_date_by_number(1), NaiveDate::from_ymd_opt(2002, 12, 7));
        assert_eq!(draw_date_by_number(0), NaiveDate::from_ymd_opt(2002, 11, 30));
        assert_eq!(draw_date_by_number(2_000_000_000), None);
        assert_eq!(draw_date_by_number(i32::MAX), None);
        assert_eq!(draw_date_by_number(i32::MIN), None);
        assert_eq!(draw_datetime_by_number(i32::MAX), None);
    }

    #[test]
    fn test_saturday_before_draw_uses_previous_round() {
        assert_eq!(current_draw_number(at(2024, 1, 6, 20, 44)), 1100);
        assert_eq!(current_draw_number(at(2024, 1, 6, 20, 45)), 1101);
        assert_eq!(current_draw_number(at(2024, 1, 10, 12, 0)), 1101);
        assert_eq!(upcoming_draw_round(at(2024, 1, 10, 12, 0)), 1102);
    }

    #[test]
    fn test_is_draw_day() {
        assert!(is_draw_day(NaiveDate::from_ymd_opt(2024, 1, 6).unwrap()));
        assert!(!is_draw_day(NaiveDate::from_ymd_opt(2024, 1, 7).unwrap()));
    }

    #[test]
    fn test_next_draw_datetime() {
        // 星期三 → 同一週的星期六
        assert_eq!(next_draw_datetime(at(2024, 1, 10, 12, 0)), at(2024, 1, 13, 20, 45));
        // 星期日 → 六天後
        assert_eq!(next_draw_datetime(at(2024, 1, 7, 9, 0)), at(2024, 1, 13, 20, 45));
        // 星期六開獎前 → 當天
        assert_eq!(next_draw_datetime(at(2024, 1, 6, 18, 0)), at(2024, 1, 6, 20, 45));
        // 星期六開獎後 → 下週
        assert_eq!(next_draw_datetime(at(2024, 1, 6, 21, 0)), at(2024, 1, 13, 20, 45));
    }

    #[test]
    fn test_time_until_next_draw() {
        assert_eq!(time_until_next_draw(at(2024, 1, 6, 20, 0)), Duration::minutes(45));
    }

    #[test]
    fn test_format_draw_date() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 6).unwrap();
        assert_eq!(format_draw_date(date), "2024.01.06");
    }
}

use chrono::{Datelike, NaiveDate, Weekday};

/// Days charged against the leave balance for the inclusive range
/// `[start, end]`: every calendar day except Sundays, minus the number of
/// holidays falling in the range. Holidays are subtracted without a weekday
/// test: a holiday on a Saturday subtracts one (Saturday is a working day
/// here), and a holiday landing on a Sunday also subtracts one even though
/// the Sunday was never counted, under-counting that range by one. Returns 0
/// for an empty range (`end < start`).
pub fn chargeable_days(start: NaiveDate, end: NaiveDate, holidays_in_range: i64) -> i64 {
    let counted = start
        .iter_days()
        .take_while(|day| *day <= end)
        .filter(|day| day.weekday() != Weekday::Sun)
        .count() as i64;
    counted - holidays_in_range
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn brute_force(start: NaiveDate, end: NaiveDate) -> i64 {
        let mut n = 0;
        let mut day = start;
        while day <= end {
            if day.weekday() != Weekday::Sun {
                n += 1;
            }
            day = day.succ_opt().unwrap();
        }
        n
    }

    #[test]
    fn no_holidays_counts_everything_but_sundays() {
        // Every range inside a five-week window, up to three weeks long.
        let base = d(2025, 3, 1);
        for offset in 0..14 {
            let start = base + chrono::Duration::days(offset);
            for len in 0..21 {
                let end = start + chrono::Duration::days(len);
                assert_eq!(
                    chargeable_days(start, end, 0),
                    brute_force(start, end),
                    "range {start} ..= {end}"
                );
            }
        }
    }

    #[test]
    fn single_day_is_one_unless_sunday() {
        let monday = d(2025, 6, 2);
        assert_eq!(monday.weekday(), Weekday::Mon);
        assert_eq!(chargeable_days(monday, monday, 0), 1);

        let sunday = d(2025, 6, 1);
        assert_eq!(sunday.weekday(), Weekday::Sun);
        assert_eq!(chargeable_days(sunday, sunday, 0), 0);
    }

    #[test]
    fn each_holiday_subtracts_exactly_one() {
        let start = d(2025, 6, 2);
        let end = d(2025, 6, 13);
        let base = chargeable_days(start, end, 0);
        for holidays in 1..=3 {
            assert_eq!(chargeable_days(start, end, holidays), base - holidays);
        }
    }

    #[test]
    fn plain_work_week_is_five_days() {
        // Mon 2025-06-02 through Fri 2025-06-06, no holidays.
        assert_eq!(chargeable_days(d(2025, 6, 2), d(2025, 6, 6), 0), 5);
    }

    #[test]
    fn year_boundary_with_new_years_day() {
        // Mon 2024-12-30 through Thu 2025-01-02: four calendar days, no
        // Sunday inside (Dec 29 is the Sunday just before), one holiday on
        // Jan 1 -> 3 chargeable days.
        let start = d(2024, 12, 30);
        let end = d(2025, 1, 2);
        assert_eq!(start.weekday(), Weekday::Mon);
        assert_eq!(brute_force(start, end), 4);
        assert_eq!(chargeable_days(start, end, 1), 3);
    }

    #[test]
    fn saturdays_are_working_days() {
        // Sat 2025-06-07 alone.
        let saturday = d(2025, 6, 7);
        assert_eq!(saturday.weekday(), Weekday::Sat);
        assert_eq!(chargeable_days(saturday, saturday, 0), 1);
    }

    #[test]
    fn empty_range_is_zero() {
        assert_eq!(chargeable_days(d(2025, 6, 2), d(2025, 6, 1), 0), 0);
    }
}

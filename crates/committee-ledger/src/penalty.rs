use chrono::NaiveDate;
use committee_core::MonthYear;

/// Due days past the 28th are clamped so every month has one.
pub fn due_date(month: MonthYear, due_day: u32) -> NaiveDate {
    month
        .day(due_day.clamp(1, 28))
        .unwrap_or_else(|| month.first_day())
}

pub fn late_days(due: NaiveDate, paid: NaiveDate) -> u32 {
    let days = (paid - due).num_days().max(0);
    u32::try_from(days).unwrap_or(u32::MAX)
}

pub fn demerit_points(late_days: u32) -> u32 {
    late_days
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn due_on_the_tenth() {
        let month: MonthYear = "2024-01".parse().unwrap();
        assert_eq!(due_date(month, 10), date(2024, 1, 10));
    }

    #[test]
    fn early_and_on_time_payments_are_not_late() {
        let due = date(2024, 1, 10);
        assert_eq!(late_days(due, date(2024, 1, 8)), 0);
        assert_eq!(late_days(due, date(2024, 1, 10)), 0);
        assert_eq!(late_days(due, date(2023, 12, 28)), 0);
    }

    #[test]
    fn late_days_count_calendar_days() {
        let due = date(2024, 1, 10);
        assert_eq!(late_days(due, date(2024, 1, 15)), 5);
        assert_eq!(late_days(due, date(2024, 2, 10)), 31);
        assert_eq!(demerit_points(late_days(due, date(2024, 1, 12))), 2);
    }

    #[test]
    fn due_day_is_clamped_to_short_months() {
        let feb: MonthYear = "2023-02".parse().unwrap();
        assert_eq!(due_date(feb, 31), date(2023, 2, 28));
        assert_eq!(due_date(feb, 0), date(2023, 2, 1));
    }
}

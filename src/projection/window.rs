use chrono::NaiveDate;

use crate::calendar::ScheduledTournament;
use crate::error::EngineError;

/// Dates eligible for projection: after `today`, up to and including
/// `season_end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeasonWindow {
    pub today: NaiveDate,
    pub season_end: NaiveDate,
}

impl SeasonWindow {
    pub fn new(today: NaiveDate, season_end: NaiveDate) -> Result<Self, EngineError> {
        if season_end < today {
            return Err(EngineError::Validation(format!(
                "season end {} is before today ({})",
                season_end, today
            )));
        }
        Ok(Self { today, season_end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date > self.today && date <= self.season_end
    }

    pub fn days_remaining(&self) -> i64 {
        (self.season_end - self.today).num_days()
    }

    /// Scheduled tournaments that fall inside the window.
    pub fn upcoming<'a>(
        &'a self,
        schedule: &'a [ScheduledTournament],
    ) -> impl Iterator<Item = &'a ScheduledTournament> + 'a {
        schedule.iter().filter(move |t| self.contains(t.date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, m, d).unwrap()
    }

    #[test]
    fn test_window_bounds() {
        let window = SeasonWindow::new(date(3, 1), date(6, 30)).unwrap();
        assert!(!window.contains(date(3, 1)));
        assert!(window.contains(date(3, 2)));
        assert!(window.contains(date(6, 30)));
        assert!(!window.contains(date(7, 1)));
        assert!(!window.contains(date(2, 1)));
        assert_eq!(window.days_remaining(), 121);
    }

    #[test]
    fn test_upcoming_uses_window_bounds() {
        let schedule: Vec<ScheduledTournament> = [
            (date(3, 14), "Spring Open"),
            (date(4, 11), "Spring Nationals"),
            (date(5, 2), "May Cup"),
            (date(9, 12), "Fall Open"),
        ]
        .into_iter()
        .map(|(date, name)| ScheduledTournament {
            date,
            class: crate::results::ClassLabel::from("A".to_string()),
            name: name.to_string(),
        })
        .collect();

        // Today's tournament is excluded, season end is included
        let window = SeasonWindow::new(date(3, 14), date(5, 2)).unwrap();
        let names: Vec<&str> = window.upcoming(&schedule).map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Spring Nationals", "May Cup"]);
    }

    #[test]
    fn test_season_end_before_today_rejected() {
        let result = SeasonWindow::new(date(7, 1), date(6, 30));
        assert!(matches!(result, Err(EngineError::Validation(_))));
    }

    #[test]
    fn test_season_end_today_is_empty_window() {
        let window = SeasonWindow::new(date(6, 30), date(6, 30)).unwrap();
        assert!(!window.contains(date(6, 30)));
        assert_eq!(window.days_remaining(), 0);
    }
}

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};
use utoipa::ToSchema;

/// Most days an availability submission can carry for one week.
pub const MAX_SELECTED_DAYS: usize = 3;

/// In-office weekdays. Weekends are not representable.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum WorkDay {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

/// Monday of the week containing `date`.
pub fn week_monday(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// Week an availability submission applies to. Late in the week (Thu/Fri)
/// and on the weekend the planning horizon rolls over to next week;
/// Mon-Wed still targets the current one.
pub fn target_week_start(today: NaiveDate) -> NaiveDate {
    use chrono::Weekday::*;
    let anchor = match today.weekday() {
        Sun | Thu | Fri | Sat => today + Duration::days(7),
        Mon | Tue | Wed => today,
    };
    week_monday(anchor)
}

/// Parses a stored comma-separated day list. Unknown names are an error,
/// not skipped; a stored row is trusted to contain only what
/// `validate_selection` let through.
pub fn parse_selected_days(raw: &str) -> Result<Vec<WorkDay>, String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<WorkDay>()
                .map_err(|_| format!("unknown weekday: {s}"))
        })
        .collect()
}

pub fn join_selected_days(days: &[WorkDay]) -> String {
    days.iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// At most three days, no duplicates. The prior selection is untouched on
/// failure because nothing is written until this passes.
pub fn validate_selection(days: &[WorkDay]) -> Result<(), String> {
    if days.len() > MAX_SELECTED_DAYS {
        return Err(format!(
            "at most {MAX_SELECTED_DAYS} in-office days can be selected per week"
        ));
    }
    for (i, day) in days.iter().enumerate() {
        if days[..i].contains(day) {
            return Err(format!("duplicate day: {day}"));
        }
    }
    Ok(())
}

/// Mon-Fri presence grid for one employee.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct WeekdayGrid {
    pub monday: bool,
    pub tuesday: bool,
    pub wednesday: bool,
    pub thursday: bool,
    pub friday: bool,
}

impl WeekdayGrid {
    pub fn from_days(days: &[WorkDay]) -> Self {
        Self {
            monday: days.contains(&WorkDay::Monday),
            tuesday: days.contains(&WorkDay::Tuesday),
            wednesday: days.contains(&WorkDay::Wednesday),
            thursday: days.contains(&WorkDay::Thursday),
            friday: days.contains(&WorkDay::Friday),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn thursday_targets_next_week() {
        // 2026-03-05 is a Thursday; next week's Monday is 2026-03-09
        assert_eq!(target_week_start(date(2026, 3, 5)), date(2026, 3, 9));
    }

    #[test]
    fn tuesday_targets_current_week() {
        // 2026-03-03 is a Tuesday; its Monday is 2026-03-02
        assert_eq!(target_week_start(date(2026, 3, 3)), date(2026, 3, 2));
    }

    #[test]
    fn weekend_targets_next_week() {
        // Sat 2026-03-07 and Sun 2026-03-08 both roll to 2026-03-09
        assert_eq!(target_week_start(date(2026, 3, 7)), date(2026, 3, 9));
        assert_eq!(target_week_start(date(2026, 3, 8)), date(2026, 3, 9));
    }

    #[test]
    fn monday_is_its_own_week_start() {
        assert_eq!(week_monday(date(2026, 3, 2)), date(2026, 3, 2));
        assert_eq!(week_monday(date(2026, 3, 6)), date(2026, 3, 2));
    }

    #[test]
    fn selection_limit_is_three() {
        use WorkDay::*;
        assert!(validate_selection(&[Monday, Tuesday, Wednesday]).is_ok());
        assert!(validate_selection(&[Monday, Tuesday, Wednesday, Thursday]).is_err());
        assert!(validate_selection(&[]).is_ok());
    }

    #[test]
    fn duplicate_days_rejected() {
        use WorkDay::*;
        assert!(validate_selection(&[Monday, Monday]).is_err());
    }

    #[test]
    fn day_list_round_trip() {
        use WorkDay::*;
        let days = vec![Monday, Wednesday, Friday];
        let joined = join_selected_days(&days);
        assert_eq!(joined, "monday,wednesday,friday");
        assert_eq!(parse_selected_days(&joined).unwrap(), days);
    }

    #[test]
    fn weekend_names_do_not_parse() {
        assert!(parse_selected_days("saturday").is_err());
        assert!(parse_selected_days("monday,sunday").is_err());
        assert_eq!(parse_selected_days("").unwrap(), vec![]);
    }

    #[test]
    fn grid_covers_selection_and_nothing_else() {
        use WorkDay::*;
        let grid = WeekdayGrid::from_days(&[Tuesday, Thursday]);
        assert!(!grid.monday);
        assert!(grid.tuesday);
        assert!(!grid.wednesday);
        assert!(grid.thursday);
        assert!(!grid.friday);
    }

    #[test]
    fn empty_selection_is_all_false() {
        let grid = WeekdayGrid::from_days(&[]);
        assert!(
            !grid.monday && !grid.tuesday && !grid.wednesday && !grid.thursday && !grid.friday
        );
    }

    #[test]
    fn workday_enum_covers_mon_to_fri() {
        assert_eq!(WorkDay::iter().count(), 5);
    }
}

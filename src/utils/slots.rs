use chrono::{Duration, NaiveTime};
use once_cell::sync::Lazy;
use serde::Serialize;
use utoipa::ToSchema;

/// Bookable day: 08:00 to 18:00 in fixed 30-minute slots, 20 per day.
pub const SLOT_MINUTES: i64 = 30;

const DAY_START: (u32, u32) = (8, 0);
const DAY_END: (u32, u32) = (18, 0);

/// All valid slot starts, 08:00 through 17:30.
pub static DAY_SLOTS: Lazy<Vec<NaiveTime>> = Lazy::new(|| {
    let start = NaiveTime::from_hms_opt(DAY_START.0, DAY_START.1, 0).unwrap();
    let end = NaiveTime::from_hms_opt(DAY_END.0, DAY_END.1, 0).unwrap();
    let mut slots = Vec::new();
    let mut current = start;
    while current < end {
        slots.push(current);
        current += Duration::minutes(SLOT_MINUTES);
    }
    slots
});

/// An existing booking's interval, as read from the store.
#[derive(Debug, Clone, Copy)]
pub struct BookedInterval {
    pub id: u64,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SlotAvailability {
    #[schema(example = "09:00:00", value_type = String)]
    pub start: NaiveTime,
    pub available: bool,
}

pub fn is_valid_slot_start(time: NaiveTime) -> bool {
    DAY_SLOTS.contains(&time)
}

pub fn slot_end(start: NaiveTime) -> NaiveTime {
    start + Duration::minutes(SLOT_MINUTES)
}

/// A slot is free iff no booking's [start, end) contains its start.
/// `exclude` skips one booking id so an edit never conflicts with itself.
pub fn slot_is_free(start: NaiveTime, booked: &[BookedInterval], exclude: Option<u64>) -> bool {
    booked
        .iter()
        .filter(|b| Some(b.id) != exclude)
        .all(|b| !(b.start <= start && start < b.end))
}

/// Availability of all 20 slots for one room and day. Linear scan per
/// slot; bookings per room per day number in the tens at most.
pub fn free_slots(booked: &[BookedInterval], exclude: Option<u64>) -> Vec<SlotAvailability> {
    DAY_SLOTS
        .iter()
        .map(|&start| SlotAvailability {
            start,
            available: slot_is_free(start, booked, exclude),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn booking(id: u64, h: u32, m: u32) -> BookedInterval {
        BookedInterval {
            id,
            start: time(h, m),
            end: slot_end(time(h, m)),
        }
    }

    #[test]
    fn day_has_twenty_slots() {
        assert_eq!(DAY_SLOTS.len(), 20);
        assert_eq!(DAY_SLOTS[0], time(8, 0));
        assert_eq!(*DAY_SLOTS.last().unwrap(), time(17, 30));
    }

    #[test]
    fn slot_start_validation() {
        assert!(is_valid_slot_start(time(8, 0)));
        assert!(is_valid_slot_start(time(17, 30)));
        assert!(!is_valid_slot_start(time(18, 0)));
        assert!(!is_valid_slot_start(time(7, 30)));
        assert!(!is_valid_slot_start(time(9, 15)));
    }

    #[test]
    fn booked_slots_are_marked_occupied() {
        let booked = vec![booking(1, 9, 0), booking(2, 10, 0)];
        let slots = free_slots(&booked, None);
        assert_eq!(slots.len(), 20);
        let occupied: Vec<NaiveTime> = slots
            .iter()
            .filter(|s| !s.available)
            .map(|s| s.start)
            .collect();
        assert_eq!(occupied, vec![time(9, 0), time(10, 0)]);
    }

    #[test]
    fn editing_excludes_own_interval() {
        let booked = vec![booking(1, 9, 0), booking(2, 10, 0)];
        assert!(!slot_is_free(time(9, 0), &booked, None));
        assert!(slot_is_free(time(9, 0), &booked, Some(1)));
        assert!(!slot_is_free(time(10, 0), &booked, Some(1)));
    }

    #[test]
    fn interval_is_half_open() {
        let booked = vec![booking(1, 9, 0)];
        // 09:30 is the booking's end and must be free
        assert!(slot_is_free(time(9, 30), &booked, None));
        assert!(!slot_is_free(time(9, 0), &booked, None));
    }
}

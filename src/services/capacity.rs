use serde::Serialize;

use crate::models::BookingStatus;
use crate::store::BookingTally;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CapacitySummary {
    pub booked: i64,
    pub checked_in: i64,
    pub remaining: i64,
}

// Чистая свертка по бронированиям события. Порядок строк не важен.
// remaining намеренно не ограничивается нулем: отрицательное значение
// сигналит о нарушенном инварианте выше по течению, его надо видеть.
pub fn tally(capacity: i32, bookings: &[BookingTally]) -> CapacitySummary {
    let mut booked: i64 = 0;
    let mut checked_in: i64 = 0;

    for b in bookings {
        match BookingStatus::parse(&b.status) {
            Some(BookingStatus::Confirmed) => booked += i64::from(b.quantity),
            Some(BookingStatus::CheckedIn) => checked_in += i64::from(b.quantity),
            _ => {}
        }
    }

    CapacitySummary {
        booked,
        checked_in,
        remaining: i64::from(capacity) - booked - checked_in,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn row(quantity: i32, status: &str) -> BookingTally {
        BookingTally {
            quantity,
            status: status.into(),
        }
    }

    #[test]
    fn sums_confirmed_and_checked_in_separately() {
        let rows = vec![row(40, "CONFIRMED"), row(10, "CHECKED_IN")];
        let summary = tally(120, &rows);
        assert_eq!(summary.booked, 40);
        assert_eq!(summary.checked_in, 10);
        assert_eq!(summary.remaining, 70);
    }

    #[test]
    fn empty_input_leaves_full_capacity() {
        let summary = tally(80, &[]);
        assert_eq!(summary.booked, 0);
        assert_eq!(summary.checked_in, 0);
        assert_eq!(summary.remaining, 80);
    }

    #[test]
    fn other_statuses_are_ignored() {
        let rows = vec![
            row(40, "CONFIRMED"),
            row(25, "CANCELLED"),
            row(5, "PENDING_PAYMENT"),
        ];
        let summary = tally(100, &rows);
        assert_eq!(summary.booked, 40);
        assert_eq!(summary.checked_in, 0);
        assert_eq!(summary.remaining, 60);
    }

    #[test]
    fn overbooked_event_reports_negative_remaining() {
        let rows = vec![row(90, "CONFIRMED"), row(40, "CHECKED_IN")];
        let summary = tally(100, &rows);
        assert_eq!(summary.remaining, -30);
    }

    proptest! {
        // Свертка коммутативна: перестановка строк не меняет итог
        #[test]
        fn tally_is_order_independent(
            rows in proptest::collection::vec(
                (1..50i32, prop_oneof![
                    Just("CONFIRMED"),
                    Just("CHECKED_IN"),
                    Just("CANCELLED"),
                ]),
                0..20,
            ),
            capacity in 1..500i32,
        ) {
            let rows: Vec<BookingTally> =
                rows.into_iter().map(|(q, s)| row(q, s)).collect();

            let mut reversed = rows.clone();
            reversed.reverse();

            let mut rotated = rows.clone();
            if !rotated.is_empty() {
                rotated.rotate_left(rotated.len() / 2);
            }

            let base = tally(capacity, &rows);
            prop_assert_eq!(base, tally(capacity, &reversed));
            prop_assert_eq!(base, tally(capacity, &rotated));
        }
    }
}

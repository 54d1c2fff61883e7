// ABOUTME: Pure parking fee calculation from vehicle type and elapsed time.
// ABOUTME: Charges a per-vehicle rate for every 15 minutes, pro rata, with no minimum or cap.

use chrono::{DateTime, Utc};

use crate::model::VehicleType;

/// Length of one billing unit in minutes.
pub const MINUTES_PER_UNIT: f64 = 15.0;

/// Elapsed time and amount owed for one stay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeeQuote {
    pub minutes: i64,
    pub fee: f64,
}

impl FeeQuote {
    /// Fee with two decimal places, as shown on the receipt.
    pub fn fee_display(&self) -> String {
        format!("{:.2}", self.fee)
    }
}

/// Currency units charged per 15-minute unit.
pub fn rate_per_unit(vehicle_type: VehicleType) -> f64 {
    match vehicle_type {
        VehicleType::Motorcycle => 1.0,
        VehicleType::Car => 2.0,
    }
}

/// Fee for a stay of whole `minutes`.
pub fn fee_for_minutes(vehicle_type: VehicleType, minutes: i64) -> f64 {
    (minutes as f64 / MINUTES_PER_UNIT) * rate_per_unit(vehicle_type)
}

/// Quote the fee for a vehicle that entered at `entry_time` (epoch seconds).
///
/// Elapsed minutes are truncated. If the clock is behind the recorded entry
/// time, or the entry time is so far off that the elapsed seconds do not fit
/// in an i64, the stay is treated as zero minutes.
pub fn quote(vehicle_type: VehicleType, entry_time: i64, now: DateTime<Utc>) -> FeeQuote {
    let minutes = match now.timestamp().checked_sub(entry_time) {
        None => {
            tracing::warn!(
                "entry time {} is out of range for clock {}, charging for 0 minutes",
                entry_time,
                now.timestamp()
            );
            0
        }
        Some(elapsed_secs) if elapsed_secs < 0 => {
            tracing::warn!(
                "clock is {}s behind recorded entry time {}, charging for 0 minutes",
                elapsed_secs.unsigned_abs(),
                entry_time
            );
            0
        }
        Some(elapsed_secs) => elapsed_secs / 60,
    };

    FeeQuote {
        minutes,
        fee: fee_for_minutes(vehicle_type, minutes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    #[test]
    fn zero_elapsed_is_free() {
        let q = quote(VehicleType::Car, 1_000, at(1_000));
        assert_eq!(q.minutes, 0);
        assert_eq!(q.fee_display(), "0.00");
    }

    #[test]
    fn partial_minutes_are_truncated() {
        let q = quote(VehicleType::Motorcycle, 0, at(59));
        assert_eq!(q.minutes, 0);

        let q = quote(VehicleType::Motorcycle, 0, at(119));
        assert_eq!(q.minutes, 1);
    }

    #[test]
    fn rates_per_quarter_hour() {
        let bike = quote(VehicleType::Motorcycle, 0, at(15 * 60));
        assert_eq!(bike.minutes, 15);
        assert_eq!(bike.fee_display(), "1.00");

        let car = quote(VehicleType::Car, 0, at(60 * 60));
        assert_eq!(car.minutes, 60);
        assert_eq!(car.fee_display(), "8.00");
    }

    #[test]
    fn fee_is_pro_rata() {
        // 10 minutes of a car: 10/15 * 2.0
        let q = quote(VehicleType::Car, 0, at(10 * 60));
        assert_eq!(q.fee_display(), "1.33");
    }

    #[test]
    fn clock_behind_entry_is_clamped_to_zero() {
        let q = quote(VehicleType::Car, 10_000, at(9_000));
        assert_eq!(q.minutes, 0);
        assert_eq!(q.fee, 0.0);
    }

    #[test]
    fn entry_time_far_in_the_past_does_not_overflow() {
        let q = quote(VehicleType::Car, i64::MIN, at(1_700_000_000));
        assert_eq!(q.minutes, 0);
        assert_eq!(q.fee_display(), "0.00");
    }

    #[test]
    fn entry_time_far_in_the_future_is_clamped() {
        let q = quote(VehicleType::Motorcycle, i64::MAX, at(1_700_000_000));
        assert_eq!(q.minutes, 0);
        assert_eq!(q.fee, 0.0);

        // Negative clocks push the difference past i64::MIN.
        let q = quote(VehicleType::Car, i64::MAX, at(-1_000));
        assert_eq!(q.minutes, 0);
    }

    #[test]
    fn fee_is_monotonic_and_car_costs_at_least_motorcycle() {
        let mut previous = (0.0, 0.0);
        for minutes in 0..600 {
            let bike = fee_for_minutes(VehicleType::Motorcycle, minutes);
            let car = fee_for_minutes(VehicleType::Car, minutes);
            assert!(bike >= previous.0, "motorcycle fee dropped at {minutes}");
            assert!(car >= previous.1, "car fee dropped at {minutes}");
            assert!(car >= bike);
            previous = (bike, car);
        }
    }
}

//! Integration tests for the Booking entity.
//!
//! These tests walk bookings through complete lifecycles and verify the
//! state machine refuses every illegal shortcut.

use chrono::{Duration, Utc};
use common::{GuestId, HotelId, RoomId};
use domain::{Booking, BookingError, BookingRequest, BookingStatus, Money};

fn request_for(nights: i64, guests: u32) -> BookingRequest {
    let check_in = Utc::now().date_naive() + Duration::days(10);
    BookingRequest::new(
        GuestId::new(),
        HotelId::new(),
        RoomId::new(),
        check_in,
        check_in + Duration::days(nights),
        guests,
    )
}

fn new_booking() -> Booking {
    Booking::new(request_for(3, 2), Money::from_cents(45000))
}

mod lifecycle {
    use super::*;

    #[test]
    fn booking_reaches_completed_through_every_stage() {
        let mut booking = new_booking();
        assert_eq!(booking.status(), BookingStatus::Pending);

        booking.mark_validated().unwrap();
        booking.hold_room().unwrap();
        booking.prepare_payment().unwrap();
        assert_eq!(booking.status(), BookingStatus::PaymentPending);

        booking.set_payment_ref("PAY-789");
        booking.confirm().unwrap();
        assert_eq!(booking.status(), BookingStatus::Confirmed);

        booking.complete_stay().unwrap();
        assert_eq!(booking.status(), BookingStatus::Completed);
        assert!(booking.is_terminal());
    }

    #[test]
    fn held_booking_resumes_and_finishes() {
        let mut booking = new_booking();
        booking.hold_room().unwrap();
        booking.put_on_hold().unwrap();
        assert_eq!(booking.status(), BookingStatus::OnHold);

        booking.resume().unwrap();
        assert_eq!(booking.status(), BookingStatus::Pending);

        // The saga starts over after a resume.
        booking.hold_room().unwrap();
        booking.prepare_payment().unwrap();
        booking.confirm().unwrap();
        assert_eq!(booking.status(), BookingStatus::Confirmed);
    }

    #[test]
    fn rejected_booking_can_still_be_cancelled() {
        let mut booking = new_booking();
        booking.reject("Suspicious activity").unwrap();
        assert_eq!(booking.status(), BookingStatus::Rejected);
        assert!(!booking.is_terminal());

        booking.cancel("Cleanup").unwrap();
        assert_eq!(booking.status(), BookingStatus::Cancelled);
        assert_eq!(booking.cancellation_reason(), Some("Cleanup"));
    }

    #[test]
    fn failed_booking_accepts_no_further_commands() {
        let mut booking = new_booking();
        booking.hold_room().unwrap();
        booking.fail().unwrap();
        assert_eq!(booking.status(), BookingStatus::Failed);

        assert!(booking.hold_room().is_err());
        assert!(booking.confirm().is_err());
        assert!(booking.put_on_hold().is_err());
        assert!(booking.expire().is_err());
        assert!(matches!(
            booking.cancel("too late"),
            Err(BookingError::InvalidTransition { .. })
        ));
    }
}

mod guards {
    use super::*;

    #[test]
    fn confirm_is_refused_before_payment_is_prepared() {
        let mut booking = new_booking();
        assert!(booking.confirm().is_err());

        booking.hold_room().unwrap();
        assert!(booking.confirm().is_err());
        assert_eq!(booking.status(), BookingStatus::RoomHeld);
    }

    #[test]
    fn room_hold_is_refused_twice() {
        let mut booking = new_booking();
        booking.hold_room().unwrap();
        let result = booking.hold_room();
        assert!(matches!(
            result,
            Err(BookingError::InvalidTransition {
                status: BookingStatus::RoomHeld,
                ..
            })
        ));
    }

    #[test]
    fn validation_is_idempotent_while_pending() {
        let mut booking = new_booking();
        booking.mark_validated().unwrap();
        booking.mark_validated().unwrap();
        assert_eq!(booking.status(), BookingStatus::Pending);
    }

    #[test]
    fn stay_rules_catch_each_violation() {
        let today = Utc::now().date_naive();

        let same_day = Booking::new(request_for(0, 2), Money::zero());
        assert!(matches!(
            same_day.validate_stay(today),
            Err(BookingError::InvalidStayDates)
        ));

        let no_guests = Booking::new(request_for(2, 0), Money::from_cents(30000));
        assert!(matches!(
            no_guests.validate_stay(today),
            Err(BookingError::InvalidGuestCount { guests: 0 })
        ));

        let past = BookingRequest::new(
            GuestId::new(),
            HotelId::new(),
            RoomId::new(),
            today - Duration::days(2),
            today + Duration::days(1),
            2,
        );
        let past_booking = Booking::new(past, Money::from_cents(45000));
        assert!(matches!(
            past_booking.validate_stay(today),
            Err(BookingError::CheckInInPast)
        ));
    }

    #[test]
    fn total_amount_is_never_recomputed_by_commands() {
        let mut booking = new_booking();
        let total = booking.total_amount();
        booking.hold_room().unwrap();
        booking.prepare_payment().unwrap();
        booking.confirm().unwrap();
        assert_eq!(booking.total_amount(), total);
    }
}

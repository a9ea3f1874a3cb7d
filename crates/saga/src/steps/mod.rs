//! Steps of the booking creation saga.

pub mod confirm;
pub mod hold_room;
pub mod process_payment;
pub mod validate;

pub use confirm::ConfirmBooking;
pub use hold_room::HoldRoom;
pub use process_payment::ProcessPayment;
pub use validate::ValidateBooking;

pub mod error;
pub mod memory;
pub mod repository;

pub use error::{Result, StoreError};
pub use memory::InMemoryBookingStore;
pub use repository::BookingRepository;

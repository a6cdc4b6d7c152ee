//! ES8311 mono codec (Everest Semiconductor)
//!
//! The driver is generic over `embedded_hal_async::i2c::I2c`, so it builds
//! on every target; host tests drive it through `embedded-hal-mock`.

pub mod registers;

mod driver;

pub use driver::{Es8311Driver, Es8311Error};

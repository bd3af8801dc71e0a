pub mod booking;
pub mod common;
pub mod interval;
pub mod movie;
pub mod showtime;

pub use booking::*;
pub use common::*;
pub use interval::*;
pub use movie::*;
pub use showtime::*;

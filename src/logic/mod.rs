pub mod allocator;
pub mod box_office;
pub mod catalog;
pub mod error;
pub mod locks;
pub mod reference;
pub mod scheduler;

pub use allocator::*;
pub use box_office::*;
pub use catalog::*;
pub use error::*;
pub use locks::*;
pub use reference::*;
pub use scheduler::*;

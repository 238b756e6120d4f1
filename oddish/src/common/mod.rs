//! Types shared by the cursor, collection and store layers.

mod constants;
mod sort_order;

pub use constants::*;
pub use sort_order::*;

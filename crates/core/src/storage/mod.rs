pub mod legacy;
pub mod memory;
pub mod traits;

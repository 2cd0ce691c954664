pub mod client;
pub mod score;
pub mod settings;
pub mod spending;
pub mod tier;
pub mod transaction;

pub mod affordability;
pub mod chat;

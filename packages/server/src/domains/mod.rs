// Business domains
pub mod conversation;
pub mod sales;
pub mod tasks;

pub mod accounts;
pub mod catalog;
pub mod library;
pub mod providers;
pub mod recommendation;
pub mod reviews;

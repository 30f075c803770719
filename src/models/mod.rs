//! Data models for Biblio

pub mod author;
pub mod book;
pub mod borrow;
pub mod user;

// Re-export commonly used types
pub use author::Author;
pub use book::Book;
pub use borrow::{BorrowDetails, BorrowRecord};
pub use user::User;

//! # Blogicum Core
//!
//! The domain layer of Blogicum: blog entities, the post visibility rule,
//! pagination and form validation.
//! This crate contains pure business logic with zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod forms;
pub mod pagination;
pub mod ports;

pub use error::DomainError;
pub use pagination::{Page, PageRequest};

//! Data models for the course portal.
//!
//! These models match the frontend TypeScript interfaces so stored mirrors stay interchangeable.

mod assistant;
mod board;
mod page;
mod post;
mod subject;

pub use assistant::*;
pub use board::*;
pub use page::*;
pub use post::*;
pub use subject::*;

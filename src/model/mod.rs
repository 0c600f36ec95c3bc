//! Record types served by the application, each with its validation rules.

pub mod product;
pub mod user;

pub use product::*;
pub use user::*;

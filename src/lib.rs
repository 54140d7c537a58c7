pub mod db;
pub mod error;
pub mod ids;
pub mod models;
pub mod names;
pub mod session;

pub use error::{QuizError, Result};

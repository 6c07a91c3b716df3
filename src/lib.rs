pub mod auth;
pub mod database;
pub mod db;
pub mod error;
pub mod models;
pub mod telemetry;

#[cfg(test)]
mod test;

pub use auth::{AuthService, AuthState, SessionStore};
pub use error::AppError;
pub use models::{
    Goal, Grade, NewGoal, NewPortfolioItem, PortfolioCategory, PortfolioItem, User,
};

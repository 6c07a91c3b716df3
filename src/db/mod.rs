pub mod goals;
pub mod grades;
pub mod portfolio;
pub mod users;

pub use goals::*;
pub use grades::*;
pub use portfolio::*;
pub use users::*;

pub mod service;
pub mod session;

pub use service::*;
pub use session::*;

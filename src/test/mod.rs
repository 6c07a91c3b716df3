pub mod sessions;
pub mod utils;

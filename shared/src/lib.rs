pub mod brazilian_format;
pub mod models;
pub mod utils;

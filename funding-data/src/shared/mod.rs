pub mod de;
pub mod models;
pub mod normalizer;
pub mod utils;

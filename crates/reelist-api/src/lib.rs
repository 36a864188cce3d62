pub mod firebase;
pub mod tmdb;
pub mod traits;

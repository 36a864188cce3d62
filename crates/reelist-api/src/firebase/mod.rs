pub mod client;
pub mod error;
pub mod types;

pub use client::FirebaseClient;
pub use error::FirebaseError;

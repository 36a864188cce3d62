pub mod config;
pub mod error;
pub mod events;
pub mod matcher;
pub mod models;
pub mod normalize;
pub mod sequence;
#[cfg(feature = "sqlite")]
pub mod storage;
pub mod view;

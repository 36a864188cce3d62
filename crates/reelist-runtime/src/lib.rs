mod db;

pub mod app;
pub mod assembler;
pub mod session;

#[cfg(test)]
mod fakes;

use reelist_core::events::BindError;

pub use app::{App, Notice, NoticeKind, Rendered, UiState};
pub use assembler::AssembleError;
pub use db::DbHandle;
pub use session::{Session, SessionError, User};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("sign in first")]
    SignedOut,
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Bind(#[from] BindError),
    #[error(transparent)]
    Assemble(#[from] AssembleError),
    #[error("catalog error: {0}")]
    Catalog(String),
    #[error("store error: {0}")]
    Store(String),
}

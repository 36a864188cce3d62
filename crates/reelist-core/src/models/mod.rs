mod card;
mod movie;

pub use card::MovieCard;
pub use movie::{CastMember, ListKind, MovieRecord, RecordPatch, StoredMovie, MAX_RATING};

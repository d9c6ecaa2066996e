//! Error types for `stride-core`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  /// A create call carried an identity that is either pre-assigned or
  /// already taken.
  #[error("identity conflict: {0}")]
  IdentityConflict(String),

  #[error("a profile with email {0:?} already exists")]
  DuplicateEmail(String),

  #[error("record not found: {0}")]
  NotFound(Uuid),

  /// A session refers to a profile that does not exist.
  #[error("profile {0} does not exist")]
  InvalidReference(Uuid),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Box a backend error. Used with `map_err` at every store call site.
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

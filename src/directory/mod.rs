pub mod contact;
pub mod db;
pub mod error;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::{DirectoryError, DirectoryResult};

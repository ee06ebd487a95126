//! External store interfaces: blob storage and the subject database

pub mod object_store;
pub mod record_store;

pub use object_store::{HttpObjectStore, ObjectStore};
pub use record_store::{RecordStore, SqliteRecordStore};

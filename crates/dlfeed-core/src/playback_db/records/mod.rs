//! Record read and write operations on `RecordStore`.

mod read;
mod write;

pub mod locking;
pub mod retention;
pub mod search;
pub mod storage;
pub mod tail;

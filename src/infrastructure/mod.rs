pub mod backends;
pub mod contexts;
pub mod sse;
pub mod storage;

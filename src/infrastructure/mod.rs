pub mod chain;
pub mod database;
pub mod notification;
pub mod storage;

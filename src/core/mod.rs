pub mod config;
pub mod db;
pub mod events;
pub mod photo;
pub mod storage;

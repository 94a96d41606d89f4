pub mod assets;
pub mod audit;
pub mod catalog;
pub mod config;
pub mod data_storage;
pub mod error;
pub mod export;
pub mod filter;
pub mod import;
pub mod messages;
pub mod piece;
pub mod preview;
pub mod view;

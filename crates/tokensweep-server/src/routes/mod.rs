pub mod chat;
pub mod export;
pub mod options;
pub mod process;

pub mod api_types;
pub mod cache;
pub mod config;
pub mod consts;
pub mod db;
pub mod handlers;
pub mod init;
pub mod lifecycle;
pub mod mq;
pub mod router;
pub mod server;
pub mod wx;

pub mod auth;
pub mod credential;
pub mod http_client;
pub mod spreadsheet_manager;
pub mod value_range_factory;

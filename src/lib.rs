// Library for tests to access modules

pub mod aggregator;
pub mod config;
pub mod error;
pub mod history;
pub mod models;
pub mod power;
pub mod rates;
pub mod routes;
pub mod sensors;
pub mod sysinfo_repo;
pub mod version;

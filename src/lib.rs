pub mod config;
pub mod ledger;
pub mod observability;
pub mod readings;
pub mod report;
pub mod session;

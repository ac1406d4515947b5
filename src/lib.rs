//! Locale tables, lookup service and consistency audit for the MSPKVM web
//! interface.

pub mod config;
pub mod i18n;
pub mod server;

pub mod error;

pub mod catalog;
pub mod config;

pub mod row;

pub mod scan;
pub mod store;

pub mod seed;

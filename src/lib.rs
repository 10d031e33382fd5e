pub mod city;
pub mod config;
pub mod error;
pub mod filter;
pub mod loader;
pub mod output;
pub mod pager;
pub mod prompt;
pub mod reporters;
pub mod session;
pub mod table;

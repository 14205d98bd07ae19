//! vfood - Venezuelan supermarket price tracker.
//!
//! Searches several supermarket sites for a list of foods, normalizes the
//! listings into one table and prices them in US dollars.

pub mod cli;
pub mod config;
pub mod models;
pub mod repository;
pub mod scrapers;
pub mod services;

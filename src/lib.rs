//! Backend for the sales & budget reporting dashboard: a PostgreSQL query
//! proxy with chart-oriented data shaping.
//!
//! The server side ([`api`], [`db`]) forwards SQL to a pooled PostgreSQL
//! connection and normalizes the outcome into JSON envelopes. The client side
//! ([`client`], [`chart`]) issues report queries in concurrent batches and
//! reshapes the flat result rows into aligned chart series.

pub mod api;
pub mod chart;
pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod state;

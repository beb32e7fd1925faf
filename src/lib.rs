//! Core library for the freequidity-reader project.
//!
//! Reads prices, reserves and balances around a deployed Freequidity swap
//! contract, explains why a quote is unavailable, and submits swaps through a
//! wallet connection. The binary (`main.rs`) wires these together from
//! environment configuration.

pub mod balances;
pub mod config;
pub mod dex;
pub mod diagnostics;
pub mod errors;
pub mod models;
pub mod quote;
pub mod swap;
pub mod utils;
pub mod wallet;

//! Arbormap Core - Domain models, loader contract, and configuration
//!
//! This crate contains the tree record model, the points of interest and
//! filter parameters, the raw-row cleaning contract, and the layered
//! configuration shared by the rest of the workspace.

pub mod config;
pub mod error;
pub mod loader;
pub mod models;
pub mod ports;

pub use error::{ArborError, Result};

//! rgbsim - render true-color images through simulated limited displays
//!
//! The pipeline itself lives in the `rgb-pipeline` crate. This crate adds
//! the simulated displays, PNG I/O and the command line around it, and
//! exposes its modules for integration testing.

pub mod error;
pub mod models;
pub mod rendering;
pub mod services;

//! Core library for `DietDash`.
//!
//! Contains the payload envelope cryptography, the session model and store,
//! and BMI arithmetic. This crate knows nothing about HTTP or the REST API;
//! it provides the leaf dependencies the client crate is built on.

pub mod bmi;
pub mod envelope;
pub mod error;
pub mod session;

//! Core client logic: configuration, validation, authentication, clinics

pub mod auth;
pub mod clinics;
pub mod config;
pub mod validation;

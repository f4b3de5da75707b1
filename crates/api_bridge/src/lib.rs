//! API Bridge for the drawing-parser backend
//!
//! Provides the HTTP implementation of the reconciliation store's
//! transport: multipart drawing submission and spreadsheet export.
//!
//! Copyright (c) 2025 Michael A Wright

pub mod client;

pub use client::{ApiClient, ApiConfig, API_URL_ENV, TIMEOUT_ENV};

//! HTTP client for console-dns zone catalogue services.
//!
//! This crate provides [`ConsoleClient`], which lists the full zone
//! catalogue of one service endpoint. Listing is conditional: pass the
//! version token of the catalogue you already hold and the service may
//! answer [`ZoneListing::NotModified`].

mod client;
pub mod api;

pub use api::ZoneListing;
pub use client::{ConsoleClient, ConsoleClientBuilder};
pub use console_dns_core::{ConsoleError, Result};

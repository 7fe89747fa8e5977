//! Site API - streaming chat proxy and contact form delivery for a personal site.
//!
//! Two services are built from this crate: the site API (`/api/chat`,
//! `/api/contact`) and the contact delivery worker that the site API forwards
//! submissions to.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod observability;
pub mod ports;
pub mod startup;

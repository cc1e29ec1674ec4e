//! Read-only client for the headless CMS content API.

mod client;

pub use client::CmsClient;

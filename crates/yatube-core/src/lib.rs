//! # Yatube Core
//!
//! The domain layer of the Yatube blogging platform.
//! This crate contains entities, ports and the request-level services
//! (content, communities, comments, social graph) with zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod pagination;
pub mod ports;
pub mod services;

pub use error::DomainError;
pub use pagination::{Page, PageWindow, Paginator};

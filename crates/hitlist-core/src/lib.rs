//! Core chart model for hitlist.
//!
//! This crate defines the scraped and de-duplicated track records, the
//! de-duplication keys, the cross-source aggregation and scoring, and the
//! output snapshot document.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod aggregate;
pub mod error;
pub mod key;
pub mod model;
pub mod persist;

pub use aggregate::aggregate;
pub use error::{Error, Result};
pub use key::TrackKey;

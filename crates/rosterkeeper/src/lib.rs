//! `rosterkeeper` - An employee roster manager
//!
//! This library validates candidate employee records against business rules,
//! persists them behind a swappable store abstraction, and serves filtered,
//! sorted views of the roster, including push-style live updates.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod display;
pub mod employee;
pub mod error;
pub mod logging;
pub mod photo;
pub mod query;
pub mod session;
pub mod store;
pub mod validation;

pub use config::Config;
pub use employee::{Candidate, Employee, Sex};
pub use error::{Error, Result};
pub use logging::init_logging;
pub use query::{Criteria, PhotoFilter, SortKey};
pub use session::Session;
pub use store::{DocumentStore, LocalStore, Store, Subscription};
pub use validation::{ValidationError, ValidationReport, Validator};

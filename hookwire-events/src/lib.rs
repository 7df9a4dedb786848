//! Typed webhook events for Hookwire
//!
//! This crate turns the JSON notifications a device-management platform
//! sends into validated, immutable [`Event`] values.
//!
//! ## Features
//!
//! - **Closed tag set** - [`EventTag`] lists every event the platform emits
//! - **Schemas** - ordered required/optional field definitions per tag,
//!   with dotted paths into nested objects
//! - **Parser** - fail-fast validation that keeps the raw payload around
//! - **Fixtures** - sample payloads per tag, embedded or loaded from disk
//!
//! ## Quick Start
//!
//! ```rust
//! use hookwire_events::{EventTag, FixtureStore, Parser};
//!
//! let parser = Parser::builtin();
//! let fixtures = FixtureStore::embedded();
//!
//! let raw = fixtures.get(EventTag::ComputerCheckIn).unwrap();
//! let event = parser.parse(EventTag::ComputerCheckIn, raw).unwrap();
//!
//! assert!(event.field_str("computer.udid").is_some());
//! ```
//!
//! ## Custom Schemas
//!
//! ```rust,ignore
//! let mut schemas = SchemaRegistry::builtin();
//! schemas.register(
//!     EventTag::ComputerCheckIn,
//!     FieldSchema::new().required("udid", FieldKind::String),
//! );
//! let parser = Parser::new(Arc::new(schemas));
//! ```

pub mod builtin;
pub mod error;
pub mod event;
pub mod fixtures;
pub mod parser;
pub mod schema;
pub mod tag;

pub use error::{FixtureLoadError, ParseError, Result};
pub use event::{Event, WebhookInfo, is_envelope};
pub use fixtures::FixtureStore;
pub use parser::Parser;
pub use schema::{FieldKind, FieldSchema, FieldSpec, SchemaRegistry};
pub use tag::{EventTag, UnknownTag};

//! # Objman Architecture
//!
//! Objman is the core of a metadata-driven object manager. Tenants define their
//! own object types; objman decides how records of those objects are laid out on a
//! page and which records a saved list shows. It has two engines:
//!
//! - the **Layout Composition Engine** ([`layout`]): places fields, related lists
//!   and buttons into typed, ordered sections and keeps the placement rules intact
//!   through every edit;
//! - the **Filter Expression Compiler** ([`filter`]): a grouped AND/OR filter model
//!   with field-type-aware validation, compiled to a parameterized SQL predicate and
//!   to a sentence for humans.
//!
//! Both engines are pure: they take a snapshot and return a new one. Everything
//! around them is layered the same way as any UI-agnostic library:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, formats output, handles terminal I/O   │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! │  - Normalizes inputs (tenant ids, compile options)          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Load, run an engine, persist, report                     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌──────────────────────────────┐  ┌───────────────────────────┐
//! │  Engines (layout/, filter/)  │  │  Storage Layer (store/)   │
//! │  - Pure snapshot functions   │  │  - MetadataStore trait    │
//! │  - No I/O                    │  │  - FileStore, InMemory    │
//! └──────────────────────────────┘  └───────────────────────────┘
//! ```
//!
//! ## Expected outcomes are values
//!
//! Dropping a field onto a related-list section is not a failure of the program,
//! it is an answer. Layout operations return [`layout::Outcome`], whose error side
//! is a [`layout::Rejection`] the UI can show inline. [`error::ObjmanError`] is for
//! everything else: missing documents, I/O, malformed JSON, and batches refused at
//! the API boundary.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: One module per command family
//! - [`layout`]: Layout Composition Engine
//! - [`filter`]: Filter Expression Compiler
//! - [`store`]: Storage abstraction and implementations
//! - [`model`]: Shared data types (blocks, sections, tenants, catalog entries)
//! - [`config`]: Configuration management
//! - [`error`]: Error types
//! - `cli`: Argument parsing and printing for the binary (not part of the lib API)

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod filter;
pub mod layout;
pub mod model;
pub mod store;

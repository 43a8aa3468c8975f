//! INI document engine.
//!
//! Reads and writes INI files in UTF-8, UTF-16LE, US-ASCII and ISO-8859-1,
//! keeps sections and items in file order with case-insensitive lookup, and
//! maps typed values to and from documents through a declarative schema.
//!
//! The public API is organised into four layers:
//!
//! - **[`parser`]**: classify lines and build a catalog, skipping bad lines
//! - **[`catalog`]**: ordered sections and items with case-insensitive lookup
//! - **[`document`]**: encoding-aware load and save, with retries on locked files
//! - **[`mapper`]**: schema-driven mapping of typed values, maps and nested sections
//!
//! The `inimap` binary is built from [`cli`], [`commands`], [`settings`] and
//! [`logging`].
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod catalog;
pub mod cli;
pub mod commands;
pub mod document;
pub mod encoding;
pub mod error;
pub mod logging;
pub mod mapper;
pub mod numeric;
pub mod parser;
pub mod quote;
pub mod retry;
pub mod settings;

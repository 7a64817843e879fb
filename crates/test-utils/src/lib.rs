// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Testing utilities for jsonsql-lsp
//!
//! This crate provides common testing components including:
//! - Scripted pretty-printers for exercising the formatting fallbacks
//! - JSON documents with and without embedded SQL
//! - Assertions over formatting outcomes and spans

pub mod assertions;
pub mod fixtures;
pub mod mock_printer;

// Re-exports for convenience
pub use assertions::FormatAssertions;
pub use fixtures::JsonFixtures;
pub use mock_printer::{FailingPrinter, IdentityPrinter, RecordingPrinter, ScriptedPrinter};

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Console output for test runs.

pub mod text;

pub use text::ConsoleReporter;

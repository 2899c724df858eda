// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

pub mod blob;
pub mod config;
pub mod credential;
pub mod error;
pub mod handler;
pub mod opsgenie;
pub mod slack;
pub mod sync;

#[cfg(test)]
mod test_support;

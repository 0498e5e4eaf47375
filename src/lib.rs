// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Credential Service - user registration and session token issuance
//!
//! This crate registers users, verifies login credentials and issues
//! short-lived signed access tokens together with longer-lived refresh
//! tokens that can be exchanged for new access tokens.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Token codec, password hashing and session flows
//! - `storage` - Credential store (redb)

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod state;
pub mod storage;

//! Shared test utilities for cverse-images integration tests

#![allow(dead_code)]

pub mod db_utils;
pub mod fake_store;
pub mod mock_providers;

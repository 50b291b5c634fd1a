//! Common test utilities for regenradar.
//!
//! This module provides shared fixtures, a recording map surface and
//! assertion helpers for the integration tests.

#![allow(dead_code)]

pub mod assertions;
pub mod fixtures;
pub mod image_utils;
pub mod recording;

// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Secret Detection Library
 * Exposes detection, crawling, and reporting modules for testing
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

// Core types and error handling
pub mod errors;
pub mod types;

// Detection pipeline
pub mod filters;
pub mod patterns;
pub mod scanner;
pub mod severity;

// Scan sources
pub mod crawler;
pub mod http_client;
pub mod sources;

// Aggregation and output
pub mod reporting;
pub mod session;

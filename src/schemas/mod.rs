//! Request/response wire types for the HTTP API.

pub mod completions;

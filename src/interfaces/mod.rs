//! Outer surfaces. Only HTTP for now.

pub mod http;

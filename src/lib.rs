//! Static file server that matches request paths against the disk case-insensitively.

pub mod error;
pub mod sys_config;
pub mod sys_core;
pub mod sys_resolver;
pub mod sys_statichost;
pub mod trc;

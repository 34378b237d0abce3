//! xcsh: interactive command shell for cloud resource domains
//!
//! A registry of hand-written and API-generated domains, a dispatcher that resolves
//! `domain [group] command [args]` to a handler, and a completion engine that walks the
//! same tree in the same order, backed by cached live values and static shell scripts.

pub mod api;
pub mod cli;
pub mod completion;
pub mod config;
pub mod dispatch;
pub mod domains;
pub mod error;
pub mod logging;
pub mod registry;
pub mod scripts;
pub mod session;
pub mod shell;
pub mod values;

//! CLI domain: parse, route and output only.
//! No domain logic; the route table hands everything else to the shell.

mod output;
mod parse;
mod route;

pub use output::{map_error, render_result};
pub use parse::{Cli, Commands};
pub use route::RunContext;

//! Completion: a unified tree over custom and generated domains, and the engine that
//! walks it.

mod adapter;
mod engine;
mod node;

pub use adapter::{api_domain_node, custom_domain_node, domain_node, CompletionTree};
pub use engine::CompletionEngine;
pub use node::{
    CompletionContext, CompletionFlag, CompletionNode, FlagValues, NodeKind, Source, Suggestion,
    SuggestionCategory,
};

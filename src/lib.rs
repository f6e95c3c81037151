//! OmniMind NLU - zero-shot intent classification line server

pub mod core;
pub mod nlu;
pub mod server;

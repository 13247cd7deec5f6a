//! State management module for Editor Session
//!
//! One store per panel, each owning its state exclusively:
//! - `document_state`: open documents and the active tab
//! - `tree_state`: expanded folders of the static file tree
//! - `conversation_state`: assistant chat log and pending replies

mod conversation_state;
mod document_state;
mod tree_state;

pub use conversation_state::*;
pub use document_state::*;
pub use tree_state::*;

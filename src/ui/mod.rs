//! Terminal UI layer for the chat session.
//!
//! - [`chat_loop`]: terminal setup, key handling and the interaction loop.
//! - [`renderer`] and [`banner`]: pure view composition from [`crate::core::app::App`].
//! - [`theme`]: color and style policy.
//!
//! Ownership boundary: this layer presents and captures interaction state, while
//! [`crate::core`] owns conversation state, persistence and the network.

pub mod banner;
pub mod chat_loop;
pub mod renderer;
pub mod theme;

//! Synthesis adapters that need no model.

mod listing_synthesizer;

pub use listing_synthesizer::ListingSynthesizer;

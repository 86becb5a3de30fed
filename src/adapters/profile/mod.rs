//! Profile Adapters.
//!
//! Model-free implementations of the profile-side ports.
//!
//! ## Available Adapters
//!
//! - `KeywordProfileExtractor` - ProfileExtractor over keyword tables
//! - `JsonPersonaDirectory` - PersonaDirectory loaded from a JSON file
//! - `TemplateQueryWriter` - QueryWriter composing profile fields

mod json_persona_directory;
mod keyword_extractor;
mod template_query_writer;

pub use json_persona_directory::JsonPersonaDirectory;
pub use keyword_extractor::KeywordProfileExtractor;
pub use template_query_writer::TemplateQueryWriter;

// enumwright - C++ enum header generation from declarative enum definitions

// Data model and configuration
pub mod config;
pub mod error;
pub mod loader;
pub mod types;

// Analysis
pub mod bits;
pub mod contiguity;
pub mod default;
pub mod metadata;
pub mod validator;

// Emission
pub mod emit;

// Re-export commonly used items for convenience
pub use config::GeneratorConfig;
pub use emit::{generate, generate_at};
pub use error::{EnumwrightError, Result};
pub use metadata::{DerivedMetadata, EnumModel};
pub use types::{EnumDefinition, EnumEntry, EnumKind};

mod generation;

// Re-export the domain boundary types and ports.
pub use generation::{
    GenerateContentRequest, GenerationProvider, Part, ProviderError, SystemInstruction,
};

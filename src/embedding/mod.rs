// Embedding providers — the swap-ready abstraction.
//
// The clusterer only needs `embed(phrases) -> vectors`; everything about
// which API serves the vectors lives behind the EmbeddingProvider trait so
// the provider can be swapped (or mocked in tests) without touching the
// clustering stage.

pub mod openai;
pub mod traits;

pub use traits::EmbeddingProvider;

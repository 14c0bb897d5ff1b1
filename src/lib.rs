// Quilt: theme consolidation for free-text survey responses
//
// This is the library root. Each module is one stage of the topic-to-theme
// pipeline (corpus -> cluster -> labeling -> explode) or a supporting
// concern (dataset I/O, provider clients, config, terminal output).

pub mod cluster;
pub mod config;
pub mod corpus;
pub mod dataset;
pub mod embedding;
pub mod error;
pub mod explode;
pub mod labeling;
pub mod output;
pub mod pipeline;

//! High-level operations invoked by the CLI or a host build engine.

pub mod drydock_preprocess;

// ABOUTME: In-memory document tree: node payloads, document and node handles, adoption and serialization.
// ABOUTME: Trees live in ego_tree arenas owned by reference-counted Document handles.

//! DOM tree model.
//!
//! A [`Document`] owns one arena of [`NodeData`]. A [`Node`] is a cheap
//! handle pairing a document with a node id; nodes from different documents
//! belong to different ownership domains, and moving content between them
//! always goes through [`adopt`].

pub mod adopt;
mod data;
mod document;
mod node;
pub mod serialize;

pub use adopt::adopt;
pub use data::{Attribute, ElementData, NodeData};
pub use document::Document;
pub use node::Node;

pub(crate) use node::Position;

//! Node-laag: waarden, attributen en de stateful necklace-node.

pub mod node;
pub mod value;

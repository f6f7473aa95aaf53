pub mod node;
pub mod reverse;

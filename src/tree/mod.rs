pub mod address;
pub mod edit;
pub mod enumerate;
pub mod node;
pub mod value;
pub mod walk;

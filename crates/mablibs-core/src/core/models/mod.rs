pub mod mutation;
pub mod template;

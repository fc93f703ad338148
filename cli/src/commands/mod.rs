pub mod find;
pub mod show;
pub mod tree;

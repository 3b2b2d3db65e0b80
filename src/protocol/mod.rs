pub mod completion;
pub mod extract;

pub mod dump;
pub mod validate;

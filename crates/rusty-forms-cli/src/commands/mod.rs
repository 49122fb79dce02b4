pub mod attrs;
pub mod sample;
pub mod validate;

pub mod assembler;
pub mod field_spec;
pub mod normalize;
pub mod translations;

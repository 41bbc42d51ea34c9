pub mod gl_fancy;
pub mod gl_helper;
pub mod linear;

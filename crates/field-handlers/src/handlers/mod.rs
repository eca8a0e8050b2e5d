pub mod checkbox;
pub mod generic;
pub mod json;
pub mod number;
pub mod rating;
pub mod select;
pub mod temporal;
pub mod text;
pub mod time;

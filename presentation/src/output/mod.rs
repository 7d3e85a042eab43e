//! Result and error rendering

pub mod console;
pub mod formatter;

pub mod extract;
pub mod formats;
pub mod info;

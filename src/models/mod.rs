pub mod banner;
pub mod content;

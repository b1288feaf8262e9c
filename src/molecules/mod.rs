pub mod editor;
pub mod export;
pub mod list;

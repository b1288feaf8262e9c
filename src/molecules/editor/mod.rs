mod autosave;
mod debounce;

pub use autosave::ContentAutosave;
pub use debounce::Debouncer;

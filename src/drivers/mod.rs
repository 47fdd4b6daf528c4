pub mod debouncer;
pub mod indicators;

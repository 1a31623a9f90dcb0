//! As-you-type search: debounce timer and the session that owns the results

pub mod debounce;
pub mod session;

pub use session::SearchSession;

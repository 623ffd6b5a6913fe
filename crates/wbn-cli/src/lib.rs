pub mod classify;
pub mod util;

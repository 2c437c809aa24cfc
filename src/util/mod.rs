pub(crate) mod retry;
pub mod time;

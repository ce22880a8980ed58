mod handler;

pub use handler::{get_me, register, update_me};

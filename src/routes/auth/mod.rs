mod handler;

pub use handler::{change_password, login, logout, logout_all, me, refresh};

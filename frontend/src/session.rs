//! 会话模块
//!
//! - `store`: 持久化会话存储（LocalStorage 的读写语义）
//! - `controller`: 会话生命周期控制器（hydrate / login / signup /
//!   verify_otp / logout）

pub mod controller;
pub mod store;

pub use controller::SessionController;
pub use store::{KeyValueStorage, SessionStore};

//! Queue module: the callback queue shared by workers and the main thread.

mod memory;

pub use memory::CallbackQueue;

//! Domain model (ids, queued callbacks, errors).

pub mod callback;
pub mod errors;
pub mod ids;

pub use self::callback::{Callback, Origin, PendingCallback, bind};
pub use self::errors::DispatchError;
pub use self::ids::CallbackId;

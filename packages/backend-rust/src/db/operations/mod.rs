pub mod progress;
pub mod quiz;
pub mod speech;
pub mod user;

pub use progress::*;
pub use quiz::*;
pub use speech::*;
pub use user::*;

//! Auth-domain models: session state, token secrets, second-factor challenges, and the
//! screen selector they drive.

pub mod screen;
pub mod second_factor;
pub mod secret;
pub mod session;

pub use screen::*;
pub use second_factor::*;
pub use secret::*;
pub use session::*;

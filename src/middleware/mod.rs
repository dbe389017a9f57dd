pub mod flash;
pub mod schema;
pub mod session;

pub use flash::{Flash, FlashLevel};
pub use session::{CookieSettings, CurrentUser, SessionIdentity};

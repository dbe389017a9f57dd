pub mod auth;
pub mod inventory;
pub mod password;

pub use auth::AuthService;
pub use inventory::{InventoryService, ItemForm};

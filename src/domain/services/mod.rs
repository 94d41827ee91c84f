mod auth_store;
pub mod chat;
mod navigation;
pub mod payments;
mod project_store;

pub use auth_store::*;
pub use chat::ChatFlow;
pub use chat::SendOutcome;
pub use navigation::*;
pub use payments::PaymentOutcome;
pub use payments::PaymentPoller;
pub use project_store::*;

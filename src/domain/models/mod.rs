mod message;
mod payment;
mod plan;
mod plugin;
mod project;
mod route;
mod user;

pub use message::*;
pub use payment::*;
pub use plan::*;
pub use plugin::*;
pub use project::*;
pub use route::*;
pub use user::*;

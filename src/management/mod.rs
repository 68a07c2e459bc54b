mod auth;
mod poller;
mod scheduler;
mod store;

pub use auth::TokenManager;
pub use poller::ReleasePoller;
pub use scheduler::LastReport;
pub use scheduler::Scheduler;
pub use store::JsonStore;
pub use store::SyncStore;

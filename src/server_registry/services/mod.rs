//! Application services for server discovery and launching.

mod discovery;
mod handles;
mod supervisor;

pub use discovery::{
    ListingOrder, ParseListingOrderError, ServerDiscoveryError, ServerDiscoveryResult,
    ServerDiscoveryService,
};
pub use handles::{
    DEFAULT_HANDLE_CAPACITY, LaunchHandleRegistry, SupervisorStateError, SupervisorStateResult,
};
pub use supervisor::{LaunchError, LaunchOutcome, LaunchResult, LaunchSupervisor};

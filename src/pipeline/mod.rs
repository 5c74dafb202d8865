//! Host runtime
//!
//! The smallest host that can drive a decorated component through its whole
//! lifecycle:
//!
//! ```text
//! mount ──► WillMount ──► render ──► DidMount
//!   set_props / set_state ──► should_update? ──► render ──► DidUpdate
//!   tick ──► invalidated reactions ──► forced render ──► DidUpdate
//! unmount ──► WillUnmount ──► release
//! ```
//!
//! Host-initiated updates consult the definition's should-update check;
//! forced updates (tracker invalidations, [`MountHandle::force_update`]) never do.

pub mod mount;

pub(crate) use mount::force_update;
pub use mount::{mount, mount_with_context, tick, unmount, MountHandle};

//! Session-related types.
//!
//! The session holds two entries: the signed-in [`AuthUser`] and the
//! [`TrackerView`] for this browser.
//!
//! [`AuthUser`]: crate::identity::AuthUser
//! [`TrackerView`]: crate::view::TrackerView

/// Session keys.
pub mod keys {
    /// Key for storing the signed-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for storing the tracker page state.
    pub const TRACKER_VIEW: &str = "tracker_view";
}

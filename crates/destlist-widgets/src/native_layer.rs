#![forbid(unsafe_code)]

//! Native actions reachable from the destination list.

/// Host capabilities the list forwards user actions to.
pub trait NativeLayer {
    /// Open the platform's printer management UI.
    fn manage_printers(&self);
}

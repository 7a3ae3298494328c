/// Exposes a copyable native handle.
pub trait Handle {
    type Target;

    fn handle(&self) -> Self::Target;
}

/// Exposes a native handle that must not be copied out of its owner.
pub trait BorrowHandle {
    type Target;

    fn handle(&self) -> &Self::Target;
}

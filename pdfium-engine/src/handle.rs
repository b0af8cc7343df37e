//! Opaque engine handle types
//!
//! The engine identifies documents, pages, bookmarks, links, destinations,
//! and actions by bare integer/pointer values. Each kind gets its own
//! newtype so one can never be passed where another is expected; nothing on
//! this side of the boundary interprets the raw value.

/// Declares an opaque handle newtype over the engine's raw identity.
macro_rules! engine_handle {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(u64);

        impl $name {
            /// Wrap a raw engine identity.
            pub fn from_raw(raw: u64) -> Self {
                Self(raw)
            }

            /// Get the raw engine identity back.
            pub fn raw(self) -> u64 {
                self.0
            }
        }
    };
}

engine_handle! {
    /// An open document inside the engine.
    ///
    /// Valid only between a successful open and the matching close.
    DocumentHandle
}

engine_handle! {
    /// A loaded page inside the engine.
    ///
    /// Must not be used after its owning document is closed.
    PageHandle
}

engine_handle! {
    /// A node in the engine's flat sibling/first-child outline relation.
    BookmarkHandle
}

engine_handle! {
    /// A link annotation found on a page.
    LinkHandle
}

engine_handle! {
    /// A navigation destination referenced by a link or bookmark.
    DestinationHandle
}

engine_handle! {
    /// An action (URI, launch, remote goto, ...) referenced by a link.
    ActionHandle
}

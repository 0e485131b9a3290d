#![forbid(unsafe_code)]

//! Dock model: icons, their ordering and favorites.
//!
//! # Ownership
//!
//! [`IconCollection`] owns every [`Icon`] in an arena. Everything else holds
//! [`IconId`] handles; a handle that no longer resolves makes the operation a
//! silent no-op.
//!
//! # Example
//!
//! ```
//! use dock_model::{Icon, IconCollection, IconKind};
//! use web_time::Instant;
//!
//! let mut icons = IconCollection::new();
//! let a = icons.push(Icon::new(IconKind::Application).with_priority(10));
//! let b = icons.push(Icon::new(IconKind::Application).with_priority(20));
//! icons.reorder_before(b, a, false, Instant::now());
//! assert_eq!(icons.ids(), &[b, a]);
//! ```

pub mod collection;
pub mod events;
pub mod favorites;
pub mod icon;

pub use collection::{DEFAULT_REMOVAL_GRACE, IconCollection};
pub use events::ModelEvent;
pub use favorites::{
    FavoriteStore, FavoritesChange, FavoritesSync, MemoryFavoriteStore, PRIORITY_STRIDE,
};
pub use icon::{Icon, IconCapabilities, IconId, IconKind, IconPosition};

#![forbid(unsafe_code)]

//! Favorites contract and synchronisation.
//!
//! Persistence is external: a host implements [`FavoriteStore`] over its own
//! settings backend. [`FavoritesSync`] keeps the collection's floating group in
//! step with the store in both directions.
//!
//! Favorites are identified by URI. Only `Floating` icons take part; `Begin`
//! and `End` icons keep their own priorities.

use ahash::AHashSet;
use web_time::Instant;

use crate::collection::IconCollection;
use crate::icon::{Icon, IconId, IconPosition};

/// Gap between consecutive priorities handed out by a reset.
pub const PRIORITY_STRIDE: i32 = 10;

/// A change made to the store from outside the dock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FavoritesChange {
    Added { uri: String, position: usize },
    Removed { uri: String },
    Reordered,
}

/// Ordered favorites list.
///
/// The `*_favorite` methods are the dock's own writes and must not come back
/// through [`take_notifications`](Self::take_notifications).
pub trait FavoriteStore {
    /// Favorite URIs in store order.
    fn favorites(&self) -> Vec<String>;

    /// Insert `uri` at `position` (clamped to the end).
    fn add_favorite(&mut self, uri: &str, position: usize);

    fn remove_favorite(&mut self, uri: &str) -> bool;

    /// Move an existing favorite to `position` (clamped to the end).
    fn move_favorite(&mut self, uri: &str, position: usize) -> bool;

    /// Drain changes made by other writers since the last call.
    fn take_notifications(&mut self) -> Vec<FavoritesChange>;
}

/// In-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryFavoriteStore {
    uris: Vec<String>,
    pending: Vec<FavoritesChange>,
}

impl MemoryFavoriteStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_favorites<I, S>(uris: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            uris: uris.into_iter().map(Into::into).collect(),
            pending: Vec::new(),
        }
    }

    /// Apply a change as another writer would, queueing its notification.
    pub fn push_external(&mut self, change: FavoritesChange) {
        match &change {
            FavoritesChange::Added { uri, position } => self.add_favorite(uri, *position),
            FavoritesChange::Removed { uri } => {
                self.remove_favorite(uri);
            }
            FavoritesChange::Reordered => {}
        }
        self.pending.push(change);
    }

    /// Replace the whole list as another writer would.
    pub fn reorder_external(&mut self, uris: Vec<String>) {
        self.uris = uris;
        self.pending.push(FavoritesChange::Reordered);
    }
}

impl FavoriteStore for MemoryFavoriteStore {
    fn favorites(&self) -> Vec<String> {
        self.uris.clone()
    }

    fn add_favorite(&mut self, uri: &str, position: usize) {
        if self.uris.iter().any(|u| u == uri) {
            return;
        }
        let position = position.min(self.uris.len());
        self.uris.insert(position, uri.to_owned());
    }

    fn remove_favorite(&mut self, uri: &str) -> bool {
        let before = self.uris.len();
        self.uris.retain(|u| u != uri);
        self.uris.len() != before
    }

    fn move_favorite(&mut self, uri: &str, position: usize) -> bool {
        let Some(from) = self.uris.iter().position(|u| u == uri) else {
            return false;
        };
        let entry = self.uris.remove(from);
        let position = position.min(self.uris.len());
        self.uris.insert(position, entry);
        from != position
    }

    fn take_notifications(&mut self) -> Vec<FavoritesChange> {
        std::mem::take(&mut self.pending)
    }
}

/// Collection/store synchronisation.
#[derive(Debug, Clone, Copy, Default)]
pub struct FavoritesSync;

impl FavoritesSync {
    /// Renumber the floating group: favorites first in store order, then the
    /// remaining floating icons in their current order. Sticky flags follow
    /// store membership. Returns whether the display order changed.
    pub fn reset_priorities(collection: &mut IconCollection, store: &dyn FavoriteStore) -> bool {
        let favorites = store.favorites();
        let floating: Vec<IconId> = collection
            .iter()
            .filter(|icon| icon.position() == IconPosition::Floating)
            .map(Icon::id)
            .collect();

        let mut assigned = Vec::with_capacity(floating.len());
        let mut seen: AHashSet<IconId> = AHashSet::with_capacity(floating.len());
        let mut priority = 0;
        for uri in &favorites {
            let Some(id) = floating
                .iter()
                .copied()
                .find(|id| collection.get(*id).and_then(Icon::uri) == Some(uri.as_str()))
            else {
                continue;
            };
            if seen.insert(id) {
                assigned.push((id, priority));
                priority += PRIORITY_STRIDE;
            }
        }
        for id in &floating {
            let sticky = seen.contains(id);
            collection.set_sticky(*id, sticky);
            if !sticky {
                assigned.push((*id, priority));
                priority += PRIORITY_STRIDE;
            }
        }

        let changed = collection.set_priorities(&assigned);
        tracing::debug!(
            target: "dock.model",
            favorites = favorites.len(),
            floating = floating.len(),
            changed,
            "favorites priorities reset"
        );
        changed
    }

    /// Write the sticky icons' current order back to the store.
    pub fn save_order(collection: &IconCollection, store: &mut dyn FavoriteStore) {
        let sticky: Vec<&str> = collection
            .iter()
            .filter(|icon| icon.is_sticky() && icon.capabilities().can_be_favorite)
            .filter_map(Icon::uri)
            .collect();
        let known = store.favorites();
        for (position, uri) in sticky.iter().enumerate() {
            if known.iter().any(|u| u == uri) {
                store.move_favorite(uri, position);
            } else {
                store.add_favorite(uri, position);
            }
        }
        tracing::debug!(target: "dock.model", saved = sticky.len(), "favorites order saved");
    }

    /// Show a freshly inserted icon without disturbing the others.
    ///
    /// A floating icon goes after the last floating icon; a favorite then
    /// moves next to its nearest neighbour in store order. Returns whether
    /// the icon was added.
    pub fn place_new(
        collection: &mut IconCollection,
        store: &dyn FavoriteStore,
        id: IconId,
        now: Instant,
    ) -> bool {
        let Some(icon) = collection.get(id) else {
            return false;
        };
        if collection.contains(id) {
            return false;
        }
        if icon.position() != IconPosition::Floating {
            return collection.add_icon(id);
        }

        let tail = collection
            .iter()
            .filter(|icon| icon.position() == IconPosition::Floating)
            .map(Icon::sort_priority)
            .max();
        collection.set_priority(id, tail.map_or(0, |p| p.saturating_add(PRIORITY_STRIDE)));
        if !collection.add_icon(id) {
            return false;
        }

        let favorites = store.favorites();
        let favorite = collection
            .get(id)
            .and_then(Icon::uri)
            .is_some_and(|uri| favorites.iter().any(|u| u == uri));
        collection.set_sticky(id, favorite);
        if favorite {
            Self::place_favorite(collection, &favorites, id, false, now);
        }
        tracing::debug!(target: "dock.model", icon = %id, favorite, "new icon placed");
        true
    }

    /// Follow one external change. Returns whether the display order changed.
    ///
    /// Only sticky icons move; every other floating icon keeps its slot.
    pub fn apply_change(
        collection: &mut IconCollection,
        store: &dyn FavoriteStore,
        change: &FavoritesChange,
        now: Instant,
    ) -> bool {
        let before = collection.ids().to_vec();
        match change {
            FavoritesChange::Added { uri, .. } => {
                if let Some(id) = floating_with_uri(collection, uri) {
                    collection.set_sticky(id, true);
                    Self::place_favorite(collection, &store.favorites(), id, true, now);
                }
            }
            FavoritesChange::Removed { uri } => {
                if let Some(id) = floating_with_uri(collection, uri) {
                    collection.set_sticky(id, false);
                }
            }
            FavoritesChange::Reordered => Self::follow_store_order(collection, &store.favorites()),
        }
        let changed = collection.ids() != before.as_slice();
        tracing::debug!(target: "dock.model", ?change, changed, "favorites change");
        changed
    }

    /// Drain the store's notifications and apply them.
    pub fn sync(collection: &mut IconCollection, store: &mut dyn FavoriteStore, now: Instant) -> bool {
        let changes = store.take_notifications();
        let mut changed = false;
        for change in &changes {
            changed |= Self::apply_change(collection, &*store, change, now);
        }
        changed
    }

    /// Move favorite `id` in front of the next favorite (store order) that
    /// has an icon, else behind the previous one.
    fn place_favorite(
        collection: &mut IconCollection,
        favorites: &[String],
        id: IconId,
        animate: bool,
        now: Instant,
    ) -> bool {
        let Some(index) = collection
            .get(id)
            .and_then(Icon::uri)
            .and_then(|uri| favorites.iter().position(|u| u == uri))
        else {
            return false;
        };
        let view: &IconCollection = collection;
        let neighbour = |uri: &String| floating_with_uri(view, uri).filter(|n| *n != id);
        let next = favorites[index + 1..].iter().find_map(neighbour);
        let previous = favorites[..index].iter().rev().find_map(neighbour);
        match (next, previous) {
            (Some(next), _) => collection.reorder_before(id, next, animate, now),
            (None, Some(previous)) => collection.reorder_after(id, previous),
            (None, None) => false,
        }
    }

    /// Permute the sticky icons' slots into store order. Non-favorites keep
    /// their priorities; sticky flags follow store membership.
    fn follow_store_order(collection: &mut IconCollection, favorites: &[String]) {
        let ranked: Vec<(IconId, i32, Option<usize>)> = collection
            .iter()
            .filter(|icon| icon.position() == IconPosition::Floating)
            .map(|icon| {
                let rank = icon
                    .uri()
                    .and_then(|uri| favorites.iter().position(|u| u == uri));
                (icon.id(), icon.sort_priority(), rank)
            })
            .collect();
        for (id, _, rank) in &ranked {
            collection.set_sticky(*id, rank.is_some());
        }

        let mut sticky: Vec<(usize, IconId)> = ranked
            .iter()
            .filter_map(|(id, _, rank)| rank.map(|r| (r, *id)))
            .collect();
        sticky.sort_by_key(|(rank, _)| *rank);
        let mut queue = sticky.into_iter().map(|(_, id)| id);
        let assigned: Vec<(IconId, i32)> = ranked
            .iter()
            .map(|(id, priority, rank)| {
                let id = if rank.is_some() {
                    queue.next().unwrap_or(*id)
                } else {
                    *id
                };
                (id, *priority)
            })
            .collect();
        collection.set_priorities(&assigned);
    }
}

fn floating_with_uri(collection: &IconCollection, uri: &str) -> Option<IconId> {
    collection
        .iter()
        .find(|icon| icon.position() == IconPosition::Floating && icon.uri() == Some(uri))
        .map(Icon::id)
}

#![forbid(unsafe_code)]

//! Ordered icon collection.
//!
//! The collection owns every [`Icon`] in an arena keyed by [`IconId`] and
//! keeps three views of the ones that are added:
//!
//! - **main**: `Begin` and `Floating` icons, sorted;
//! - **shelf**: `End` icons, sorted;
//! - **full**: main followed by shelf.
//!
//! The sort key is `(position, sort_priority)`. Sorting is stable, so icons
//! with equal keys keep their previous relative order.
//!
//! # Invariants
//!
//! 1. After any public mutation, priorities inside one position group are
//!    strictly increasing along the full order (duplicates are healed).
//! 2. Position ordinals are non-decreasing along the full order.
//! 3. Invalid handles turn every operation into a silent no-op.
//! 4. [`ModelEvent::OrderChanged`] is queued only when the full order really
//!    changed.
//!
//! # Removal grace
//!
//! [`IconCollection::mark_for_removal`] flags the icon immediately and erases
//! it only after the grace period, through the task table key
//! `(RemovalGrace, id)`. Re-adding inside the grace period cancels the erase.

use std::time::Duration;

use ahash::AHashMap;
use dock_core::{Quirk, TaskTable};
use web_time::Instant;

use crate::events::ModelEvent;
use crate::icon::{Icon, IconId, IconKind, IconPosition};

/// Default grace between marking an icon removed and erasing it.
pub const DEFAULT_REMOVAL_GRACE: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
enum ModelTask {
    RemovalGrace,
}

/// Icon arena plus its ordered views.
#[derive(Debug, Clone)]
pub struct IconCollection {
    arena: AHashMap<IconId, Icon>,
    next_id: u64,
    main: Vec<IconId>,
    shelf: Vec<IconId>,
    order: Vec<IconId>,
    selection: usize,
    monitors: usize,
    removal_grace: Duration,
    tasks: TaskTable<ModelTask, IconId>,
    events: Vec<ModelEvent>,
}

impl Default for IconCollection {
    fn default() -> Self {
        Self::new()
    }
}

impl IconCollection {
    #[must_use]
    pub fn new() -> Self {
        Self {
            arena: AHashMap::new(),
            next_id: 1,
            main: Vec::new(),
            shelf: Vec::new(),
            order: Vec::new(),
            selection: 0,
            monitors: 1,
            removal_grace: DEFAULT_REMOVAL_GRACE,
            tasks: TaskTable::new(),
            events: Vec::new(),
        }
    }

    /// Override the removal grace period.
    #[must_use]
    pub fn with_removal_grace(mut self, grace: Duration) -> Self {
        self.removal_grace = grace;
        self
    }

    pub fn set_removal_grace(&mut self, grace: Duration) {
        self.removal_grace = grace;
    }

    #[inline]
    pub fn removal_grace(&self) -> Duration {
        self.removal_grace
    }

    // -----------------------------------------------------------------------
    // Arena
    // -----------------------------------------------------------------------

    /// Take ownership of `icon` and give it a handle. The icon is not yet part
    /// of the ordered views; see [`add_icon`](Self::add_icon).
    pub fn insert(&mut self, mut icon: Icon) -> IconId {
        let id = IconId(self.next_id);
        self.next_id += 1;
        icon.id = id;
        icon.set_monitor_count(self.monitors);
        self.arena.insert(id, icon);
        id
    }

    /// [`insert`](Self::insert) followed by [`add_icon`](Self::add_icon).
    pub fn push(&mut self, icon: Icon) -> IconId {
        let id = self.insert(icon);
        self.add_icon(id);
        id
    }

    #[inline]
    pub fn get(&self, id: IconId) -> Option<&Icon> {
        self.arena.get(&id)
    }

    /// Mutable access for quirks and presentation state. Ordering fields stay
    /// private to the collection.
    #[inline]
    pub fn get_mut(&mut self, id: IconId) -> Option<&mut Icon> {
        self.arena.get_mut(&id)
    }

    /// True if `id` is part of the ordered views.
    pub fn contains(&self, id: IconId) -> bool {
        self.order.contains(&id)
    }

    /// Number of monitors quirk tables are sized for.
    #[inline]
    pub fn monitor_count(&self) -> usize {
        self.monitors
    }

    /// Resize every icon's per-monitor state.
    pub fn set_monitor_count(&mut self, monitors: usize) {
        self.monitors = monitors.max(1);
        for icon in self.arena.values_mut() {
            icon.set_monitor_count(self.monitors);
        }
    }

    // -----------------------------------------------------------------------
    // Views
    // -----------------------------------------------------------------------

    /// Icons in display order (main then shelf).
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Icon> + '_ {
        self.order.iter().filter_map(|id| self.arena.get(id))
    }

    /// Main partition in display order.
    pub fn main(&self) -> impl DoubleEndedIterator<Item = &Icon> + '_ {
        self.main.iter().filter_map(|id| self.arena.get(id))
    }

    /// Shelf partition in display order.
    pub fn shelf(&self) -> impl DoubleEndedIterator<Item = &Icon> + '_ {
        self.shelf.iter().filter_map(|id| self.arena.get(id))
    }

    /// Handles in display order.
    #[inline]
    pub fn ids(&self) -> &[IconId] {
        &self.order
    }

    #[inline]
    pub fn main_ids(&self) -> &[IconId] {
        &self.main
    }

    #[inline]
    pub fn shelf_ids(&self) -> &[IconId] {
        &self.shelf
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    #[inline]
    pub fn main_len(&self) -> usize {
        self.main.len()
    }

    #[inline]
    pub fn shelf_len(&self) -> usize {
        self.shelf.len()
    }

    /// Index of `id` in the full order.
    pub fn index_of(&self, id: IconId) -> Option<usize> {
        self.order.iter().position(|i| *i == id)
    }

    /// Another added icon of the same kind exists.
    pub fn icon_has_sibling(&self, id: IconId) -> bool {
        let Some(kind) = self.get(id).map(Icon::kind) else {
            return false;
        };
        self.iter().any(|icon| icon.id != id && icon.kind() == kind)
    }

    /// First added icon of `kind`.
    pub fn find_kind(&self, kind: IconKind) -> Option<IconId> {
        self.iter().find(|icon| icon.kind() == kind).map(Icon::id)
    }

    /// Added icon whose favorites identity is `uri`.
    pub fn find_uri(&self, uri: &str) -> Option<IconId> {
        self.iter().find(|icon| icon.uri() == Some(uri)).map(Icon::id)
    }

    /// Drain queued structural events.
    pub fn take_events(&mut self) -> Vec<ModelEvent> {
        std::mem::take(&mut self.events)
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Add an inserted icon to the ordered views.
    ///
    /// Re-adding an icon that is waiting out its removal grace revives it:
    /// the `removed` flag clears and the pending erase is cancelled.
    pub fn add_icon(&mut self, id: IconId) -> bool {
        let Some(icon) = self.arena.get_mut(&id) else {
            return false;
        };
        if self.order.contains(&id) {
            if icon.removed {
                icon.removed = false;
                self.tasks.cancel(ModelTask::RemovalGrace, id);
                tracing::debug!(target: "dock.model", icon = %id, "pending removal cancelled");
            }
            return false;
        }
        icon.removed = false;
        if icon.position.on_shelf() {
            self.shelf.push(id);
        } else {
            self.main.push(id);
        }
        self.sort();
        self.events.push(ModelEvent::IconAdded(id));
        tracing::debug!(target: "dock.model", icon = %id, len = self.order.len(), "icon added");
        true
    }

    /// Erase an icon from every view and from the arena.
    /// Returns true only when the icon was in one of the visible views.
    pub fn remove_icon(&mut self, id: IconId) -> bool {
        let was_ordered = self.order.contains(&id);
        self.arena.remove(&id);
        self.tasks.cancel_target(id);
        if !was_ordered {
            return false;
        }
        self.main.retain(|i| *i != id);
        self.shelf.retain(|i| *i != id);
        self.order.retain(|i| *i != id);
        if self.selection >= self.order.len() && !self.order.is_empty() {
            self.selection = self.order.len() - 1;
        }
        self.events.push(ModelEvent::IconRemoved(id));
        tracing::debug!(target: "dock.model", icon = %id, len = self.order.len(), "icon removed");
        true
    }

    /// Flag `id` removed now and erase it after the grace period.
    pub fn mark_for_removal(&mut self, id: IconId, now: Instant) -> bool {
        let Some(icon) = self.arena.get_mut(&id) else {
            return false;
        };
        icon.removed = true;
        self.tasks
            .schedule_in(ModelTask::RemovalGrace, id, now, self.removal_grace);
        true
    }

    /// Fire due grace tasks. Returns the icons actually erased.
    pub fn process_timers(&mut self, now: Instant) -> Vec<IconId> {
        let mut erased = Vec::new();
        for (task, id) in self.tasks.take_due(now) {
            match task {
                ModelTask::RemovalGrace => {
                    let still_removed = self.arena.get(&id).is_some_and(|icon| icon.removed);
                    if still_removed && self.remove_icon(id) {
                        erased.push(id);
                    }
                }
            }
        }
        erased
    }

    /// Earliest pending grace deadline.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.tasks.next_deadline()
    }

    /// Move an icon to another group. This is the only cross-group path.
    pub fn set_position(&mut self, id: IconId, position: IconPosition) -> bool {
        let Some(icon) = self.arena.get_mut(&id) else {
            return false;
        };
        if icon.position == position {
            return false;
        }
        icon.position = position;
        if self.order.contains(&id) {
            self.main.retain(|i| *i != id);
            self.shelf.retain(|i| *i != id);
            if position.on_shelf() {
                self.shelf.push(id);
            } else {
                self.main.push(id);
            }
            self.sort();
        }
        true
    }

    /// Pin or unpin an icon as a favorite.
    pub fn set_sticky(&mut self, id: IconId, sticky: bool) -> bool {
        let Some(icon) = self.arena.get_mut(&id) else {
            return false;
        };
        if icon.sticky == sticky {
            return false;
        }
        icon.sticky = sticky;
        self.events.push(if sticky {
            ModelEvent::PositionSaved(id)
        } else {
            ModelEvent::PositionForgot(id)
        });
        true
    }

    /// Assign a priority from outside (favorites sync), then re-sort.
    pub fn set_priority(&mut self, id: IconId, priority: i32) -> bool {
        let Some(icon) = self.arena.get_mut(&id) else {
            return false;
        };
        icon.sort_priority = priority;
        if self.order.contains(&id) {
            self.sort();
        }
        true
    }

    /// Apply several priorities with a single re-sort. Returns whether the
    /// order changed.
    pub fn set_priorities(&mut self, priorities: &[(IconId, i32)]) -> bool {
        for (id, priority) in priorities {
            if let Some(icon) = self.arena.get_mut(id) {
                icon.sort_priority = *priority;
            }
        }
        self.sort()
    }

    // -----------------------------------------------------------------------
    // Ordering
    // -----------------------------------------------------------------------

    /// Stable-sort both partitions, heal duplicate priorities, rebuild the
    /// full order. Returns whether the full order changed.
    pub fn sort(&mut self) -> bool {
        let arena = &self.arena;
        let key = |id: &IconId| {
            arena
                .get(id)
                .map_or((IconPosition::End, i32::MAX), |i| (i.position, i.sort_priority))
        };
        self.main.sort_by_key(key);
        self.shelf.sort_by_key(key);

        let mut order = Vec::with_capacity(self.main.len() + self.shelf.len());
        order.extend_from_slice(&self.main);
        order.extend_from_slice(&self.shelf);

        let mut previous: Option<(IconPosition, i32)> = None;
        let mut saturated: Vec<IconPosition> = Vec::new();
        for id in &order {
            let Some(icon) = self.arena.get_mut(id) else {
                continue;
            };
            let duplicate = previous
                .is_some_and(|(position, priority)| position == icon.position && icon.sort_priority <= priority);
            if duplicate {
                match previous.and_then(|(_, p)| p.checked_add(1)) {
                    Some(healed) => {
                        tracing::trace!(
                            target: "dock.model",
                            icon = %icon.id,
                            from = icon.sort_priority,
                            to = healed,
                            "duplicate priority healed"
                        );
                        icon.sort_priority = healed;
                    }
                    None => {
                        if !saturated.contains(&icon.position) {
                            saturated.push(icon.position);
                        }
                    }
                }
            }
            previous = Some((icon.position, icon.sort_priority));
        }
        for position in saturated {
            self.renumber_group(&order, position);
        }

        let changed = order != self.order;
        self.order = order;
        if changed {
            self.events.push(ModelEvent::OrderChanged);
            tracing::debug!(target: "dock.model", len = self.order.len(), "order changed");
        }
        changed
    }

    /// Move `icon` directly in front of `other` (same group only).
    ///
    /// With `animate`, every icon whose index changes saves its centre so the
    /// sampler glides it to the new slot.
    pub fn reorder_before(&mut self, icon: IconId, other: IconId, animate: bool, now: Instant) -> bool {
        self.reorder(icon, other, Side::Before, animate.then_some(now))
    }

    /// Move `icon` directly behind `other` (same group only).
    pub fn reorder_after(&mut self, icon: IconId, other: IconId) -> bool {
        self.reorder(icon, other, Side::After, None)
    }

    /// Insert on whichever side of `other` the icon is coming from: after it
    /// when `icon` currently precedes `other`, before it otherwise.
    pub fn reorder_smart(&mut self, icon: IconId, other: IconId, animate: bool, now: Instant) -> bool {
        let (Some(a), Some(b)) = (self.index_of(icon), self.index_of(other)) else {
            return false;
        };
        let side = if a < b { Side::After } else { Side::Before };
        self.reorder(icon, other, side, animate.then_some(now))
    }

    fn reorder(&mut self, icon: IconId, other: IconId, side: Side, animate: Option<Instant>) -> bool {
        if icon == other || !self.contains(icon) || !self.contains(other) {
            return false;
        }
        let (Some(position), Some(other_position)) = (
            self.arena.get(&icon).map(Icon::position),
            self.arena.get(&other).map(Icon::position),
        ) else {
            return false;
        };
        if position != other_position {
            return false;
        }

        let group: Vec<IconId> = self
            .order
            .iter()
            .copied()
            .filter(|id| self.arena.get(id).is_some_and(|i| i.position == position))
            .collect();
        let base = self.group_base(&group);

        // Single walk: drop the moved icon and re-insert it next to `other`.
        let mut walked = Vec::with_capacity(group.len());
        for id in &group {
            if *id == icon {
                continue;
            }
            if *id == other {
                match side {
                    Side::Before => walked.extend([icon, other]),
                    Side::After => walked.extend([other, icon]),
                }
            } else {
                walked.push(*id);
            }
        }

        let mut priority = base;
        for (index, id) in walked.iter().enumerate() {
            let Some(entry) = self.arena.get_mut(id) else {
                continue;
            };
            entry.sort_priority = priority;
            priority = priority.saturating_add(1);
            if let Some(now) = animate
                && group.get(index) != Some(id)
            {
                entry.save_center(now);
            }
        }
        let changed = self.sort();
        tracing::debug!(
            target: "dock.model",
            icon = %icon,
            other = %other,
            side = ?side,
            changed,
            "reorder"
        );
        true
    }

    /// First priority for renumbering `group` consecutively: its current
    /// minimum, lowered when the run would pass `i32::MAX`.
    fn group_base(&self, group: &[IconId]) -> i32 {
        let min = group
            .iter()
            .filter_map(|id| self.arena.get(id))
            .map(Icon::sort_priority)
            .min()
            .unwrap_or(0);
        let span = i32::try_from(group.len().saturating_sub(1)).unwrap_or(i32::MAX);
        min.min(i32::MAX - span)
    }

    /// Renumber one group of `order` consecutively, keeping its order. Used
    /// when healing a duplicate would overflow.
    fn renumber_group(&mut self, order: &[IconId], position: IconPosition) {
        let group: Vec<IconId> = order
            .iter()
            .copied()
            .filter(|id| self.arena.get(id).is_some_and(|i| i.position == position))
            .collect();
        let mut priority = self.group_base(&group);
        for id in &group {
            if let Some(icon) = self.arena.get_mut(id) {
                icon.sort_priority = priority;
                priority = priority.saturating_add(1);
            }
        }
        tracing::debug!(
            target: "dock.model",
            position = ?position,
            len = group.len(),
            "group renumbered below saturation"
        );
    }

    /// Neighbour to restore a cancelled drag against: the previous icon of
    /// the same group (`is_before = true`) or else the next one.
    pub fn closest_icon(&self, id: IconId) -> Option<(IconId, bool)> {
        let index = self.index_of(id)?;
        let position = self.get(id)?.position;
        let same_group = |i: &IconId| self.get(*i).is_some_and(|icon| icon.position == position);
        if let Some(prev) = self.order[..index].iter().rev().find(|i| same_group(*i)) {
            return Some((*prev, true));
        }
        self.order[index + 1..]
            .iter()
            .find(|i| same_group(*i))
            .map(|next| (*next, false))
    }

    // -----------------------------------------------------------------------
    // Selection
    // -----------------------------------------------------------------------

    #[inline]
    pub fn selection(&self) -> usize {
        self.selection
    }

    /// Icon at the selection index.
    pub fn selected(&self) -> Option<IconId> {
        self.order.get(self.selection).copied()
    }

    pub fn set_selection(&mut self, index: usize) -> bool {
        if index >= self.order.len() || index == self.selection {
            return false;
        }
        self.selection = index;
        self.events.push(ModelEvent::SelectionChanged(index));
        true
    }

    /// Move selection forward, wrapping and skipping hidden icons.
    pub fn select_next(&mut self) -> bool {
        self.step_selection(1)
    }

    /// Move selection backward, wrapping and skipping hidden icons.
    pub fn select_previous(&mut self) -> bool {
        self.step_selection(-1)
    }

    fn step_selection(&mut self, step: isize) -> bool {
        let len = self.order.len();
        if len == 0 {
            return false;
        }
        let mut index = self.selection.min(len - 1);
        for _ in 0..len {
            index = (index as isize + step).rem_euclid(len as isize) as usize;
            let visible = self
                .get(self.order[index])
                .is_some_and(Icon::is_visible);
            if visible {
                return self.set_selection(index);
            }
        }
        false
    }

    // -----------------------------------------------------------------------
    // Quirk helpers
    // -----------------------------------------------------------------------

    /// Set a quirk on an icon; no-op for unknown handles.
    pub fn set_quirk(
        &mut self,
        id: IconId,
        quirk: Quirk,
        value: bool,
        monitor: Option<usize>,
        now: Instant,
    ) -> bool {
        self.arena
            .get_mut(&id)
            .is_some_and(|icon| icon.set_quirk(quirk, value, monitor, now))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Before,
    After,
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS_500: Duration = Duration::from_millis(500);

    fn app(priority: i32) -> Icon {
        Icon::new(IconKind::Application).with_priority(priority).visible()
    }

    fn names(c: &IconCollection, ids: &[IconId]) -> Vec<usize> {
        c.ids()
            .iter()
            .map(|id| ids.iter().position(|x| x == id).unwrap())
            .collect()
    }

    #[test]
    fn add_sorts_and_emits() {
        let mut c = IconCollection::new();
        let b = c.push(app(20));
        let a = c.push(app(10));
        assert_eq!(c.ids(), &[a, b]);
        let events = c.take_events();
        assert!(events.contains(&ModelEvent::IconAdded(a)));
        assert!(events.contains(&ModelEvent::OrderChanged));
        assert!(c.take_events().is_empty());
    }

    #[test]
    fn add_twice_is_noop() {
        let mut c = IconCollection::new();
        let a = c.push(app(1));
        c.take_events();
        assert!(!c.add_icon(a));
        assert!(c.take_events().is_empty());
        assert_eq!(c.len(), 1);
    }

    #[test]
    fn shelf_follows_main() {
        let mut c = IconCollection::new();
        let trash = c.push(Icon::new(IconKind::Trash).visible());
        let a = c.push(app(5));
        let home = c.push(Icon::new(IconKind::Home).with_priority(100).visible());
        assert_eq!(c.ids(), &[home, a, trash]);
        assert_eq!(c.main_ids(), &[home, a]);
        assert_eq!(c.shelf_ids(), &[trash]);
    }

    #[test]
    fn remove_only_reports_once() {
        let mut c = IconCollection::new();
        let a = c.push(app(1));
        c.take_events();
        assert!(c.remove_icon(a));
        assert!(!c.remove_icon(a));
        assert_eq!(c.take_events(), vec![ModelEvent::IconRemoved(a)]);
        assert!(c.get(a).is_none());
    }

    #[test]
    fn removing_unadded_icon_is_silent() {
        let mut c = IconCollection::new();
        let a = c.insert(app(1));
        assert!(!c.remove_icon(a));
        assert!(c.take_events().is_empty());
        assert!(c.get(a).is_none());
    }

    #[test]
    fn grace_period_erases_later() {
        let mut c = IconCollection::new();
        let a = c.push(app(1));
        let t0 = Instant::now();
        assert!(c.mark_for_removal(a, t0));
        assert!(c.get(a).unwrap().is_removed());
        assert!(c.process_timers(t0 + MS_500).is_empty());
        assert_eq!(c.process_timers(t0 + DEFAULT_REMOVAL_GRACE), vec![a]);
        assert!(!c.contains(a));
    }

    #[test]
    fn readd_during_grace_revives() {
        let mut c = IconCollection::new();
        let a = c.push(app(1));
        let t0 = Instant::now();
        c.mark_for_removal(a, t0);
        c.add_icon(a);
        assert!(!c.get(a).unwrap().is_removed());
        assert!(c.process_timers(t0 + DEFAULT_REMOVAL_GRACE * 2).is_empty());
        assert!(c.contains(a));
        assert_eq!(c.next_deadline(), None);
    }

    #[test]
    fn remark_replaces_deadline() {
        let mut c = IconCollection::new().with_removal_grace(MS_500);
        let a = c.push(app(1));
        let t0 = Instant::now();
        c.mark_for_removal(a, t0);
        c.mark_for_removal(a, t0 + MS_500);
        assert!(c.process_timers(t0 + MS_500).is_empty());
        assert_eq!(c.process_timers(t0 + MS_500 * 2), vec![a]);
    }

    #[test]
    fn sort_heals_duplicates() {
        let mut c = IconCollection::new();
        let a = c.push(app(5));
        let b = c.push(app(5));
        let d = c.push(app(6));
        assert_eq!(c.ids(), &[a, b, d]);
        let p: Vec<i32> = c.iter().map(Icon::sort_priority).collect();
        assert_eq!(p, vec![5, 6, 7]);
    }

    #[test]
    fn sort_heals_duplicates_at_max() {
        let mut c = IconCollection::new();
        let a = c.push(app(i32::MAX));
        let b = c.push(app(i32::MAX));
        assert_eq!(c.ids(), &[a, b]);
        let p: Vec<i32> = c.iter().map(Icon::sort_priority).collect();
        assert_eq!(p, vec![i32::MAX - 1, i32::MAX]);
    }

    #[test]
    fn reorder_near_max_stays_unique() {
        let mut c = IconCollection::new();
        let a = c.push(app(i32::MAX - 1));
        let b = c.push(app(i32::MAX));
        let d = c.push(app(i32::MAX - 2));
        assert!(c.reorder_after(d, b));
        assert_eq!(c.ids(), &[a, b, d]);
        let p: Vec<i32> = c.iter().map(Icon::sort_priority).collect();
        assert_eq!(p, vec![i32::MAX - 2, i32::MAX - 1, i32::MAX]);
    }

    #[test]
    fn reorder_before_moves_in_front() {
        let mut c = IconCollection::new();
        let a = c.push(app(10));
        let b = c.push(app(20));
        let now = Instant::now();
        assert!(c.reorder_before(b, a, false, now));
        assert_eq!(c.ids(), &[b, a]);
        assert!(c.get(b).unwrap().sort_priority() < c.get(a).unwrap().sort_priority());
    }

    #[test]
    fn reorder_after_moves_behind() {
        let mut c = IconCollection::new();
        let ids: Vec<IconId> = (0..4).map(|i| c.push(app(i * 10))).collect();
        assert!(c.reorder_after(ids[0], ids[2]));
        assert_eq!(names(&c, &ids), vec![1, 2, 0, 3]);
    }

    #[test]
    fn reorder_smart_picks_side() {
        let mut c = IconCollection::new();
        let ids: Vec<IconId> = (0..4).map(|i| c.push(app(i))).collect();
        let now = Instant::now();
        // Moving down lands after the target.
        c.reorder_smart(ids[0], ids[2], false, now);
        assert_eq!(names(&c, &ids), vec![1, 2, 0, 3]);
        // Moving up lands before the target.
        c.reorder_smart(ids[3], ids[1], false, now);
        assert_eq!(names(&c, &ids), vec![3, 1, 2, 0]);
    }

    #[test]
    fn reorder_rejects_invalid() {
        let mut c = IconCollection::new();
        let a = c.push(app(1));
        let trash = c.push(Icon::new(IconKind::Trash));
        let now = Instant::now();
        assert!(!c.reorder_before(a, a, false, now));
        assert!(!c.reorder_before(a, trash, false, now));
        assert!(!c.reorder_before(a, IconId(999), false, now));
        let loose = c.insert(app(0));
        assert!(!c.reorder_after(loose, a));
    }

    #[test]
    fn animated_reorder_saves_moved_centers() {
        let mut c = IconCollection::new();
        let ids: Vec<IconId> = (0..3).map(|i| c.push(app(i))).collect();
        let now = Instant::now();
        c.reorder_before(ids[2], ids[0], true, now);
        for id in &ids {
            assert_eq!(
                c.get(*id).unwrap().quirks().flipped_at(Quirk::CenterSaved, 0),
                Some(now)
            );
        }
        let later = now + MS_500;
        c.reorder_before(ids[1], ids[0], true, later);
        // [2, 0, 1] -> [2, 1, 0]: icon 2 kept its slot.
        assert_eq!(
            c.get(ids[2]).unwrap().quirks().flipped_at(Quirk::CenterSaved, 0),
            Some(now)
        );
        assert_eq!(
            c.get(ids[1]).unwrap().quirks().flipped_at(Quirk::CenterSaved, 0),
            Some(later)
        );
    }

    #[test]
    fn closest_prefers_previous() {
        let mut c = IconCollection::new();
        let home = c.push(Icon::new(IconKind::Home));
        let a = c.push(app(1));
        let b = c.push(app(2));
        assert_eq!(c.closest_icon(b), Some((a, true)));
        // `a` is first in its group: the Begin icon before it does not count.
        assert_eq!(c.closest_icon(a), Some((b, false)));
        assert_eq!(c.closest_icon(home), None);
    }

    #[test]
    fn set_position_moves_between_groups() {
        let mut c = IconCollection::new();
        let a = c.push(app(1));
        let b = c.push(app(2));
        assert!(c.set_position(a, IconPosition::End));
        assert_eq!(c.main_ids(), &[b]);
        assert_eq!(c.shelf_ids(), &[a]);
        assert!(!c.set_position(a, IconPosition::End));
    }

    #[test]
    fn selection_wraps_and_skips_hidden() {
        let mut c = IconCollection::new();
        let a = c.push(app(1));
        let hidden = c.push(Icon::new(IconKind::Application).with_priority(2));
        let b = c.push(app(3));
        assert_eq!(c.selected(), Some(a));
        assert!(c.select_next());
        assert_eq!(c.selected(), Some(b));
        assert!(c.select_next());
        assert_eq!(c.selected(), Some(a));
        assert!(c.select_previous());
        assert_eq!(c.selected(), Some(b));
        assert!(c.take_events().contains(&ModelEvent::SelectionChanged(2)));
        assert_ne!(c.selected(), Some(hidden));
    }

    #[test]
    fn sticky_emits_position_events() {
        let mut c = IconCollection::new();
        let a = c.push(app(1));
        c.take_events();
        assert!(c.set_sticky(a, true));
        assert!(!c.set_sticky(a, true));
        assert!(c.set_sticky(a, false));
        assert_eq!(
            c.take_events(),
            vec![ModelEvent::PositionSaved(a), ModelEvent::PositionForgot(a)]
        );
    }

    #[test]
    fn siblings_by_kind() {
        let mut c = IconCollection::new();
        let a = c.push(app(1));
        let trash = c.push(Icon::new(IconKind::Trash));
        assert!(!c.icon_has_sibling(a));
        let b = c.push(app(2));
        assert!(c.icon_has_sibling(a));
        assert!(c.icon_has_sibling(b));
        assert!(!c.icon_has_sibling(trash));
        assert_eq!(c.find_kind(IconKind::Trash), Some(trash));
    }

    #[test]
    fn monitor_count_resizes_icons() {
        let mut c = IconCollection::new();
        let a = c.push(app(1));
        c.set_monitor_count(3);
        assert_eq!(c.get(a).unwrap().quirks().monitor_count(), 3);
        let b = c.push(app(2));
        assert_eq!(c.get(b).unwrap().quirks().monitor_count(), 3);
    }
}

use crate::dispatch::DispatchQueue;
use crate::error::{PlayerError, PlaylistError};
use crate::events::{
    ErrorListener, Property, PropertyChange, PropertyListener, TableEvent, TableListener, Value,
};
use crate::model::{PersistedState, PlaybackState, Track};
use crate::notify::{Delivery, Notifier, should_fire};
use crate::table::{Cell, Column, ColumnHeaders, ColumnKind, TableModel};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug, Default)]
pub struct PlayerEvents {
    pub properties: Notifier<dyn PropertyListener>,
    pub table: Notifier<dyn TableListener>,
    pub errors: Notifier<dyn ErrorListener>,
}

impl PlayerEvents {
    pub fn immediate() -> Self {
        Self::default()
    }

    pub fn dispatched(queue: DispatchQueue) -> Self {
        Self {
            properties: Notifier::with_delivery(Delivery::DispatchThread(queue.clone())),
            table: Notifier::with_delivery(Delivery::DispatchThread(queue.clone())),
            errors: Notifier::with_delivery(Delivery::DispatchThread(queue)),
        }
    }
}

#[derive(Debug)]
pub struct Player {
    playlist: Vec<Track>,
    current: Option<usize>,
    state: PlaybackState,
    looping: bool,
    playlist_looping: bool,
    rng: SmallRng,
    events: PlayerEvents,
    headers: Arc<ColumnHeaders>,
}

impl Player {
    pub fn new(events: PlayerEvents, headers: Arc<ColumnHeaders>) -> Self {
        Self {
            playlist: Vec::new(),
            current: None,
            state: PlaybackState::Stopped,
            looping: false,
            playlist_looping: false,
            rng: SmallRng::from_os_rng(),
            events,
            headers,
        }
    }

    /// Restores a saved session without firing anything.
    pub fn from_persisted(
        state: PersistedState,
        events: PlayerEvents,
        headers: Arc<ColumnHeaders>,
    ) -> Self {
        let mut player = Self::new(events, headers);
        player.current = match (state.tracks.len(), state.current_index) {
            (0, _) => None,
            (len, Some(idx)) => Some(idx.min(len - 1)),
            (_, None) => Some(0),
        };
        player.playlist = state.tracks;
        player.looping = state.looping;
        player.playlist_looping = state.playlist_looping;
        player
    }

    /// The playlist part of the session; locale and port are owned elsewhere.
    pub fn persisted_state(&self) -> PersistedState {
        PersistedState {
            tracks: self.playlist.clone(),
            current_index: self.current,
            looping: self.looping,
            playlist_looping: self.playlist_looping,
            ..PersistedState::default()
        }
    }

    pub fn events(&self) -> &PlayerEvents {
        &self.events
    }

    pub fn headers(&self) -> &Arc<ColumnHeaders> {
        &self.headers
    }

    pub fn tracks(&self) -> &[Track] {
        &self.playlist
    }

    pub fn len(&self) -> usize {
        self.playlist.len()
    }

    pub fn is_empty(&self) -> bool {
        self.playlist.is_empty()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.playlist.get(self.current?)
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    pub fn is_paused(&self) -> bool {
        self.state == PlaybackState::Paused
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn is_playlist_looping(&self) -> bool {
        self.playlist_looping
    }

    pub fn add(&mut self, track: Track) -> bool {
        self.splice_in(self.playlist.len(), vec![track])
    }

    pub fn insert(&mut self, index: usize, track: Track) -> bool {
        self.splice_in(index, vec![track])
    }

    pub fn add_all(&mut self, tracks: impl IntoIterator<Item = Track>) -> bool {
        self.splice_in(self.playlist.len(), tracks.into_iter().collect())
    }

    pub fn insert_all(&mut self, index: usize, tracks: impl IntoIterator<Item = Track>) -> bool {
        self.splice_in(index, tracks.into_iter().collect())
    }

    pub fn remove(&mut self, index: usize) -> bool {
        self.remove_indices(&[index])
    }

    /// Out-of-range and repeated indices are ignored.
    pub fn remove_indices(&mut self, indices: &[usize]) -> bool {
        let mut doomed = vec![false; self.playlist.len()];
        for &idx in indices {
            if let Some(slot) = doomed.get_mut(idx) {
                *slot = true;
            }
        }
        self.remove_marked(doomed)
    }

    pub fn remove_track(&mut self, track: &Track) -> bool {
        match self.playlist.iter().position(|t| t == track) {
            Some(idx) => self.remove(idx),
            None => false,
        }
    }

    pub fn remove_tracks(&mut self, tracks: &[Track]) -> bool {
        let doomed = self.playlist.iter().map(|t| tracks.contains(t)).collect();
        self.remove_marked(doomed)
    }

    /// Empties the playlist and drops every property listener.
    ///
    /// Whoever attached property listeners for playback has to attach them
    /// again afterwards. Table and error listeners are kept.
    pub fn clear(&mut self) -> bool {
        let changed = !self.playlist.is_empty();
        if changed {
            self.stop_playing();
            let old_len = self.playlist.len();
            let old_cursor = self.current;
            self.playlist.clear();
            self.current = None;
            self.fire_size(old_len);
            self.fire_cursor(old_cursor);
            self.fire_contents();
        }
        self.events.properties.clear();
        debug!(changed, "playlist cleared");
        changed
    }

    pub fn move_row(&mut self, index: usize, to: usize) -> Result<bool, PlaylistError> {
        self.move_rows(index, index, to)
    }

    /// Moves rows `start..=end` so the first of them ends up at `to`.
    pub fn move_rows(
        &mut self,
        start: usize,
        end: usize,
        to: usize,
    ) -> Result<bool, PlaylistError> {
        let len = self.playlist.len();
        if start > end {
            return Err(PlaylistError::InvertedRange { start, end });
        }
        let block = end - start + 1;
        if end >= len || to.checked_add(block).is_none_or(|stop| stop > len) {
            return Err(PlaylistError::OutOfRange { start, end, to, len });
        }
        if to == start {
            return Ok(false);
        }

        let mut order: Vec<usize> = (0..len).collect();
        if to < start {
            order[to..=end].rotate_right(block);
        } else {
            order[start..to + block].rotate_left(block);
        }
        self.apply_order(order);
        Ok(true)
    }

    pub fn shuffle_playlist(&mut self) -> bool {
        let mut rng = self.rng.clone();
        let changed = self.shuffle_playlist_with(&mut rng);
        self.rng = rng;
        changed
    }

    /// Reports a change for any playlist longer than one entry, even when
    /// the permutation happens to be the identity.
    pub fn shuffle_playlist_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        if self.playlist.len() <= 1 {
            return false;
        }
        let mut order: Vec<usize> = (0..self.playlist.len()).collect();
        order.shuffle(rng);
        self.apply_order(order);
        true
    }

    pub fn sort_playlist(&mut self) -> bool {
        self.sort_playlist_by(Track::cmp)
    }

    /// Stable. Reports a change for any playlist longer than one entry.
    pub fn sort_playlist_by<F>(&mut self, mut compare: F) -> bool
    where
        F: FnMut(&Track, &Track) -> Ordering,
    {
        if self.playlist.len() <= 1 {
            return false;
        }
        let mut order: Vec<usize> = (0..self.playlist.len()).collect();
        order.sort_by(|a, b| compare(&self.playlist[*a], &self.playlist[*b]));
        self.apply_order(order);
        true
    }

    pub fn set_looping(&mut self, looping: bool) -> bool {
        let old = std::mem::replace(&mut self.looping, looping);
        self.fire_flag(Property::Looping, old, looping)
    }

    pub fn set_playlist_looping(&mut self, looping: bool) -> bool {
        let old = std::mem::replace(&mut self.playlist_looping, looping);
        self.fire_flag(Property::PlaylistLooping, old, looping)
    }

    pub fn start_playing(&mut self) -> bool {
        if self.playlist.is_empty() || self.state == PlaybackState::Playing {
            return false;
        }
        self.transition(Property::Started, PlaybackState::Playing)
    }

    pub fn pause_playing(&mut self) -> bool {
        if self.state != PlaybackState::Playing {
            return false;
        }
        self.transition(Property::Paused, PlaybackState::Paused)
    }

    pub fn stop_playing(&mut self) -> bool {
        if self.state == PlaybackState::Stopped {
            return false;
        }
        self.transition(Property::Stopped, PlaybackState::Stopped)
    }

    pub fn move_to_previous_song(&mut self) -> bool {
        let Some(current) = self.current else {
            return false;
        };
        let target = match current.checked_sub(1) {
            Some(prev) => prev,
            None if self.playlist_looping => self.playlist.len() - 1,
            None => return false,
        };
        self.move_cursor(target)
    }

    /// Without `force` this is the end-of-song advance: a looping track
    /// stays current (and `true` asks for a replay), and the last track
    /// only wraps when the playlist loops. With `force` the cursor always
    /// advances and wraps.
    pub fn move_to_next_song(&mut self, force: bool) -> bool {
        let Some(current) = self.current else {
            return false;
        };
        if !force && self.looping {
            return true;
        }
        let next = current + 1;
        let target = if next < self.playlist.len() {
            next
        } else if force || self.playlist_looping {
            0
        } else {
            return false;
        };
        if target == current {
            return true;
        }
        self.move_cursor(target)
    }

    pub fn move_to_song(&mut self, index: usize) -> bool {
        if index >= self.playlist.len() || self.current == Some(index) {
            return false;
        }
        self.move_cursor(index)
    }

    pub fn report_error(&self, error: PlayerError) {
        warn!("player error: {error}");
        self.events
            .errors
            .fire(move |listener| listener.error_occurred(&error));
    }

    fn splice_in(&mut self, index: usize, tracks: Vec<Track>) -> bool {
        if tracks.is_empty() || index > self.playlist.len() {
            return false;
        }
        let old_len = self.playlist.len();
        let old_cursor = self.current;
        let count = tracks.len();
        self.playlist.splice(index..index, tracks);
        self.current = match old_cursor {
            None => Some(0),
            Some(cursor) if index <= cursor => Some(cursor + count),
            keep => keep,
        };

        debug!(index, count, "tracks inserted");
        self.fire_size(old_len);
        self.fire_cursor(old_cursor);
        self.fire_contents();
        true
    }

    fn remove_marked(&mut self, doomed: Vec<bool>) -> bool {
        let removed = doomed.iter().filter(|d| **d).count();
        if removed == 0 {
            return false;
        }

        let old_len = self.playlist.len();
        let old_cursor = self.current;
        if let Some(cursor) = old_cursor
            && doomed[cursor]
        {
            self.stop_playing();
        }

        let mut kept = Vec::with_capacity(old_len - removed);
        for (track, gone) in self.playlist.drain(..).zip(&doomed) {
            if !gone {
                kept.push(track);
            }
        }
        self.playlist = kept;
        self.current = old_cursor.and_then(|cursor| {
            let survivors_before = doomed[..cursor].iter().filter(|d| !**d).count();
            (!self.playlist.is_empty()).then(|| survivors_before.min(self.playlist.len() - 1))
        });

        debug!(removed, "tracks removed");
        self.fire_size(old_len);
        self.fire_cursor(old_cursor);
        self.fire_contents();
        true
    }

    /// Rearranges the playlist so that slot `i` holds the old entry
    /// `order[i]`. The cursor stays on its track.
    fn apply_order(&mut self, order: Vec<usize>) {
        let old_cursor = self.current;
        let mut slots: Vec<Option<Track>> = self.playlist.drain(..).map(Some).collect();
        self.playlist = order
            .iter()
            .filter_map(|&from| slots.get_mut(from).and_then(Option::take))
            .collect();
        self.current = old_cursor.and_then(|cursor| order.iter().position(|&from| from == cursor));

        self.fire_cursor(old_cursor);
        self.fire_contents();
    }

    fn move_cursor(&mut self, target: usize) -> bool {
        let old = self.current.replace(target);
        debug!(from = ?old, to = target, "cursor moved");
        self.fire_cursor(old);
        true
    }

    fn transition(&mut self, property: Property, to: PlaybackState) -> bool {
        let from = std::mem::replace(&mut self.state, to);
        debug!(?from, ?to, "playback state changed");
        self.fire_property(PropertyChange::new(property, Value::State(from), Value::State(to)));
        let row = self.current;
        self.fire_table(TableEvent::cursor_rows(row, row));
        true
    }

    fn fire_flag(&self, property: Property, old: bool, new: bool) -> bool {
        if old == new {
            return false;
        }
        self.fire_property(PropertyChange::new(property, Value::Bool(old), Value::Bool(new)));
        self.fire_table(TableEvent::DataChanged);
        true
    }

    fn fire_size(&self, old_len: usize) {
        let new_len = self.playlist.len();
        self.fire_property(PropertyChange::new(
            Property::PlaylistSize,
            Value::Count(old_len),
            Value::Count(new_len),
        ));
    }

    fn fire_cursor(&self, old: Option<usize>) {
        let new = self.current;
        if self.fire_property(PropertyChange::new(
            Property::CurrentIndex,
            Value::Cursor(old),
            Value::Cursor(new),
        )) {
            self.fire_table(TableEvent::cursor_rows(old, new));
        }
    }

    fn fire_contents(&self) {
        self.fire_property(PropertyChange::unknown(Property::Contents));
        self.fire_table(TableEvent::DataChanged);
    }

    fn fire_property(&self, change: PropertyChange) -> bool {
        if !should_fire(change.old.as_ref(), change.new.as_ref()) {
            return false;
        }
        self.events
            .properties
            .fire(move |listener| listener.property_changed(&change));
        true
    }

    fn fire_table(&self, event: TableEvent) {
        self.events
            .table
            .fire(move |listener| listener.table_changed(&event));
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new(PlayerEvents::immediate(), Arc::new(ColumnHeaders::default()))
    }
}

impl TableModel for Player {
    fn row_count(&self) -> usize {
        self.playlist.len()
    }

    fn column_count(&self) -> usize {
        Column::ALL.len()
    }

    fn column_name(&self, col: usize) -> Option<String> {
        Column::from_index(col).map(|column| self.headers.name(column))
    }

    fn column_kind(&self, col: usize) -> Option<ColumnKind> {
        Column::from_index(col).map(Column::kind)
    }

    fn value_at(&self, row: usize, col: usize) -> Option<Cell> {
        let track = self.playlist.get(row)?;
        Some(match Column::from_index(col)? {
            Column::Current => Cell::Flag(self.current == Some(row)),
            Column::Index => Cell::Integer(row + 1),
            Column::Title => Cell::Text(track.title()),
            Column::Path => Cell::Text(track.to_string()),
        })
    }
}

// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Playback coordination and progress persistence.
//!
//! The [`Coordinator`] owns one [`PlayerSession`] per record on the visible
//! page and enforces the single-active-player invariant: at most one session
//! is playing at any instant, maintained purely by the pause-before-play
//! ordering in [`Coordinator::toggle`]. UI code never touches the active
//! session directly; everything goes through the toggle/progress/seek/
//! completion operations here.
//!
//! # Lazy attachment
//!
//! A session's audio source is handed to the engine only on the first play
//! or seek of that session, so rendering a page of cards never loads audio
//! bytes. Because the engine holds one media item at a time, `attached` also
//! means "the engine currently holds this session's media"; attaching one
//! session detaches the others.
//!
//! # Checkpointing
//!
//! Progress is persisted to the store under the session's source key at most
//! once per [`CHECKPOINT_INTERVAL`] of media time, plus immediately on pause,
//! seek, metadata load, and completion. A failed write is dropped (the store
//! logs it); the next checkpoint covers for it.

use anyhow::Result;

use crate::{
    catalog::Record,
    player::AudioPlayer,
    store::{PlaybackStatus, Store},
    util::format::format_time,
};

/// Minimum media-time distance between two throttled checkpoints, seconds.
const CHECKPOINT_INTERVAL: f64 = 5.0;

/// Runtime binding between one record and its player widget.
///
/// Sessions are rebuilt whenever the visible page changes; persistent state
/// lives in the store, keyed by `record.source`.
pub(crate) struct PlayerSession {
    pub(crate) record: Record,
    /// Whether the engine currently holds this session's media.
    pub(crate) attached: bool,
    pub(crate) playing: bool,
    /// Position shown on the card, updated on every progress tick.
    pub(crate) current_time: f64,
    /// Duration as last reported by the engine, 0 until metadata loads.
    pub(crate) duration: f64,
    /// Last persisted status, also used for the card's status line.
    pub(crate) status: Option<PlaybackStatus>,
    /// Saved position to seek to once the duration is known.
    resume_from: Option<f64>,
    /// Seek fraction armed before the duration was known.
    pending_seek: Option<f64>,
    /// Media time of the last checkpoint, for throttling.
    last_checkpoint: Option<f64>,
}

impl PlayerSession {
    fn new(record: Record, status: Option<PlaybackStatus>) -> Self {
        Self {
            record,
            attached: false,
            playing: false,
            current_time: 0.0,
            duration: 0.0,
            status,
            resume_from: None,
            pending_seek: None,
            last_checkpoint: None,
        }
    }

    /// Progress-bar ratio in `[0, 1]`; 0 whenever the duration is unusable.
    pub(crate) fn progress_ratio(&self) -> f64 {
        if self.duration.is_finite() && self.duration > 0.0 {
            (self.current_time / self.duration).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// Governs every session's interaction with the engine and the store.
pub(crate) struct Coordinator {
    player: AudioPlayer,
    store: Store,
    sessions: Vec<PlayerSession>,
    /// Index of the one currently playing session, if any.
    active: Option<usize>,
}

impl Coordinator {
    pub(crate) fn new(player: AudioPlayer, store: Store) -> Self {
        Self {
            player,
            store,
            sessions: vec![],
            active: None,
        }
    }

    pub(crate) fn sessions(&self) -> &[PlayerSession] {
        &self.sessions
    }

    pub(crate) fn store(&self) -> &Store {
        &self.store
    }

    /// Rebuilds the sessions for a new page of records.
    ///
    /// Any in-flight playback is checkpointed and stopped first, since its
    /// widget is about to disappear. Stored statuses are loaded eagerly so
    /// the cards can show their status lines without touching the store on
    /// every render.
    pub(crate) fn set_page(&mut self, records: Vec<Record>) -> Result<()> {
        if let Some(index) = self.active.take() {
            self.sessions[index].playing = false;
            self.checkpoint(index, false);
        }
        if self.sessions.iter().any(|s| s.attached) {
            self.player.stop()?;
        }

        self.sessions = records
            .into_iter()
            .map(|record| {
                let status = self.store.playback_status(&record.source);
                PlayerSession::new(record, status)
            })
            .collect();

        Ok(())
    }

    /// Toggles playback of one session.
    ///
    /// Pausing the active session clears `active` and checkpoints it. In
    /// every other case the previously active session (if any) is paused and
    /// checkpointed first, then this session is started, attaching its
    /// source on first use.
    pub(crate) fn toggle(&mut self, index: usize) -> Result<()> {
        if index >= self.sessions.len() {
            return Ok(());
        }

        if self.active == Some(index) && self.sessions[index].playing {
            self.active = None;
            self.pause_session(index)?;
            return Ok(());
        }

        if let Some(prev) = self.active.take() {
            if prev != index {
                self.pause_session(prev)?;
            }
        }

        if self.sessions[index].attached {
            self.player.play()?;
        } else {
            self.attach(index, false)?;
        }

        self.sessions[index].playing = true;
        self.active = Some(index);

        Ok(())
    }

    /// Handles a progress tick for the active session.
    ///
    /// Updates the displayed position and checkpoints at most once per
    /// [`CHECKPOINT_INTERVAL`] of media time.
    pub(crate) fn on_progress(&mut self, current: f64) {
        let Some(index) = self.active else { return };

        self.sessions[index].current_time = current;

        let due = match self.sessions[index].last_checkpoint {
            None => true,
            Some(last) => (current - last).abs() >= CHECKPOINT_INTERVAL,
        };
        if due {
            self.checkpoint(index, false);
        }
    }

    /// Handles a metadata (duration) load for the attached session.
    ///
    /// On the first metadata load this resolves any pending seek fraction,
    /// or resumes from the saved position; both need a known duration. The
    /// current progress is persisted either way.
    pub(crate) fn on_metadata(&mut self, duration: f64) -> Result<()> {
        let Some(index) = self.attached_session() else {
            return Ok(());
        };

        let first_load = self.sessions[index].duration <= 0.0;
        if duration.is_finite() && duration > 0.0 {
            self.sessions[index].duration = duration;
        }

        if first_load && self.sessions[index].duration > 0.0 {
            let session = &mut self.sessions[index];
            let target = if let Some(fraction) = session.pending_seek.take() {
                session.resume_from = None;
                Some(fraction * session.duration)
            } else {
                session.resume_from.take()
            };

            if let Some(target) = target {
                let target = target.min(self.sessions[index].duration);
                self.sessions[index].current_time = target;
                self.player.seek_to(target)?;
            }
        }

        self.checkpoint(index, false);
        Ok(())
    }

    /// Persists progress when the engine reports a pause.
    ///
    /// Pauses initiated through [`toggle`](Self::toggle) have already been
    /// checkpointed by the time the engine echoes the state change; this
    /// covers pauses originating in the engine itself.
    pub(crate) fn on_pause(&mut self) {
        if let Some(index) = self.active {
            self.checkpoint(index, false);
        }
    }

    /// Handles a completed playthrough of the active session.
    ///
    /// Increments the play count exactly once, marks the status completed
    /// permanently, persists immediately, and resets the play affordance.
    pub(crate) fn on_completed(&mut self) {
        let Some(index) = self.active.take() else { return };

        let session = &mut self.sessions[index];
        session.playing = false;
        // The engine goes idle after EOF; a replay has to reload the source.
        session.attached = false;
        if session.duration > 0.0 {
            session.current_time = session.duration;
        }
        self.checkpoint(index, true);
    }

    /// Resets coordinator state after the engine failed to play a source.
    ///
    /// The failed session is detached so a retry reloads it from scratch;
    /// no other session is affected.
    pub(crate) fn on_playback_failed(&mut self) {
        if let Some(index) = self.active.take() {
            let session = &mut self.sessions[index];
            session.playing = false;
            session.attached = false;
        }
    }

    /// Seeks one session to a fraction of its duration.
    ///
    /// Seeking a never-played session attaches its source first (paused); if
    /// the duration is not yet known the fraction is armed and resolved on
    /// the first metadata load. Seeks persist immediately, they are too
    /// infrequent to need throttling.
    pub(crate) fn seek_to_fraction(&mut self, index: usize, fraction: f64) -> Result<()> {
        if index >= self.sessions.len() {
            return Ok(());
        }
        let fraction = fraction.clamp(0.0, 1.0);

        if !self.sessions[index].attached {
            // Attaching evicts whatever the engine holds, so a playing
            // session has to be paused and checkpointed first.
            if let Some(prev) = self.active.take() {
                if prev != index {
                    self.pause_session(prev)?;
                }
            }
            self.attach(index, true)?;
            self.sessions[index].resume_from = None;
        }

        let session = &mut self.sessions[index];
        if session.duration.is_finite() && session.duration > 0.0 {
            let target = fraction * session.duration;
            session.current_time = target;
            self.player.seek_to(target)?;
            self.checkpoint(index, false);
        } else {
            session.pending_seek = Some(fraction);
        }

        Ok(())
    }

    /// Pauses a session and checkpoints it.
    fn pause_session(&mut self, index: usize) -> Result<()> {
        self.player.pause()?;
        self.sessions[index].playing = false;
        self.checkpoint(index, false);
        Ok(())
    }

    /// Hands a session's source to the engine, detaching the others.
    ///
    /// Arms `resume_from` with the position reached earlier in this run, or
    /// failing that the persisted position; the actual seek is deferred to
    /// the metadata load because it needs the duration.
    fn attach(&mut self, index: usize, paused: bool) -> Result<()> {
        for (i, session) in self.sessions.iter_mut().enumerate() {
            if i != index {
                session.attached = false;
            }
        }

        let source = self.sessions[index].record.source.clone();
        self.player.load(&source, paused)?;

        let session = &mut self.sessions[index];
        session.attached = true;
        // Never resume at (or past) the end, that would replay nothing; a
        // finished session starts over instead.
        session.resume_from = if session.current_time > 0.0
            && (session.duration <= 0.0 || session.current_time < session.duration)
        {
            Some(session.current_time)
        } else {
            session
                .status
                .as_ref()
                .filter(|s| s.current_time > 0.0
                    && (s.duration <= 0.0 || s.current_time < s.duration))
                .map(|s| s.current_time)
        };
        // The load replaces whatever the engine held; a duration kept from an
        // earlier attachment is stale and must not count as loaded metadata.
        session.duration = 0.0;

        Ok(())
    }

    /// Persists one session's progress under its source key.
    ///
    /// `completed` additionally increments the play count and latches the
    /// completed flag, which never reverts on later partial plays.
    fn checkpoint(&mut self, index: usize, completed: bool) {
        let session = &mut self.sessions[index];

        let mut status = session.status.clone().unwrap_or_default();
        status.current_time = if session.duration > 0.0 {
            session.current_time.min(session.duration)
        } else {
            session.current_time
        };
        // Keep the stored duration while the engine has not reported one,
        // e.g. between a reload and its metadata event.
        if session.duration > 0.0 {
            status.duration = session.duration;
        }
        if completed {
            status.play_count += 1;
            status.completed = true;
        }

        self.store.save_playback_status(&session.record.source, &status);
        session.status = Some(status);
        session.last_checkpoint = Some(session.current_time);
    }

    fn attached_session(&self) -> Option<usize> {
        self.active
            .or_else(|| self.sessions.iter().position(|s| s.attached))
    }
}

/// Renders a persisted status as the card's one-line summary.
pub(crate) fn describe_status(status: &PlaybackStatus) -> String {
    if status.completed {
        format!(
            "Completed {} times, last at {}",
            status.play_count,
            format_time(status.current_time)
        )
    } else {
        let percent = if status.duration > 0.0 {
            ((status.current_time / status.duration) * 100.0).round() as u32
        } else {
            0
        };
        format!(
            "Last at {}, {}% played",
            format_time(status.current_time),
            percent
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::commands::AudioPlayerCommand;
    use std::sync::mpsc::Receiver;

    fn record(source: &str) -> Record {
        Record {
            source: source.to_string(),
            grade: "1".to_string(),
            term: "1".to_string(),
            lesson_number: "1".to_string(),
            title: source.to_string(),
        }
    }

    fn coordinator(sources: &[&str]) -> (Coordinator, Receiver<AudioPlayerCommand>) {
        let (player, command_rx) = AudioPlayer::disconnected();
        let store = Store::in_memory().unwrap();
        let mut coordinator = Coordinator::new(player, store);
        coordinator
            .set_page(sources.iter().map(|s| record(s)).collect())
            .unwrap();
        (coordinator, command_rx)
    }

    fn drain(rx: &Receiver<AudioPlayerCommand>) -> Vec<AudioPlayerCommand> {
        rx.try_iter().collect()
    }

    #[test]
    fn first_toggle_attaches_lazily_and_plays() {
        let (mut c, rx) = coordinator(&["a.ogg", "b.ogg"]);

        c.toggle(0).unwrap();

        assert_eq!(
            drain(&rx),
            vec![AudioPlayerCommand::Load {
                source: "a.ogg".to_string(),
                paused: false
            }]
        );
        assert_eq!(c.active, Some(0));
        assert!(c.sessions()[0].attached);
        assert!(c.sessions()[0].playing);
        assert!(!c.sessions()[1].attached);
    }

    #[test]
    fn toggling_active_session_pauses_and_checkpoints() {
        let (mut c, rx) = coordinator(&["a.ogg"]);
        c.toggle(0).unwrap();
        c.on_metadata(100.0).unwrap();
        c.on_progress(30.0);
        drain(&rx);

        c.toggle(0).unwrap();

        assert_eq!(drain(&rx), vec![AudioPlayerCommand::Pause]);
        assert_eq!(c.active, None);
        assert!(!c.sessions()[0].playing);
        // Still attached: the engine keeps the media while paused.
        assert!(c.sessions()[0].attached);

        let status = c.store().playback_status("a.ogg").unwrap();
        assert_eq!(status.current_time, 30.0);
        assert_eq!(status.duration, 100.0);
    }

    #[test]
    fn toggling_other_session_pauses_first_then_plays() {
        let (mut c, rx) = coordinator(&["a.ogg", "b.ogg"]);
        c.toggle(0).unwrap();
        c.on_metadata(100.0).unwrap();
        c.on_progress(12.0);
        drain(&rx);

        c.toggle(1).unwrap();

        assert_eq!(
            drain(&rx),
            vec![
                AudioPlayerCommand::Pause,
                AudioPlayerCommand::Load {
                    source: "b.ogg".to_string(),
                    paused: false
                }
            ]
        );
        assert_eq!(c.active, Some(1));
        assert!(!c.sessions()[0].playing);
        assert!(!c.sessions()[0].attached);
        assert!(c.sessions()[1].playing);

        // The evicted session's progress was persisted on the way out.
        let status = c.store().playback_status("a.ogg").unwrap();
        assert_eq!(status.current_time, 12.0);
    }

    #[test]
    fn resuming_paused_attached_session_does_not_reload() {
        let (mut c, rx) = coordinator(&["a.ogg"]);
        c.toggle(0).unwrap();
        c.toggle(0).unwrap();
        drain(&rx);

        c.toggle(0).unwrap();

        assert_eq!(drain(&rx), vec![AudioPlayerCommand::Play]);
        assert_eq!(c.active, Some(0));
    }

    #[test]
    fn saved_position_is_resumed_on_first_metadata() {
        let (player, rx) = AudioPlayer::disconnected();
        let store = Store::in_memory().unwrap();
        store.save_playback_status(
            "a.ogg",
            &PlaybackStatus {
                current_time: 42.0,
                duration: 100.0,
                play_count: 0,
                completed: false,
            },
        );
        let mut c = Coordinator::new(player, store);
        c.set_page(vec![record("a.ogg")]).unwrap();

        c.toggle(0).unwrap();
        drain(&rx);

        c.on_metadata(100.0).unwrap();

        assert_eq!(drain(&rx), vec![AudioPlayerCommand::SeekTo(42.0)]);
        assert_eq!(c.sessions()[0].current_time, 42.0);

        // Only the first metadata load resumes.
        c.on_metadata(100.0).unwrap();
        assert!(drain(&rx).is_empty());
    }

    #[test]
    fn reattached_session_resumes_from_its_last_position() {
        let (mut c, rx) = coordinator(&["a.ogg", "b.ogg"]);
        c.toggle(0).unwrap();
        c.on_metadata(100.0).unwrap();
        c.on_progress(12.0);

        // Playing the other card evicts the first one.
        c.toggle(1).unwrap();
        c.on_metadata(80.0).unwrap();
        drain(&rx);

        c.toggle(0).unwrap();
        assert_eq!(
            drain(&rx),
            vec![
                AudioPlayerCommand::Pause,
                AudioPlayerCommand::Load {
                    source: "a.ogg".to_string(),
                    paused: false
                }
            ]
        );

        // The reload counts as a fresh metadata load and resumes.
        c.on_metadata(100.0).unwrap();
        assert_eq!(drain(&rx), vec![AudioPlayerCommand::SeekTo(12.0)]);
        assert_eq!(c.sessions()[0].current_time, 12.0);
    }

    #[test]
    fn seek_on_reattached_session_waits_for_fresh_metadata() {
        let (mut c, rx) = coordinator(&["a.ogg", "b.ogg"]);
        c.toggle(0).unwrap();
        c.on_metadata(100.0).unwrap();
        c.toggle(1).unwrap();
        c.toggle(0).unwrap();
        drain(&rx);

        // The engine has not loaded the file yet; the fraction is armed.
        c.seek_to_fraction(0, 0.5).unwrap();
        assert!(drain(&rx).is_empty());

        c.on_metadata(100.0).unwrap();
        assert_eq!(drain(&rx), vec![AudioPlayerCommand::SeekTo(50.0)]);
    }

    #[test]
    fn progress_checkpoints_at_most_once_per_window() {
        let (mut c, _rx) = coordinator(&["a.ogg"]);
        c.toggle(0).unwrap();
        c.on_metadata(100.0).unwrap();

        // Metadata already checkpointed at 0.0; inside the window.
        c.on_progress(3.0);
        assert_eq!(
            c.store().playback_status("a.ogg").unwrap().current_time,
            0.0
        );

        c.on_progress(5.5);
        assert_eq!(
            c.store().playback_status("a.ogg").unwrap().current_time,
            5.5
        );

        c.on_progress(8.0);
        assert_eq!(
            c.store().playback_status("a.ogg").unwrap().current_time,
            5.5
        );

        c.on_progress(11.0);
        assert_eq!(
            c.store().playback_status("a.ogg").unwrap().current_time,
            11.0
        );
    }

    #[test]
    fn completion_increments_play_count_once_and_latches() {
        let (mut c, _rx) = coordinator(&["a.ogg"]);
        c.toggle(0).unwrap();
        c.on_metadata(100.0).unwrap();
        c.on_progress(100.0);
        c.on_completed();

        let status = c.store().playback_status("a.ogg").unwrap();
        assert_eq!(status.play_count, 1);
        assert!(status.completed);
        assert_eq!(c.active, None);
        assert!(!c.sessions()[0].playing);
        assert_eq!(describe_status(&status), "Completed 1 times, last at 01:40");

        // A later partial play neither bumps the count nor clears the flag.
        c.toggle(0).unwrap();
        c.on_progress(10.0);
        c.toggle(0).unwrap();

        let status = c.store().playback_status("a.ogg").unwrap();
        assert_eq!(status.play_count, 1);
        assert!(status.completed);
    }

    #[test]
    fn seek_on_unattached_session_attaches_paused_then_seeks() {
        let (mut c, rx) = coordinator(&["a.ogg"]);

        c.seek_to_fraction(0, 0.5).unwrap();

        assert_eq!(
            drain(&rx),
            vec![AudioPlayerCommand::Load {
                source: "a.ogg".to_string(),
                paused: true
            }]
        );
        assert!(c.sessions()[0].attached);
        assert!(!c.sessions()[0].playing);

        // Duration arrives; the armed fraction resolves to an absolute seek.
        c.on_metadata(100.0).unwrap();
        assert_eq!(drain(&rx), vec![AudioPlayerCommand::SeekTo(50.0)]);
        assert_eq!(c.sessions()[0].current_time, 50.0);
        assert_eq!(
            c.store().playback_status("a.ogg").unwrap().current_time,
            50.0
        );
    }

    #[test]
    fn seek_with_known_duration_persists_immediately() {
        let (mut c, rx) = coordinator(&["a.ogg"]);
        c.toggle(0).unwrap();
        c.on_metadata(200.0).unwrap();
        drain(&rx);

        c.seek_to_fraction(0, 0.25).unwrap();

        assert_eq!(drain(&rx), vec![AudioPlayerCommand::SeekTo(50.0)]);
        assert_eq!(
            c.store().playback_status("a.ogg").unwrap().current_time,
            50.0
        );
    }

    #[test]
    fn playback_failure_clears_active_and_detaches() {
        let (mut c, rx) = coordinator(&["a.ogg", "b.ogg"]);
        c.toggle(0).unwrap();
        drain(&rx);

        c.on_playback_failed();

        assert_eq!(c.active, None);
        assert!(!c.sessions()[0].playing);
        assert!(!c.sessions()[0].attached);
        // The other session is untouched.
        assert!(!c.sessions()[1].playing);
    }

    #[test]
    fn set_page_checkpoints_and_stops_active_playback() {
        let (mut c, rx) = coordinator(&["a.ogg"]);
        c.toggle(0).unwrap();
        c.on_metadata(100.0).unwrap();
        c.on_progress(20.0);
        drain(&rx);

        c.set_page(vec![record("b.ogg")]).unwrap();

        assert_eq!(drain(&rx), vec![AudioPlayerCommand::Stop]);
        assert_eq!(c.active, None);
        assert_eq!(c.sessions().len(), 1);
        assert_eq!(c.sessions()[0].record.source, "b.ogg");
        assert_eq!(
            c.store().playback_status("a.ogg").unwrap().current_time,
            20.0
        );
    }

    #[test]
    fn checkpoint_clamps_position_to_duration() {
        let (mut c, _rx) = coordinator(&["a.ogg"]);
        c.toggle(0).unwrap();
        c.on_metadata(100.0).unwrap();
        c.on_progress(100.7);

        let status = c.store().playback_status("a.ogg").unwrap();
        assert_eq!(status.current_time, 100.0);
    }

    #[test]
    fn describe_status_percentage_and_zero_duration() {
        let status = PlaybackStatus {
            current_time: 65.0,
            duration: 130.0,
            play_count: 0,
            completed: false,
        };
        assert_eq!(describe_status(&status), "Last at 01:05, 50% played");

        let status = PlaybackStatus {
            current_time: 10.0,
            duration: 0.0,
            play_count: 0,
            completed: false,
        };
        assert_eq!(describe_status(&status), "Last at 00:10, 0% played");
    }

    #[test]
    fn progress_ratio_is_clamped_and_zero_without_duration() {
        let mut session = PlayerSession::new(record("a.ogg"), None);
        assert_eq!(session.progress_ratio(), 0.0);

        session.duration = 100.0;
        session.current_time = 50.0;
        assert_eq!(session.progress_ratio(), 0.5);

        session.current_time = 150.0;
        assert_eq!(session.progress_ratio(), 1.0);
    }
}

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

//! Audio playback control and state management.
//!
//! This module provides the high-level [`AudioPlayer`] interface used by the
//! player coordinator to control playback. It manages a background worker
//! thread that interfaces with the underlying audio library (MPV), ensuring
//! that heavy audio operations do not block the main application thread.

mod commands;
pub(crate) mod coordinator;

use std::sync::mpsc;

use anyhow::Result;

use crate::{actions::events::AppEvent, player::commands::AudioPlayerCommand};

/// Represents the current playback status of the audio engine.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum PlayerState {
    Playing,
    Paused,
    Stopped,
}

/// A handle to the audio playback engine.
///
/// This struct acts as a command proxy; it does not perform audio processing
/// itself but instead sends instructions to a background worker thread.
pub(crate) struct AudioPlayer {
    /// Channel for sending commands to the background worker thread.
    command_tx: mpsc::Sender<AudioPlayerCommand>,
}

impl AudioPlayer {
    /// Spawns the audio worker thread and returns a new player handle.
    ///
    /// # Arguments
    ///
    /// * `event_tx` - A channel to send application-level events (progress
    ///   updates, metadata, errors) back to the main event loop.
    pub(crate) fn new(event_tx: mpsc::Sender<AppEvent>) -> Result<Self> {
        let (command_tx, command_rx) = mpsc::channel::<AudioPlayerCommand>();

        commands::spawn_player_worker(command_rx, event_tx);

        Ok(Self { command_tx })
    }

    /// Returns a handle with no worker attached, plus the receiving end of
    /// its command channel. Lets tests assert on the exact engine commands
    /// the coordinator issues.
    #[cfg(test)]
    pub(crate) fn disconnected() -> (Self, mpsc::Receiver<AudioPlayerCommand>) {
        let (command_tx, command_rx) = mpsc::channel::<AudioPlayerCommand>();
        (Self { command_tx }, command_rx)
    }

    // Maps internal audio backend flags to a simplified [`PlayerState`].
    fn player_state(is_paused: bool, is_idle: bool) -> PlayerState {
        if is_idle {
            PlayerState::Stopped
        } else if is_paused {
            PlayerState::Paused
        } else {
            PlayerState::Playing
        }
    }

    /// Instructs the worker to load a specific audio source, replacing any
    /// currently loaded media.
    ///
    /// # Arguments
    ///
    /// * `source` - The path or URL of the audio source.
    /// * `paused` - When true the media is attached without starting
    ///   playback (used for seek-before-play).
    pub(crate) fn load(&self, source: &str, paused: bool) -> Result<()> {
        self.command_tx.send(AudioPlayerCommand::Load {
            source: source.to_string(),
            paused,
        })?;
        Ok(())
    }

    /// Resumes playback of the currently loaded media.
    pub(crate) fn play(&self) -> Result<()> {
        self.command_tx.send(AudioPlayerCommand::Play)?;
        Ok(())
    }

    /// Pauses playback.
    pub(crate) fn pause(&self) -> Result<()> {
        self.command_tx.send(AudioPlayerCommand::Pause)?;
        Ok(())
    }

    /// Stops playback and unloads the current media.
    pub(crate) fn stop(&self) -> Result<()> {
        self.command_tx.send(AudioPlayerCommand::Stop)?;
        Ok(())
    }

    /// Seeks to an absolute position in seconds.
    pub(crate) fn seek_to(&self, seconds: f64) -> Result<()> {
        self.command_tx.send(AudioPlayerCommand::SeekTo(seconds))?;
        Ok(())
    }
}

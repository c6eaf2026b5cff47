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

//! MPV-backed audio playback engine and event processing.
//!
//! This module provides the core audio playback logic, leveraging `libmpv`
//! for decoding and playback control. It manages a background worker thread
//! that bridges the gap between the application's command-based interface
//! and the low-level MPV property observation system.
//!
//! # Architecture
//!
//! The engine operates using a dual-channel communication pattern:
//! 1. **Command Channel**: Receives [`AudioPlayerCommand`]s from the player
//!    coordinator (load, play, pause, seek).
//! 2. **Event Channel**: Broadcasts [`AppEvent`]s to notify the application
//!    of progress ticks, metadata, pause state, completion, and errors.
//!
//! A playback failure (bad source, codec error) is not fatal: it is reported
//! as [`AppEvent::PlaybackFailed`] so the coordinator can reset and the user
//! sees a notice. Only engine-level failures kill the worker.

use anyhow::{Context, Result};
use mpv::Format;
use std::{
    sync::mpsc::{self, Receiver, Sender},
    thread,
};

use crate::{
    actions::events::AppEvent,
    player::{AudioPlayer, PlayerState},
};

#[derive(Debug, PartialEq)]
pub(crate) enum AudioPlayerCommand {
    Load { source: String, paused: bool },
    Play,
    Pause,
    Stop,
    SeekTo(f64),
}

/// Spawns the audio worker thread to process playback commands.
///
/// If the internal worker returns an error, it is caught here and broadcast
/// as a fatal application event.
///
/// # Arguments
///
/// * `command_rx` - The receiving end of the player command channel.
/// * `event_tx` - The channel used to broadcast playback updates and errors.
pub(crate) fn spawn_player_worker(
    command_rx: Receiver<AudioPlayerCommand>,
    event_tx: Sender<AppEvent>,
) {
    let error_tx = event_tx.clone();

    thread::spawn(move || {
        if let Err(e) = audio_player_worker(command_rx, event_tx) {
            let _ = error_tx.send(AppEvent::FatalError(format!("MPV worker failure: {:?}", e)));
        }
    });
}

/// The primary execution loop for the audio player backend.
///
/// Initializes a local `libmpv` context and alternates between draining
/// pending commands and polling for MPV events.
///
/// # Errors
///
/// Returns an error if the MPV context fails to initialize or if the
/// internal command/event loops encounter an unrecoverable failure.
fn audio_player_worker(
    command_rx: Receiver<AudioPlayerCommand>,
    event_tx: Sender<AppEvent>,
) -> Result<()> {
    let mut handler = (|| {
        let mut builder = mpv::MpvHandlerBuilder::new().context("Failed to create MPV builder")?;
        builder
            .set_option("vo", "null")
            .context("Failed to set no video output")?;
        builder.build().context("Failed to build MPV handler")
    })()?;

    handler
        .observe_property::<f64>("duration", 0)
        .context("Failed to observe duration")?;
    handler
        .observe_property::<bool>("pause", 0)
        .context("Failed to observe pause")?;
    handler
        .observe_property::<f64>("time-pos", 0)
        .context("Failed to observe time-pos")?;
    handler
        .observe_property::<f64>("idle-active", 0)
        .context("Failed to observe idle-active")?;

    let mut is_paused = false;
    let mut is_idle = true;

    let mut player_state = PlayerState::Stopped;

    loop {
        process_commands(&mut handler, &command_rx, &event_tx)?;
        process_mpv_events(
            &mut handler,
            &mut is_paused,
            &mut is_idle,
            &mut player_state,
            &event_tx,
        )?;
    }
}

/// Drains and executes all pending commands from the coordinator channel.
///
/// Per-source failures (an unplayable file, a bad seek target) become
/// [`AppEvent::PlaybackFailed`] notices rather than worker errors.
fn process_commands(
    handler: &mut mpv::MpvHandler,
    command_rx: &mpsc::Receiver<AudioPlayerCommand>,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Result<()> {
    while let Ok(command) = command_rx.try_recv() {
        let outcome = match command {
            AudioPlayerCommand::Load { source, paused } => handler
                .command(&["loadfile", &source, "replace"])
                .and_then(|_| handler.set_property("pause", paused))
                .map_err(|e| format!("Failed to load {}: {}", source, e)),
            AudioPlayerCommand::Play => handler
                .set_property("pause", false)
                .map_err(|e| format!("Failed to resume playback: {}", e)),
            AudioPlayerCommand::Pause => handler
                .set_property("pause", true)
                .map_err(|e| format!("Failed to pause playback: {}", e)),
            AudioPlayerCommand::Stop => handler
                .command(&["stop"])
                .map_err(|e| format!("Failed to stop playback: {}", e)),
            AudioPlayerCommand::SeekTo(seconds) => handler
                .command(&["seek", &seconds.to_string(), "absolute"])
                .map_err(|e| format!("Failed to seek: {}", e)),
        };

        if let Err(notice) = outcome {
            event_tx
                .send(AppEvent::PlaybackFailed(notice))
                .context("Failed to send playback failure event")?;
        }
    }

    Ok(())
}

/// Polls for MPV events and synchronizes the application state.
///
/// This function waits for up to 50ms for an event from the MPV context.
/// If an event occurs, it updates internal flags and broadcasts any necessary
/// [`AppEvent`]s to the UI.
fn process_mpv_events(
    handler: &mut mpv::MpvHandler,
    is_paused: &mut bool,
    is_idle: &mut bool,
    current_state: &mut PlayerState,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Result<()> {
    if let Some(mpv_event) = handler.wait_event(0.05) {
        let app_event = match mpv_event {
            mpv::Event::PropertyChange { name, change, .. } => match (name, change) {
                ("duration", Format::Double(duration)) => {
                    Some(AppEvent::DurationChanged(duration))
                }
                ("pause", Format::Flag(pause)) => {
                    let was_paused = *is_paused;
                    *is_paused = pause;
                    // The coordinator persists progress on the pause edge.
                    (pause && !was_paused).then_some(AppEvent::PlaybackPaused)
                }
                ("time-pos", Format::Double(seconds)) if seconds >= 0.0 => {
                    Some(AppEvent::TimeChanged(seconds))
                }
                ("idle-active", Format::Flag(idle_active)) => {
                    *is_idle = idle_active;
                    None
                }
                _ => None,
            },
            mpv::Event::EndFile(result) => match result {
                Ok(mpv::EndFileReason::MPV_END_FILE_REASON_EOF) => {
                    Some(AppEvent::TrackFinished)
                }
                Ok(_) => None,
                Err(e) => Some(AppEvent::PlaybackFailed(format!(
                    "Playback ended with an error: {}",
                    e
                ))),
            },
            _ => None,
        };

        let new_player_state = AudioPlayer::player_state(*is_paused, *is_idle);

        if new_player_state != *current_state {
            *current_state = new_player_state;
            event_tx
                .send(AppEvent::PlayerStateChanged(new_player_state))
                .context("Failed to send player state event")?;
        }

        if let Some(event) = app_event {
            event_tx.send(event).context("Failed to send event")?;
        }
    }

    Ok(())
}

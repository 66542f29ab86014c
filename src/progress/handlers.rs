// src/progress/handlers.rs

//! Per-engine progress handlers.
//!
//! Each handler reads the captures of one matched line, updates the explicit
//! [`EngineState`] and returns the events to send to the supervisor.

use std::fmt::Display;
use std::str::FromStr;

use tracing::debug;

use crate::errors::ProgressError;
use crate::matcher::{FrameVariant, MatchResult, PassVariant};
use crate::progress::state::EngineState;
use crate::types::{FrameRange, RenderEvent};

/// Katana `Starting frame N` / `Frame N completed`.
pub fn on_frame_progress(
    state: &mut EngineState,
    range: FrameRange,
    variant: FrameVariant,
    current_frame: i64,
    line: &str,
) -> Vec<RenderEvent> {
    let mut events = Vec::new();

    if variant == FrameVariant::Completed {
        let offset = frame_offset(range, current_frame);
        state.record_finished_frames(offset);

        let percent = 100.0 * (offset as f64 + 1.0) / range.frame_count() as f64;
        debug!(
            frame = current_frame,
            range = %range,
            percent,
            "katana frame completed"
        );
        events.push(set_progress(state, percent));
    }

    if let Some(msg) = trailing_text(line) {
        events.push(RenderEvent::SetStatusMessage(msg));
    }

    events
}

/// Offset of `frame` from the range start, clamped to `[-1, frame_count]`.
///
/// The difference is taken in `i128` since the frame can be any `i64`.
fn frame_offset(range: FrameRange, frame: i64) -> i64 {
    let offset = i128::from(frame) - i128::from(range.start());
    let clamped = offset.clamp(-1, i128::from(range.frame_count()));
    i64::try_from(clamped).unwrap_or(if clamped < 0 { -1 } else { range.frame_count() })
}

/// Arnold `[kat] Starting/Finished render pass P of T` and `N% done ...`.
pub fn on_render_pass(
    state: &mut EngineState,
    range: FrameRange,
    variant: PassVariant,
    m: &MatchResult,
) -> Result<Vec<RenderEvent>, ProgressError> {
    let rule = m.kind().name();

    match variant {
        PassVariant::Starting => {
            state.pass_start = capture(m, rule, 1)?;
            state.pass_end = capture(m, rule, 2)?;
            Ok(vec![RenderEvent::SetStatusMessage(format!(
                "Arnold: Starting Render Pass {} of {}",
                state.pass_start, state.pass_end
            ))])
        }
        PassVariant::Percent => {
            let raw_percent = m
                .group(1)
                .ok_or(ProgressError::MissingCapture { rule, group: 1 })?;
            state.pass_percent = capture(m, rule, 1)?;
            state.pass_text = m
                .group(2)
                .ok_or(ProgressError::MissingCapture { rule, group: 2 })?
                .to_string();

            let mut events = vec![RenderEvent::SetStatusMessage(format!(
                "Arnold: Rendering Pass {} of {} : {}{}",
                state.pass_start, state.pass_end, raw_percent, state.pass_text
            ))];

            // Multi-frame tasks are driven by Katana frame progress instead.
            if range.is_single_frame() {
                let percent = state.pass_percent;
                events.push(set_progress(state, percent));
            }
            Ok(events)
        }
        PassVariant::Finished => Ok(vec![RenderEvent::SetStatusMessage(format!(
            "Arnold: Finished Rendering Pass {} of {}",
            state.pass_start, state.pass_end
        ))]),
    }
}

/// Redshift `Block C/T ... rendered`.
pub fn on_block_progress(
    state: &mut EngineState,
    range: FrameRange,
    completed_blocks: u64,
    total_blocks: u64,
) -> Result<Vec<RenderEvent>, ProgressError> {
    if total_blocks == 0 {
        return Err(ProgressError::ZeroBlockTotal {
            completed: completed_blocks,
        });
    }

    let fractional_frames =
        completed_blocks as f64 / total_blocks as f64 + state.finished_frame_count as f64;
    let percent = 100.0 * fractional_frames / range.frame_count() as f64;

    debug!(
        completed_blocks,
        total_blocks,
        finished_frames = state.finished_frame_count,
        percent,
        "redshift block rendered"
    );

    Ok(vec![set_progress(state, percent)])
}

/// Drop the first two whitespace-separated tokens of a Katana line.
///
/// `"Frame 12 completed in 3.2s"` becomes `"completed in 3.2s"`.
pub fn trailing_text(line: &str) -> Option<String> {
    let rest: Vec<&str> = line.split_whitespace().skip(2).collect();
    if rest.is_empty() {
        None
    } else {
        Some(rest.join(" "))
    }
}

fn set_progress(state: &mut EngineState, percent: f64) -> RenderEvent {
    let clamped = clamp_percent(percent);
    if clamped != percent {
        debug!(raw = percent, clamped, "progress outside [0, 100]; clamped");
    }
    state.last_progress_percent = clamped;
    RenderEvent::SetProgress(clamped)
}

/// Clamp to `[0, 100]`; NaN maps to 0.
pub fn clamp_percent(percent: f64) -> f64 {
    if percent.is_nan() {
        0.0
    } else {
        percent.clamp(0.0, 100.0)
    }
}

pub(crate) fn capture<T>(m: &MatchResult, rule: &'static str, group: usize) -> Result<T, ProgressError>
where
    T: FromStr,
    T::Err: Display,
{
    let raw = m
        .group(group)
        .ok_or(ProgressError::MissingCapture { rule, group })?;
    raw.parse().map_err(|e: T::Err| ProgressError::InvalidNumber {
        value: raw.to_string(),
        reason: e.to_string(),
    })
}

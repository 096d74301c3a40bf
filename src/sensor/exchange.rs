// src/sensor/exchange.rs

use crate::channel::SerialChannel;
use crate::common::{
    command::Command,
    error::LoadstarError,
    hal_traits::{Delay, SerialLink},
    timing::SettleTimings,
};
use log::{debug, warn};

/// Sends `command` and returns whatever text the device answered with.
///
/// Best effort: a closed channel or any I/O failure yields an empty string.
/// Only meant for identity queries; streamed frames go through the streaming
/// controller, which reports its failures.
pub fn query<L, D>(
    channel: &mut SerialChannel<L>,
    delay: &mut D,
    timings: &SettleTimings,
    command: &Command,
) -> String
where
    L: SerialLink,
    D: Delay,
{
    if !channel.is_open() {
        warn!("{} query skipped: channel closed", command);
        return String::new();
    }

    match try_query(channel, delay, timings, command) {
        Ok(text) => {
            debug!("<- {:?} for {}", text, command);
            text
        }
        Err(e) => {
            warn!("{} query failed: {}", command, e);
            String::new()
        }
    }
}

fn try_query<L, D>(
    channel: &mut SerialChannel<L>,
    delay: &mut D,
    timings: &SettleTimings,
    command: &Command,
) -> Result<String, LoadstarError<L::Error>>
where
    L: SerialLink,
    D: Delay,
{
    let wire = command.format_into::<L::Error>()?;
    channel.write_and_wait(delay, wire.as_bytes(), timings.write_settle)?;
    delay.delay(timings.response_settle);

    // Leave the last byte: the reply terminator may not have fully arrived.
    let len = channel.bytes_available()?.saturating_sub(1);
    let mut buf = vec![0u8; len];
    channel.read_exact(&mut buf)?;
    channel.clear()?;

    let text = String::from_utf8_lossy(&buf);
    Ok(text
        .trim_end_matches(|c: char| c.is_whitespace() || c.is_control())
        .to_string())
}

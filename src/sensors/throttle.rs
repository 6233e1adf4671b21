// Throttle flags from the firmware diagnostic command (`vcgencmd get_throttled`).

use std::time::Duration;

use tokio::process::Command;

use crate::models::ThrottleStatus;

/// Parse `throttled=0x50005` style output.
pub fn parse_throttled(output: &str) -> Option<ThrottleStatus> {
    let (_, value) = output.trim().split_once('=')?;
    let value = value.trim();
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value);
    let bits = u32::from_str_radix(digits, 16).ok()?;
    Some(ThrottleStatus::from_bits(value, bits))
}

/// Run the command with a hard timeout. Missing binary, non-zero exit, timeout or
/// unparsable output all read as unavailable.
pub(super) async fn query(command: &[String], timeout: Duration) -> Option<ThrottleStatus> {
    let (program, args) = command.split_first()?;
    let mut cmd = Command::new(program);
    cmd.args(args).kill_on_drop(true);
    let output = match tokio::time::timeout(timeout, cmd.output()).await {
        Ok(Ok(out)) => out,
        Ok(Err(e)) => {
            tracing::debug!(error = %e, program = %program, "throttle command unavailable");
            return None;
        }
        Err(_) => {
            tracing::debug!(program = %program, ?timeout, "throttle command timed out");
            return None;
        }
    };
    if !output.status.success() {
        tracing::debug!(program = %program, status = %output.status, "throttle command failed");
        return None;
    }
    parse_throttled(&String::from_utf8_lossy(&output.stdout))
}

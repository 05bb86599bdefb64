//! JSON-lines protocol: one action in, one response out.

use std::io::{BufRead, Write};

use serde::Serialize;

use ledgerdash_events::Event;

use crate::workspace::{Action, Snapshot, Workspace};

/// Reply to a single input line. Errors never end the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Response {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Types of the journal events the action applied.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<&'static str>,
    pub snapshot: Snapshot,
}

impl Workspace {
    /// Parse and dispatch one input line.
    pub fn respond(&mut self, line: &str) -> Response {
        let outcome = serde_json::from_str::<Action>(line)
            .map_err(|e| format!("malformed action: {e}"))
            .and_then(|action| self.dispatch(action).map_err(|e| e.to_string()));

        let (error, events) = match outcome {
            Ok(events) => (None, events.iter().map(Event::event_type).collect()),
            Err(error) => {
                tracing::warn!(%error, "action rejected");
                (Some(error), Vec::new())
            }
        };
        Response {
            ok: error.is_none(),
            error,
            events,
            snapshot: self.snapshot(),
        }
    }
}

/// Drive `workspace` from `input` until EOF, writing one JSON response per
/// non-blank line. Returns the number of lines handled.
pub fn run<R: BufRead, W: Write>(
    workspace: &mut Workspace,
    input: R,
    mut output: W,
) -> anyhow::Result<usize> {
    let mut handled = 0;
    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let response = workspace.respond(&line);
        serde_json::to_writer(&mut output, &response)?;
        output.write_all(b"\n")?;
        output.flush()?;
        handled += 1;
    }
    Ok(handled)
}

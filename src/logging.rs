use std::fmt::Display;

use log::Level::Trace;
use log::{log_enabled, trace};

use crate::cursor::Cursor;
use crate::{util, LABEL, LOG_TARGET};

/// Fixed-width trace lines, one per parser invocation and one per outcome:
///
/// ```text
/// |remaining input|                    label           : name@offset -> outcome
/// ```
pub(crate) trait Loggable {
    const LABEL_WIDTH: usize = 15;
    const INPUT_WIDTH: usize = 35;

    fn log_enter(&self, name: &str, start: usize);
    fn log_success(&self, name: &str, start: usize, token: &str);
    fn log_failure<E: Display>(&self, name: &str, start: usize, error: &E);
}

impl<'a> Cursor<'a> {
    fn trace_line(&self, name: &str, start: usize, outcome: &dyn Display) {
        trace!(
            target: LOG_TARGET,
            "{inp:<iw$} {label:<lw$} : {operation:<lw$}{outcome}",
            iw = <Self as Loggable>::INPUT_WIDTH,
            lw = <Self as Loggable>::LABEL_WIDTH,
            label = LABEL.with(|f| f.get()),
            inp = util::formatter_str(self.remaining()),
            operation = format!("{name}@{start}"),
        );
    }
}

impl<'a> Loggable for Cursor<'a> {
    fn log_enter(&self, name: &str, start: usize) {
        if log_enabled!(target: LOG_TARGET, Trace) {
            self.trace_line(name, start, &"");
        }
    }

    fn log_success(&self, name: &str, start: usize, token: &str) {
        if log_enabled!(target: LOG_TARGET, Trace) {
            self.trace_line(name, start, &format_args!(" -> {token:?}"));
        }
    }

    fn log_failure<E: Display>(&self, name: &str, start: usize, error: &E) {
        if log_enabled!(target: LOG_TARGET, Trace) {
            self.trace_line(name, start, &format_args!(" !! {error}"));
        }
    }
}

//! Pipeline commands.
//!
//! A command is one stage of an inspection pipeline: it consumes a lazy
//! stream of typed values and produces another. The pipeline runtime (REPL,
//! argument parsing, stage wiring) lives elsewhere; this module defines the
//! stage contract and the list-walking commands built on it.

use tracing::debug;

use crate::error::Result;
use crate::target::Target;
use crate::value::Value;
use crate::walk::{ListShape, ListWalk, WalkSpec};

/// A lazy stream of values flowing between pipeline stages.
pub type ValueStream<'t> = Box<dyn Iterator<Item = Result<Value>> + 't>;

/// One pipeline stage.
pub trait Command {
    /// The name errors from this command are tagged with.
    fn name(&self) -> &str;

    /// Apply the command to an input stream.
    ///
    /// Configuration errors (type names, field paths) surface here, before
    /// any input element is consumed. The returned stream is lazy; elements
    /// are produced as the downstream consumer demands them.
    fn apply<'t>(&self, target: &'t Target, input: ValueStream<'t>) -> Result<ValueStream<'t>>;
}

/// Walk each incoming list head and emit the records behind it.
///
/// The record type name and linkage member path are the command's two
/// positional configuration values; the shape picks between the circular
/// (`walk_list`) and null-terminated (`walk_hlist`) variants.
pub struct LinkedListCmd {
    name: &'static str,
    shape: ListShape,
    type_name: String,
    member: String,
    step_limit: Option<usize>,
}

impl LinkedListCmd {
    /// Circular doubly-linked list walker.
    pub fn list(type_name: &str, member: &str) -> Self {
        Self {
            name: "walk_list",
            shape: ListShape::Circular,
            type_name: type_name.to_string(),
            member: member.to_string(),
            step_limit: None,
        }
    }

    /// Hash-bucket chain walker.
    pub fn hlist(type_name: &str, member: &str) -> Self {
        Self {
            name: "walk_hlist",
            shape: ListShape::NullTerminated,
            type_name: type_name.to_string(),
            member: member.to_string(),
            step_limit: None,
        }
    }

    /// Bound each walk to at most `limit` entries.
    pub fn with_step_limit(mut self, limit: usize) -> Self {
        self.step_limit = Some(limit);
        self
    }
}

impl Command for LinkedListCmd {
    fn name(&self) -> &str {
        self.name
    }

    fn apply<'t>(&self, target: &'t Target, input: ValueStream<'t>) -> Result<ValueStream<'t>> {
        let mut spec = WalkSpec::resolve(target, self.shape, &self.type_name, &self.member)
            .map_err(|e| e.for_command(self.name))?;
        spec.step_limit = self.step_limit;

        debug!(command = self.name, entry_type = %spec.entry_type, "command configured");

        Ok(Box::new(WalkStream {
            target,
            command: self.name,
            spec,
            input,
            walk: None,
            failed: false,
        }))
    }
}

/// Concatenation of per-head walks, in input order, with fail-stop
/// semantics: the first traversal error (or upstream error) ends the stream,
/// after everything already produced has been delivered.
struct WalkStream<'t> {
    target: &'t Target,
    command: &'static str,
    spec: WalkSpec,
    input: ValueStream<'t>,
    walk: Option<ListWalk<'t>>,
    failed: bool,
}

impl Iterator for WalkStream<'_> {
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            if let Some(walk) = &mut self.walk {
                match walk.next() {
                    Some(Ok(record)) => return Some(Ok(record)),
                    Some(Err(err)) => {
                        self.failed = true;
                        return Some(Err(err.for_command(self.command)));
                    }
                    None => self.walk = None,
                }
            }
            match self.input.next() {
                Some(Ok(head)) => {
                    self.walk = Some(ListWalk::new(
                        self.target,
                        head.address(),
                        self.spec.clone(),
                    ));
                }
                Some(Err(err)) => {
                    // Upstream failure: forward untouched, keep its own tag.
                    self.failed = true;
                    return Some(Err(err));
                }
                None => return None,
            }
        }
    }
}

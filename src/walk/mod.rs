//! Generic traversal of intrusive linked lists.
//!
//! Kernel-style lists embed their linkage inside the records they link: a
//! two-pointer node (`struct list_head`) for circular doubly-linked lists, a
//! single forward pointer for hash-bucket chains (`struct hlist_head`). The
//! node's address minus the linkage member's offset recovers the owning
//! record.
//!
//! Both shapes share one engine. The cursor starts at the head's first
//! pointer and each step reads the current node's own first pointer; the walk
//! ends when the cursor reaches the shape's sentinel (the head's address for
//! circular lists, null for bucket chains). The same comparison at the head
//! detects an empty list.
//!
//! Walks are lazy and not restartable: re-walking re-reads memory from the
//! head and can observe a different list if the target has changed.

use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::target::Target;
use crate::types::path::{locate_field, FieldPath};
use crate::types::resolve::resolve_aggregate_name;
use crate::value::Value;

/// Structural variant of a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListShape {
    /// Circular doubly-linked list behind a sentinel head (`list_head`).
    Circular,
    /// Singly-linked chain terminated by a null pointer (`hlist_head`).
    NullTerminated,
}

/// A resolved traversal plan: everything a walk needs that does not depend
/// on the particular head.
///
/// Resolution happens once per command invocation, so all type and path
/// errors surface before any memory is read.
#[derive(Debug, Clone)]
pub struct WalkSpec {
    /// Resolved spelling of the record type.
    pub entry_type: String,
    /// Byte offset of the linkage member within the record.
    pub link_offset: u64,
    /// Which termination rule applies.
    pub shape: ListShape,
    /// Optional bound on emitted entries, for torn or corrupted snapshots.
    /// `None` trusts the snapshot, like the kernel macros do.
    pub step_limit: Option<usize>,
}

impl WalkSpec {
    /// Resolve a record type name and linkage member path into a plan.
    pub fn resolve(
        target: &Target,
        shape: ListShape,
        type_name: &str,
        member: &str,
    ) -> Result<WalkSpec> {
        let entry_type = resolve_aggregate_name(target.types(), type_name)?;
        let path = FieldPath::parse(member)?;
        let located = locate_field(target.types(), &entry_type, &path)?;
        debug!(
            entry_type,
            member,
            offset = located.offset,
            ?shape,
            "resolved walk spec"
        );
        Ok(WalkSpec {
            entry_type,
            link_offset: located.offset,
            shape,
            step_limit: None,
        })
    }

    /// Bound the walk to at most `limit` entries.
    pub fn with_step_limit(mut self, limit: usize) -> Self {
        self.step_limit = Some(limit);
        self
    }
}

enum WalkState {
    /// About to read the head's first pointer.
    AtHead,
    /// The node whose entry was just emitted; its next pointer is unread.
    AtNode(u64),
    Done,
}

/// Lazy walk over one list, yielding the owning record of each node.
pub struct ListWalk<'t> {
    target: &'t Target,
    spec: WalkSpec,
    head: u64,
    state: WalkState,
    steps: usize,
}

impl<'t> ListWalk<'t> {
    /// Start a walk at the list head located at `head_address`.
    pub fn new(target: &'t Target, head_address: u64, spec: WalkSpec) -> Self {
        Self {
            target,
            spec,
            head: head_address,
            state: WalkState::AtHead,
            steps: 0,
        }
    }

    fn sentinel(&self) -> u64 {
        match self.spec.shape {
            ListShape::Circular => self.head,
            ListShape::NullTerminated => 0,
        }
    }

    /// Record the node as visited and produce its owning record.
    fn emit(&mut self, node: u64) -> Option<Result<Value>> {
        if let Some(limit) = self.spec.step_limit {
            if self.steps >= limit {
                self.state = WalkState::Done;
                return Some(Err(Error::StepLimit { limit }));
            }
        }
        self.steps += 1;
        self.state = WalkState::AtNode(node);
        let record = node.wrapping_sub(self.spec.link_offset);
        trace!(node = format_args!("{node:#x}"), record = format_args!("{record:#x}"), "walk step");
        Some(Ok(Value::new(self.spec.entry_type.clone(), record)))
    }

    /// Advance the cursor by one pointer read, handling termination.
    fn step(&mut self, from: u64) -> Option<Result<Value>> {
        let next = match self.target.read_ptr(from) {
            Ok(ptr) => ptr,
            Err(err) => {
                self.state = WalkState::Done;
                return Some(Err(err));
            }
        };
        if next == self.sentinel() {
            self.state = WalkState::Done;
            return None;
        }
        self.emit(next)
    }
}

impl Iterator for ListWalk<'_> {
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.state {
            WalkState::Done => None,
            WalkState::AtHead => self.step(self.head),
            WalkState::AtNode(node) => self.step(node),
        }
    }
}

/// Walk a circular doubly-linked list: resolve the record type and linkage
/// member, then yield one record per node behind `head`.
pub fn list_entries<'t>(
    target: &'t Target,
    head: &Value,
    type_name: &str,
    member: &str,
) -> Result<ListWalk<'t>> {
    let spec = WalkSpec::resolve(target, ListShape::Circular, type_name, member)?;
    Ok(ListWalk::new(target, head.address(), spec))
}

/// Walk a null-terminated hash-bucket chain behind `head`.
pub fn hlist_entries<'t>(
    target: &'t Target,
    head: &Value,
    type_name: &str,
    member: &str,
) -> Result<ListWalk<'t>> {
    let spec = WalkSpec::resolve(target, ListShape::NullTerminated, type_name, member)?;
    Ok(ListWalk::new(target, head.address(), spec))
}

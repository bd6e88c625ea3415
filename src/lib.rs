//! corewalk — typed traversal of intrusive kernel data structures.
//!
//! Inspects live or dumped memory through composable pipeline commands. The
//! core is generic traversal of intrusive linked lists: a linkage node
//! embedded at a known offset inside the records it links, with the owning
//! record recovered by subtracting that offset from the node's address.
//!
//! ```no_run
//! use corewalk::mem::{dump::DumpMemory, DataLayout};
//! use corewalk::pipeline::{Command, LinkedListCmd};
//! use corewalk::types::table::TypeTable;
//! use corewalk::{Target, Value};
//!
//! # fn main() -> corewalk::Result<()> {
//! let types = TypeTable::from_json_file("types.json")?;
//! let mem = DumpMemory::open("mem.dump", 0xffff_8880_0000_0000)?;
//! let target = Target::new(Box::new(types), Box::new(mem), DataLayout::LE64);
//!
//! let heads: corewalk::pipeline::ValueStream = Box::new(std::iter::once(Ok(Value::new(
//!     "struct list_head",
//!     0xffff_8880_0123_4560,
//! ))));
//! let walker = LinkedListCmd::list("module", "list");
//! for module in walker.apply(&target, heads)? {
//!     println!("{:#x}", module?.address());
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod logging;
pub mod mem;
pub mod pipeline;
pub mod target;
pub mod types;
pub mod value;
pub mod walk;

pub use error::{Error, Result};
pub use target::Target;
pub use value::Value;

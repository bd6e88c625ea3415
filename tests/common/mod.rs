//! Shared fixtures for integration tests.
//!
//! Builds a small synthetic kernel image: `struct task` records holding a
//! pid, a `tasks` list linkage, and an array of hash linkages, arranged the
//! way the kernel lays out its task list and pid hash buckets.

// Not every test binary uses every fixture.
#![allow(dead_code)]

use corewalk::mem::image::ImageMemory;
use corewalk::mem::{ByteOrder, DataLayout};
use corewalk::types::table::TypeTable;
use corewalk::types::{DataType, Field};
use corewalk::Target;

/// Address of the `tasks` circular list head.
pub const TASKS_HEAD: u64 = 0xffff_0000_1000;
/// Address of a pid hash bucket (single forward pointer).
pub const PID_BUCKET: u64 = 0xffff_0000_1040;
/// Addresses of the task records.
pub const TASKS: [u64; 3] = [0xffff_0000_2000, 0xffff_0000_3000, 0xffff_0000_4000];

/// `struct task` layout used by the fixtures.
pub const PID_OFF: u64 = 0;
pub const TASKS_OFF: u64 = 8;
pub const PID_LINKS_OFF: u64 = 24;
pub const TASK_SIZE: u64 = 64;

/// Index of the hash linkage wired up by the fixture.
pub const PID_LINK_INDEX: u64 = 3;

pub fn kernel_types() -> TypeTable {
    let mut table = TypeTable::with_builtins();
    table.insert(DataType::new_struct(
        "struct list_head",
        16,
        vec![
            Field::new("next", "struct list_head *", 0),
            Field::new("prev", "struct list_head *", 8),
        ],
    ));
    table.insert(DataType::new_pointer(
        "struct list_head *",
        8,
        "struct list_head",
    ));
    table.insert(DataType::new_struct(
        "struct hlist_node",
        8,
        vec![Field::new("next", "struct hlist_node *", 0)],
    ));
    table.insert(DataType::new_pointer(
        "struct hlist_node *",
        8,
        "struct hlist_node",
    ));
    table.insert(DataType::new_array(
        "struct hlist_node [4]",
        "struct hlist_node",
        8,
        4,
    ));
    table.insert(DataType::new_typedef("pid_t", 4, "int"));
    table.insert(DataType::new_struct(
        "struct task",
        TASK_SIZE,
        vec![
            Field::new("pid", "pid_t", PID_OFF),
            Field::new("tasks", "struct list_head", TASKS_OFF),
            Field::new("pid_links", "struct hlist_node [4]", PID_LINKS_OFF),
        ],
    ));
    table.insert(DataType::new_typedef("task_t", TASK_SIZE, "struct task"));
    table
}

/// Image with pids 1,2,3 on the circular `tasks` list and the same records
/// chained behind `PID_BUCKET` through `pid_links[PID_LINK_INDEX]`.
pub fn kernel_image() -> ImageMemory {
    let mut image = ImageMemory::new(0xffff_0000_0000, 0x8000, ByteOrder::Little);

    for (i, &task) in TASKS.iter().enumerate() {
        image.put_u32(task + PID_OFF, i as u32 + 1);
    }

    // Circular doubly-linked tasks list behind TASKS_HEAD.
    let nodes: Vec<u64> = TASKS.iter().map(|t| t + TASKS_OFF).collect();
    image.put_u64(TASKS_HEAD, nodes[0]);
    image.put_u64(TASKS_HEAD + 8, nodes[2]);
    for (i, &node) in nodes.iter().enumerate() {
        let next = nodes.get(i + 1).copied().unwrap_or(TASKS_HEAD);
        let prev = if i == 0 { TASKS_HEAD } else { nodes[i - 1] };
        image.put_u64(node, next);
        image.put_u64(node + 8, prev);
    }

    // Null-terminated pid hash chain through pid_links[PID_LINK_INDEX].
    let link_off = PID_LINKS_OFF + PID_LINK_INDEX * 8;
    let hnodes: Vec<u64> = TASKS.iter().map(|t| t + link_off).collect();
    image.put_u64(PID_BUCKET, hnodes[0]);
    for (i, &node) in hnodes.iter().enumerate() {
        let next = hnodes.get(i + 1).copied().unwrap_or(0);
        image.put_u64(node, next);
    }

    image
}

pub fn kernel_target() -> Target {
    Target::new(
        Box::new(kernel_types()),
        Box::new(kernel_image()),
        DataLayout::LE64,
    )
}

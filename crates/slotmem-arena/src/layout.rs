//! Read-only snapshots of how an arena's backing buffer is carved up.

use std::fmt;
use std::ops::Range;

use slotmem_core::HandleTypeId;
use smallvec::SmallVec;

/// Placement and occupancy of one group.
///
/// Byte ranges are offsets into the arena's backing buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupLayout {
    /// Handle type served by the group.
    pub type_id: HandleTypeId,
    /// Bytes per item.
    pub stride: u32,
    /// Slots in the table, including reserved slot 0.
    pub slot_count: u32,
    /// Current free-list head; 0 when the group is exhausted.
    pub free_head: u16,
    /// Slots currently allocated or written.
    pub live: u32,
    /// Byte range of the slot table.
    pub slot_table: Range<usize>,
    /// Byte range of the data block.
    pub data_block: Range<usize>,
}

impl GroupLayout {
    /// Bytes covered by the slot table and data block together.
    pub fn size(&self) -> usize {
        self.data_block.end - self.slot_table.start
    }
}

/// Placement of every group of an arena, in descriptor order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArenaLayout {
    /// Arena name.
    pub name: String,
    /// Address of the backing buffer when the snapshot was taken.
    pub base_address: usize,
    /// Size of the backing buffer in bytes.
    pub payload_bytes: usize,
    /// One entry per group.
    pub groups: SmallVec<[GroupLayout; 4]>,
}

impl fmt::Display for ArenaLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Arena Layout ===")?;
        writeln!(f, "Arena Name: {}", self.name)?;
        writeln!(f, "Group Count: {}", self.groups.len())?;
        writeln!(f, "Arena Payload Size: {} bytes", self.payload_bytes)?;
        writeln!(f, "Backing Address: {:#x}", self.base_address)?;
        for (i, group) in self.groups.iter().enumerate() {
            writeln!(f)?;
            writeln!(f, "[[ Group {i} ]]")?;
            writeln!(
                f,
                "Slot Table: [{:#x}..{:#x}]",
                self.base_address + group.slot_table.start,
                self.base_address + group.slot_table.end
            )?;
            writeln!(
                f,
                "Data Block: [{:#x}..{:#x}]",
                self.base_address + group.data_block.start,
                self.base_address + group.data_block.end
            )?;
            writeln!(f, "Total Group Size: ({} bytes)", group.size())?;
            writeln!(
                f,
                "Handle Desc: [type: {}, stride: {}, slots: {}]",
                group.type_id, group.stride, group.slot_count
            )?;
            writeln!(f, "Free Head: {}, Live: {}", group.free_head, group.live)?;
        }
        Ok(())
    }
}

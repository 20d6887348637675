//! Shelf packing
//!
//! Cells are placed left to right along a row; a cell that does not fit
//! moves to the next row, and a row that does not fit starts a new page.
//! The cursor is serializable so packing can resume from a snapshot.

use serde::{Deserialize, Serialize};

/// Packing cursor within the current page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShelfCursor {
    /// Current X position
    pub x: u32,
    /// Current Y position (top of row)
    pub y: u32,
    /// Max height of current row
    pub row_height: u32,
}

/// Where a cell landed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub page: u32,
    pub x: u32,
    pub y: u32,
}

/// Shelf packer over fixed-size pages
#[derive(Debug, Clone)]
pub struct ShelfPacker {
    width: u32,
    height: u32,
    /// Space between cells
    padding: u32,
    /// Space between cells and page edge
    border: u32,
    page: u32,
    cursor: ShelfCursor,
}

impl ShelfPacker {
    pub fn new(width: u32, height: u32, padding: u32, border: u32) -> Self {
        Self {
            width,
            height,
            padding,
            border,
            page: 0,
            cursor: ShelfCursor {
                x: border,
                y: border,
                row_height: 0,
            },
        }
    }

    /// Continue packing on page 0 from a saved cursor
    pub fn resume(width: u32, height: u32, padding: u32, border: u32, cursor: ShelfCursor) -> Self {
        Self {
            cursor,
            ..Self::new(width, height, padding, border)
        }
    }

    pub fn cursor(&self) -> ShelfCursor {
        self.cursor
    }

    /// Number of pages touched so far
    pub fn page_count(&self) -> u32 {
        self.page + 1
    }

    /// Place a `w`x`h` cell
    ///
    /// Returns None if the cell is larger than an empty page.
    pub fn place(&mut self, w: u32, h: u32) -> Option<Placement> {
        let inner_w = self.width.saturating_sub(2 * self.border);
        let inner_h = self.height.saturating_sub(2 * self.border);
        if w > inner_w || h > inner_h {
            return None;
        }

        // Move to next row if doesn't fit in current row
        if self.cursor.x + w + self.border > self.width {
            self.cursor.y += self.cursor.row_height + self.padding;
            self.cursor.x = self.border;
            self.cursor.row_height = 0;
        }

        // Start a new page if the row doesn't fit
        if self.cursor.y + h + self.border > self.height {
            self.page += 1;
            self.cursor = ShelfCursor {
                x: self.border,
                y: self.border,
                row_height: 0,
            };
        }

        let placement = Placement {
            page: self.page,
            x: self.cursor.x,
            y: self.cursor.y,
        };

        self.cursor.x += w + self.padding;
        self.cursor.row_height = self.cursor.row_height.max(h);

        Some(placement)
    }
}

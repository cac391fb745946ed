use super::{N_REGIONS, REGION_HEIGHT, REGION_WIDTH};

/// Where a request landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Logical region, `0..N_REGIONS`.
    pub region: usize,
    /// Offset within the region.
    pub x: u32,
    pub y: u32,
    /// Every region was in use: pending drawing must be flushed before
    /// this placement is written.
    pub flush_first: bool,
}

/// Bin packer over the logical scratch regions.
///
/// Requests are sorted into four shapes, each with its own cursor:
///
/// | width        | height       | strategy                                  |
/// |--------------|--------------|-------------------------------------------|
/// | >= half      | >= half      | a whole region                            |
/// | >= half      | < half       | horizontal strips stacked downwards       |
/// | < half       | >= half      | vertical strips, advancing 8-pixel aligned |
/// | < half       | < half       | tiles in rows, row height = tallest tile  |
///
/// When a cursor needs a fresh region and none are left, the packer starts
/// over at region 0, reports that a flush is required, and marks every
/// cursor full so nothing is placed into a region from before the flush.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionPacker {
    next_region: usize,
    horiz_region: usize,
    horiz_y: u32,
    vert_region: usize,
    vert_x: u32,
    tile_region: usize,
    tile_x: u32,
    tile_y1: u32,
    tile_y2: u32,
}

impl Default for RegionPacker {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
fn align8(width: u32) -> u32 {
    (width + 7) & !7
}

impl RegionPacker {
    pub fn new() -> Self {
        Self {
            next_region: 0,
            horiz_region: 0,
            horiz_y: REGION_HEIGHT,
            vert_region: 0,
            vert_x: REGION_WIDTH,
            tile_region: 0,
            tile_x: REGION_WIDTH,
            tile_y1: REGION_HEIGHT,
            tile_y2: REGION_HEIGHT,
        }
    }

    /// Regions handed out since the last flush.
    pub fn regions_in_use(&self) -> usize {
        self.next_region
    }

    fn next_region(&mut self, flushed: &mut bool) -> usize {
        if self.next_region == N_REGIONS {
            *flushed = true;
            self.next_region = 0;
            self.horiz_y = REGION_HEIGHT;
            self.vert_x = REGION_WIDTH;
            self.tile_x = REGION_WIDTH;
            self.tile_y1 = REGION_HEIGHT;
            self.tile_y2 = REGION_HEIGHT;
        }
        let region = self.next_region;
        self.next_region += 1;
        region
    }

    /// Place a `width x height` request, both at most one region.
    pub fn place(&mut self, width: u32, height: u32) -> Placement {
        debug_assert!(width <= REGION_WIDTH && height <= REGION_HEIGHT);
        let mut flush_first = false;
        let (region, x, y);

        if width >= REGION_WIDTH / 2 {
            if height >= REGION_HEIGHT / 2 {
                region = self.next_region(&mut flush_first);
                (x, y) = (0, 0);
            } else {
                if height + self.horiz_y > REGION_HEIGHT {
                    self.horiz_region = self.next_region(&mut flush_first);
                    self.horiz_y = 0;
                }
                region = self.horiz_region;
                (x, y) = (0, self.horiz_y);
                self.horiz_y += height;
            }
        } else if height >= REGION_HEIGHT / 2 {
            if width + self.vert_x > REGION_WIDTH {
                self.vert_region = self.next_region(&mut flush_first);
                self.vert_x = 0;
            }
            region = self.vert_region;
            (x, y) = (self.vert_x, 0);
            self.vert_x += align8(width);
        } else {
            if width + self.tile_x > REGION_WIDTH {
                self.tile_y1 = self.tile_y2;
                self.tile_x = 0;
            }
            if height + self.tile_y1 > REGION_HEIGHT {
                self.tile_region = self.next_region(&mut flush_first);
                self.tile_x = 0;
                self.tile_y1 = 0;
                self.tile_y2 = 0;
            }
            self.tile_y2 = self.tile_y2.max(height + self.tile_y1);
            region = self.tile_region;
            (x, y) = (self.tile_x, self.tile_y1);
            self.tile_x += align8(width);
        }

        Placement {
            region,
            x,
            y,
            flush_first,
        }
    }
}

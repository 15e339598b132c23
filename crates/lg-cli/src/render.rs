//! ASCII rendering of a generated level
//!
//! One character per world unit, top row first.

use lg_core::GeneratedLevel;
use lg_core::level::{BlockKind, PropCategory, Rect};

/// Map glyph for a prop category
pub fn glyph(category: PropCategory) -> char {
    match category {
        PropCategory::PlayerStart => '@',
        PropCategory::Shooter => 's',
        PropCategory::Melee => 'm',
        PropCategory::StaticProp => 'o',
        PropCategory::Gun | PropCategory::Pickable => '*',
    }
}

fn block_glyph(kind: BlockKind) -> char {
    match kind {
        BlockKind::Floor => '.',
        BlockKind::Wall | BlockKind::HallwayWall => '#',
        BlockKind::HallwayFloor => '=',
    }
}

// Hallway floors go last so door openings stay visible
const PAINT_ORDER: [BlockKind; 4] = [
    BlockKind::Floor,
    BlockKind::Wall,
    BlockKind::HallwayWall,
    BlockKind::HallwayFloor,
];

struct Raster {
    width: usize,
    height: usize,
    cells: Vec<char>,
}

impl Raster {
    fn new(world: &Rect) -> Self {
        let width = world.width.ceil().max(0.0) as usize;
        let height = world.height.ceil().max(0.0) as usize;
        Self {
            width,
            height,
            cells: vec![' '; width * height],
        }
    }

    fn cell_range(lo: f64, hi: f64, limit: usize) -> std::ops::Range<usize> {
        let start = lo.floor().max(0.0) as usize;
        let end = (hi.ceil().max(0.0) as usize).min(limit);
        start.min(end)..end
    }

    fn fill(&mut self, rect: &Rect, ch: char) {
        for y in Self::cell_range(rect.bottom(), rect.top(), self.height) {
            for x in Self::cell_range(rect.left(), rect.right(), self.width) {
                self.cells[y * self.width + x] = ch;
            }
        }
    }

    fn put(&mut self, x: f64, y: f64, ch: char) {
        if x < 0.0 || y < 0.0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = ch;
        }
    }

    fn into_string(self) -> String {
        let mut out = String::with_capacity((self.width + 1) * self.height);
        for row in self.cells.chunks(self.width.max(1)).rev() {
            out.extend(row.iter());
            out.push('\n');
        }
        out
    }
}

/// Draw the level as text
pub fn ascii(level: &GeneratedLevel) -> String {
    let mut raster = Raster::new(&level.world);

    for kind in PAINT_ORDER {
        for block in level.blocks.iter().filter(|b| b.kind == kind) {
            raster.fill(&block.plane_rect(), block_glyph(kind));
        }
    }

    // The player start is drawn last so nothing hides it
    let mut props: Vec<_> = level.props.iter().collect();
    props.sort_by_key(|p| p.category == PropCategory::PlayerStart);
    for prop in props {
        let (x, y) = prop.footprint.center();
        raster.put(x, y, glyph(prop.category));
    }

    raster.into_string()
}

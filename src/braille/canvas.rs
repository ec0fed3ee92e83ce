/// Empty braille pattern; cells holding it are left untouched when painting.
pub const BLANK: char = '\u{2800}';

/// Dot raster backed by Unicode braille cells (U+2800..U+28FF).
/// Every character cell packs a 2x4 block of pixels into one byte.
pub struct BrailleCanvas {
    width: usize,  // Characters
    height: usize, // Characters
    cells: Vec<u8>,
}

impl BrailleCanvas {
    /// Canvas of `width` x `height` character cells,
    /// i.e. `width*2` x `height*4` pixels.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![0; width * height],
        }
    }

    /// Bit of pixel `(x, y)` inside its cell.
    /// ```text
    /// (0,0) (1,0)   bits: 0x01 0x08
    /// (0,1) (1,1)   bits: 0x02 0x10
    /// (0,2) (1,2)   bits: 0x04 0x20
    /// (0,3) (1,3)   bits: 0x40 0x80
    /// ```
    fn bit(x: usize, y: usize) -> u8 {
        const BITS: [[u8; 2]; 4] = [[0x01, 0x08], [0x02, 0x10], [0x04, 0x20], [0x40, 0x80]];
        BITS[y % 4][x % 2]
    }

    fn index(&self, x: usize, y: usize) -> Option<usize> {
        let (cx, cy) = (x / 2, y / 4);
        (cx < self.width && cy < self.height).then_some(cy * self.width + cx)
    }

    /// Set a pixel; out-of-range pixels are ignored
    pub fn set_pixel(&mut self, x: usize, y: usize) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] |= Self::bit(x, y);
        }
    }

    /// Set a pixel using signed coordinates (ignores negative values)
    pub fn set_pixel_signed(&mut self, x: i32, y: i32) {
        if x >= 0 && y >= 0 {
            self.set_pixel(x as usize, y as usize);
        }
    }

    #[cfg(test)]
    pub fn is_set(&self, x: usize, y: usize) -> bool {
        self.index(x, y)
            .is_some_and(|i| self.cells[i] & Self::bit(x, y) != 0)
    }

    /// Pixel resolution (width*2, height*4)
    pub fn pixel_size(&self) -> (usize, usize) {
        (self.width * 2, self.height * 4)
    }

    pub fn count_pixels(&self) -> usize {
        self.cells.iter().map(|b| b.count_ones() as usize).sum()
    }

    /// Glyphs of each character row, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = impl Iterator<Item = char> + '_> + '_ {
        self.cells
            .chunks(self.width.max(1))
            .take(self.height)
            .map(|row| row.iter().map(|&b| glyph(b)))
    }
}

fn glyph(pattern: u8) -> char {
    char::from_u32(BLANK as u32 + pattern as u32).unwrap_or(' ')
}

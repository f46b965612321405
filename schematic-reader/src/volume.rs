/// A dense box of palette indices.
///
/// Cells are stored with x varying fastest, then z, then y:
/// `index = x + z * width + y * width * length`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockVolume {
    width: i32,
    height: i32,
    length: i32,
    cells: Vec<u32>,
}

impl BlockVolume {
    /// `cells` must hold exactly `width * height * length` values.
    pub(crate) fn new(width: i32, height: i32, length: i32, cells: Vec<u32>) -> Self {
        debug_assert_eq!(cells.len(), width as usize * height as usize * length as usize);
        Self {
            width,
            height,
            length,
            cells,
        }
    }

    /// `(width, height, length)`, the sizes along x, y and z.
    pub fn dimensions(&self) -> (i32, i32, i32) {
        (self.width, self.height, self.length)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Position of a cell in [`BlockVolume::as_slice`], or `None` outside the
    /// volume.
    pub fn index(&self, x: i32, y: i32, z: i32) -> Option<usize> {
        if !(0..self.width).contains(&x)
            || !(0..self.height).contains(&y)
            || !(0..self.length).contains(&z)
        {
            return None;
        }

        let (w, l) = (self.width as usize, self.length as usize);
        Some(x as usize + z as usize * w + y as usize * w * l)
    }

    pub fn get(&self, x: i32, y: i32, z: i32) -> Option<u32> {
        self.index(x, y, z).map(|i| self.cells[i])
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.cells
    }
}

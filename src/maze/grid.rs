/// A cell position as `(x, y)`, with `(0, 0)` at the top-left corner.
pub type Coord = (u16, u16);

/// One of the four sides of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Top,
    Right,
    Bottom,
    Left,
}

impl Direction {
    /// All directions, in the order neighbors are reported.
    pub const ALL: [Direction; 4] = [
        Direction::Top,
        Direction::Right,
        Direction::Bottom,
        Direction::Left,
    ];

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Top => Direction::Bottom,
            Direction::Right => Direction::Left,
            Direction::Bottom => Direction::Top,
            Direction::Left => Direction::Right,
        }
    }

    /// Slot of this side in a cell's wall array.
    pub(crate) fn index(self) -> usize {
        self as usize
    }

    /// The coordinate one step away in this direction, without bounds checking
    /// against any grid.
    fn step(self, (x, y): Coord) -> Coord {
        // NOTE: Stepping off the top or left edge wraps to u16::MAX, and stepping
        // off the bottom or right edge saturates at u16::MAX. Neither is ever a
        // valid index (the largest index is u16::MAX - 1), so the bounds check
        // in `Grid::neighbor` filters both out.
        match self {
            Direction::Top => (x, y.wrapping_sub(1)),
            Direction::Right => (x.saturating_add(1), y),
            Direction::Bottom => (x, y.saturating_add(1)),
            Direction::Left => (x.wrapping_sub(1), y),
        }
    }
}

/// Fixed-size, row-major 2-D storage.
#[derive(Debug, Clone)]
pub struct Grid<T> {
    data: Box<[T]>,
    width: u16,
    height: u16,
}

impl<T: Clone> Grid<T> {
    pub fn new(width: u16, height: u16, value: T) -> Self {
        let data = vec![value; width as usize * height as usize].into_boxed_slice();
        Grid {
            data,
            width,
            height,
        }
    }

    /// Overwrite every slot with `value`.
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }
}

impl<T> Grid<T> {
    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Total number of slots.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn in_bounds(&self, coord: Coord) -> bool {
        coord.0 < self.width && coord.1 < self.height
    }

    /// Flat index of an in-bounds coordinate.
    pub fn index_of(&self, coord: Coord) -> usize {
        // Overflow-safe since width and height are u16 (assuming usize is at least 32 bits)
        coord.1 as usize * self.width as usize + coord.0 as usize
    }

    /// Inverse of [`Grid::index_of`].
    pub fn coord_of(&self, index: usize) -> Coord {
        let width = self.width as usize;
        ((index % width) as u16, (index / width) as u16)
    }

    /// The adjacent coordinate in `direction`, or `None` past the grid edge.
    pub fn neighbor(&self, coord: Coord, direction: Direction) -> Option<Coord> {
        if !self.in_bounds(coord) {
            return None;
        }
        Some(direction.step(coord)).filter(|&c| self.in_bounds(c))
    }

    /// All in-bounds neighbors with the direction leading to them, ordered Top, Right,
    /// Bottom, Left.
    pub fn neighbors(&self, coord: Coord) -> impl Iterator<Item = (Direction, Coord)> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(move |dir| self.neighbor(coord, dir).map(|c| (dir, c)))
    }

    /// Row-major iterator over all coordinates.
    pub fn coords(&self) -> impl Iterator<Item = Coord> + use<T> {
        let (width, height) = (self.width, self.height);
        (0..height).flat_map(move |y| (0..width).map(move |x| (x, y)))
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }
}

impl<T> std::ops::Index<Coord> for Grid<T> {
    type Output = T;

    fn index(&self, index: Coord) -> &Self::Output {
        &self.data[self.index_of(index)]
    }
}

impl<T> std::ops::IndexMut<Coord> for Grid<T> {
    fn index_mut(&mut self, index: Coord) -> &mut Self::Output {
        let idx = self.index_of(index);
        &mut self.data[idx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_indexing() {
        let mut grid = Grid::new(5, 4, 0u8);
        grid[(2, 3)] = 7;
        assert_eq!(grid[(2, 3)], 7);
        assert_eq!(grid.index_of((2, 3)), 17);
        assert_eq!(grid.coord_of(17), (2, 3));
        assert_eq!(grid.len(), 20);
    }

    #[test]
    fn test_out_of_bounds() {
        let grid = Grid::new(5, 5, ());
        assert!(!grid.in_bounds((5, 5)));
        assert!(!grid.in_bounds((0, 5)));
        assert!(!grid.in_bounds((5, 0)));
        assert!(grid.in_bounds((4, 4)));
    }

    #[test]
    fn test_neighbors_order_and_edges() {
        let grid = Grid::new(3, 3, ());
        let center = grid.neighbors((1, 1)).collect::<Vec<_>>();
        assert_eq!(
            center,
            vec![
                (Direction::Top, (1, 0)),
                (Direction::Right, (2, 1)),
                (Direction::Bottom, (1, 2)),
                (Direction::Left, (0, 1)),
            ]
        );

        let corner = grid.neighbors((0, 0)).map(|(d, _)| d).collect::<Vec<_>>();
        assert_eq!(corner, vec![Direction::Right, Direction::Bottom]);
        assert_eq!(grid.neighbor((2, 2), Direction::Right), None);
        assert_eq!(grid.neighbor((3, 0), Direction::Left), None);
    }

    #[test]
    fn test_coords_row_major() {
        let grid = Grid::new(2, 2, ());
        let coords = grid.coords().collect::<Vec<_>>();
        assert_eq!(coords, vec![(0, 0), (1, 0), (0, 1), (1, 1)]);
    }

    #[test]
    fn test_opposite_directions() {
        for dir in Direction::ALL {
            assert_eq!(dir.opposite().opposite(), dir);
            assert_ne!(dir.opposite(), dir);
        }
    }
}

use std::ops;

use crate::error::GridError;

/// Edge length of a cubic occupancy grid.
///
/// A grid of size `n` holds `n` depth layers, each a square `n x n` slice.
///
/// # Examples
///
/// ```
/// use mvgrid_grid::GridSize;
///
/// let size = GridSize(32);
///
/// assert_eq!(size.slice_area(), 32 * 32);
/// assert_eq!(size.num_cells(), 32 * 32 * 32);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridSize(pub usize);

impl GridSize {
    /// Number of elements in one depth slice.
    #[inline]
    pub fn slice_area(&self) -> usize {
        self.0 * self.0
    }

    /// Number of cells in the whole grid.
    #[inline]
    pub fn num_cells(&self) -> usize {
        self.0 * self.0 * self.0
    }
}

impl std::fmt::Display for GridSize {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "GridSize {{ {0}x{0}x{0} }}", self.0)
    }
}

impl From<usize> for GridSize {
    fn from(size: usize) -> Self {
        GridSize(size)
    }
}

/// Discrete address of one grid entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    /// Depth layer (slice index).
    pub layer: usize,
    /// Image-space row inside the slice.
    pub row: usize,
    /// Image-space column inside the slice.
    pub col: usize,
}

impl Cell {
    /// Create a new cell address.
    pub fn new(layer: usize, row: usize, col: usize) -> Self {
        Self { layer, row, col }
    }

    /// Linear offset of the cell in a channel-major buffer of the given size.
    #[inline]
    pub fn offset(&self, size: usize) -> usize {
        (self.layer * size + self.row) * size + self.col
    }

    fn in_bounds(&self, size: usize) -> bool {
        self.layer < size && self.row < size && self.col < size
    }
}

impl From<[usize; 3]> for Cell {
    fn from([layer, row, col]: [usize; 3]) -> Self {
        Cell { layer, row, col }
    }
}

/// A probabilistic occupancy volume.
///
/// The grid is an ordered sequence of `size` square slices of `size x size`
/// values. Index `layer` of the sequence is the discretized depth and
/// `(row, col)` inside a slice are image-space coordinates. All slices live in
/// one contiguous buffer in channel-major order, the same layout the
/// surrounding training framework uses for its blobs.
#[derive(Clone, Debug, PartialEq)]
pub struct OccupancyGrid<T> {
    size: GridSize,
    data: Vec<T>,
}

impl<T> OccupancyGrid<T> {
    /// Create a new grid from channel-major data.
    ///
    /// # Arguments
    ///
    /// * `size` - The edge length of the grid.
    /// * `data` - The `size^3` values, slice after slice.
    ///
    /// # Errors
    ///
    /// If the size is zero or the data length does not match `size^3`, an error
    /// is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use mvgrid_grid::OccupancyGrid;
    ///
    /// let grid = OccupancyGrid::new(2, vec![0.0f32, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]).unwrap();
    ///
    /// assert_eq!(grid.size(), 2);
    /// assert_eq!(grid[[1, 0, 1]], 5.0);
    /// ```
    pub fn new(size: usize, data: Vec<T>) -> Result<Self, GridError> {
        if size == 0 {
            return Err(GridError::ZeroSize);
        }

        let size = GridSize(size);
        if data.len() != size.num_cells() {
            return Err(GridError::InvalidDataLength(data.len(), size.num_cells()));
        }

        Ok(Self { size, data })
    }

    /// Create a new grid filled with the given value.
    pub fn from_size_val(size: usize, val: T) -> Result<Self, GridError>
    where
        T: Clone,
    {
        let data = vec![val; GridSize(size).num_cells()];
        Self::new(size, data)
    }

    /// Create a new grid filled with zeros.
    pub fn zeros(size: usize) -> Result<Self, GridError>
    where
        T: Clone + num_traits::Zero,
    {
        Self::from_size_val(size, T::zero())
    }

    /// Create a new grid from an ordered list of depth slices.
    ///
    /// The grid size is the number of slices and every slice must hold
    /// exactly `size * size` values.
    pub fn from_slices<S>(slices: &[S]) -> Result<Self, GridError>
    where
        S: AsRef<[T]>,
        T: Clone,
    {
        let size = GridSize(slices.len());
        if size.0 == 0 {
            return Err(GridError::ZeroSize);
        }

        let mut data = Vec::with_capacity(size.num_cells());
        for (layer, slice) in slices.iter().enumerate() {
            let slice = slice.as_ref();
            if slice.len() != size.slice_area() {
                return Err(GridError::InvalidSliceLength(
                    layer,
                    slice.len(),
                    size.slice_area(),
                ));
            }
            data.extend_from_slice(slice);
        }

        Self::new(size.0, data)
    }

    /// Get the edge length of the grid.
    #[inline]
    pub fn size(&self) -> usize {
        self.size.0
    }

    /// Get the size of the grid as a [`GridSize`].
    #[inline]
    pub fn grid_size(&self) -> GridSize {
        self.size
    }

    /// Get a reference to the value at `[layer, row, col]`, or `None` if out of bounds.
    pub fn get(&self, index: [usize; 3]) -> Option<&T> {
        self.get_cell(Cell::from(index))
    }

    /// Get a mutable reference to the value at `[layer, row, col]`, or `None` if out of bounds.
    pub fn get_mut(&mut self, index: [usize; 3]) -> Option<&mut T> {
        self.get_cell_mut(Cell::from(index))
    }

    /// Get a reference to the value at the given cell, or `None` if out of bounds.
    pub fn get_cell(&self, cell: Cell) -> Option<&T> {
        if !cell.in_bounds(self.size.0) {
            return None;
        }
        self.data.get(cell.offset(self.size.0))
    }

    /// Get a mutable reference to the value at the given cell, or `None` if out of bounds.
    pub fn get_cell_mut(&mut self, cell: Cell) -> Option<&mut T> {
        if !cell.in_bounds(self.size.0) {
            return None;
        }
        self.data.get_mut(cell.offset(self.size.0))
    }

    /// Get one depth slice as a row-major `size x size` buffer.
    pub fn slice(&self, layer: usize) -> Option<&[T]> {
        let area = self.size.slice_area();
        self.data.get(layer * area..(layer + 1) * area)
    }

    /// Get one depth slice as a mutable row-major `size x size` buffer.
    pub fn slice_mut(&mut self, layer: usize) -> Option<&mut [T]> {
        let area = self.size.slice_area();
        self.data.get_mut(layer * area..(layer + 1) * area)
    }

    /// Iterate over the depth slices in layer order.
    pub fn slices(&self) -> std::slice::ChunksExact<'_, T> {
        self.data.chunks_exact(self.size.slice_area())
    }

    /// Iterate mutably over the depth slices in layer order.
    pub fn slices_mut(&mut self) -> std::slice::ChunksExactMut<'_, T> {
        let area = self.size.slice_area();
        self.data.chunks_exact_mut(area)
    }

    /// Get the grid data as a channel-major slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Get the grid data as a mutable channel-major slice.
    #[inline]
    pub fn as_slice_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consume the grid and return the channel-major data.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Cast the grid values to a different type.
    ///
    /// # Errors
    ///
    /// If a value cannot be represented in the target type, an error is returned.
    pub fn cast<U>(&self) -> Result<OccupancyGrid<U>, GridError>
    where
        T: num_traits::NumCast + Copy,
        U: num_traits::NumCast,
    {
        let data = self
            .data
            .iter()
            .map(|&x| U::from(x).ok_or(GridError::CastError))
            .collect::<Result<Vec<U>, GridError>>()?;

        OccupancyGrid::new(self.size.0, data)
    }
}

impl<T> ops::Index<[usize; 3]> for OccupancyGrid<T> {
    type Output = T;

    /// Index by `[layer, row, col]`. Panics when out of bounds.
    fn index(&self, index: [usize; 3]) -> &Self::Output {
        match self.get(index) {
            Some(v) => v,
            None => panic!("cell {index:?} out of bounds for grid of size {}", self.size.0),
        }
    }
}

impl<T> ops::IndexMut<[usize; 3]> for OccupancyGrid<T> {
    fn index_mut(&mut self, index: [usize; 3]) -> &mut Self::Output {
        let size = self.size.0;
        match self.get_mut(index) {
            Some(v) => v,
            None => panic!("cell {index:?} out of bounds for grid of size {size}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_size() {
        let size = GridSize(4);
        assert_eq!(size.slice_area(), 16);
        assert_eq!(size.num_cells(), 64);
        assert_eq!(size.to_string(), "GridSize { 4x4x4 }");
    }

    #[test]
    fn cell_offset() {
        let cell = Cell::new(1, 2, 3);
        assert_eq!(cell.offset(4), 16 + 2 * 4 + 3);
        assert_eq!(Cell::from([1, 2, 3]), cell);
    }

    #[test]
    fn grid_new() -> Result<(), GridError> {
        let grid = OccupancyGrid::new(2, (0..8).map(|x| x as f32).collect())?;
        assert_eq!(grid.size(), 2);
        assert_eq!(grid.grid_size(), GridSize(2));
        assert_eq!(grid[[0, 0, 0]], 0.0);
        assert_eq!(grid[[0, 1, 0]], 2.0);
        assert_eq!(grid[[1, 1, 1]], 7.0);
        Ok(())
    }

    #[test]
    fn grid_new_invalid() {
        let res = OccupancyGrid::new(2, vec![0.0f32; 7]);
        assert_eq!(res, Err(GridError::InvalidDataLength(7, 8)));

        let res = OccupancyGrid::<f32>::new(0, vec![]);
        assert_eq!(res, Err(GridError::ZeroSize));
    }

    #[test]
    fn grid_from_slices() -> Result<(), GridError> {
        let slices = vec![vec![1u8; 4], vec![2u8; 4]];
        let grid = OccupancyGrid::from_slices(&slices)?;
        assert_eq!(grid.size(), 2);
        assert_eq!(grid.slice(0), Some(&[1u8; 4][..]));
        assert_eq!(grid.slice(1), Some(&[2u8; 4][..]));
        assert_eq!(grid.slice(2), None);

        let bad = vec![vec![1u8; 4], vec![2u8; 3]];
        assert_eq!(
            OccupancyGrid::from_slices(&bad),
            Err(GridError::InvalidSliceLength(1, 3, 4))
        );
        Ok(())
    }

    #[test]
    fn grid_get_set() -> Result<(), GridError> {
        let mut grid = OccupancyGrid::<f32>::zeros(3)?;
        grid[[2, 1, 0]] = 0.5;
        *grid.get_cell_mut(Cell::new(0, 0, 2)).expect("in bounds") = 0.25;

        assert_eq!(grid.get([2, 1, 0]), Some(&0.5));
        assert_eq!(grid.get_cell(Cell::new(0, 0, 2)), Some(&0.25));
        assert_eq!(grid.get([3, 0, 0]), None);
        assert_eq!(grid.get([0, 0, 3]), None);
        assert_eq!(grid.as_slice().iter().filter(|&&v| v != 0.0).count(), 2);
        Ok(())
    }

    #[test]
    fn grid_slices_iter() -> Result<(), GridError> {
        let mut grid = OccupancyGrid::<u8>::zeros(3)?;
        for (layer, slice) in grid.slices_mut().enumerate() {
            slice.fill(layer as u8);
        }
        assert_eq!(grid.slices().count(), 3);
        assert!(grid.slices().enumerate().all(|(l, s)| s.iter().all(|&v| v == l as u8)));
        Ok(())
    }

    #[test]
    fn grid_cast() -> Result<(), GridError> {
        let grid = OccupancyGrid::new(1, vec![0.75f32])?;
        let grid_f64 = grid.cast::<f64>()?;
        assert_eq!(grid_f64.into_vec(), vec![0.75f64]);
        Ok(())
    }

    #[test]
    #[should_panic]
    fn grid_index_out_of_bounds() {
        let grid = OccupancyGrid::<f32>::zeros(2).unwrap();
        let _ = grid[[0, 2, 0]];
    }
}

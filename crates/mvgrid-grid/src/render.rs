use crate::grid::OccupancyGrid;

// Piecewise linear ramp shared by the three jet channels.
fn interpolate(val: f32, y0: f32, x0: f32, y1: f32, x1: f32) -> f32 {
    (val - x0) * (y1 - y0) / (x1 - x0) + y0
}

fn base(val: f32) -> f32 {
    if val <= -0.75 {
        0.0
    } else if val <= -0.25 {
        interpolate(val, 0.0, -0.75, 1.0, -0.25)
    } else if val <= 0.25 {
        1.0
    } else if val <= 0.75 {
        interpolate(val, 1.0, 0.25, 0.0, 0.75)
    } else {
        0.0
    }
}

/// Map a value in `[-1, 1]` to an RGB color of the jet colormap.
///
/// `-1` is dark blue, `0` green and `1` dark red.
///
/// # Example
///
/// ```
/// use mvgrid_grid::render::jet_color;
///
/// assert_eq!(jet_color(0.0), [127, 255, 127]);
/// ```
pub fn jet_color(gray: f32) -> [u8; 3] {
    [
        (base(gray - 0.5) * 255.0) as u8,
        (base(gray) * 255.0) as u8,
        (base(gray + 0.5) * 255.0) as u8,
    ]
}

/// Find, for every `(row, col)` line of sight, the first depth layer whose
/// value exceeds `threshold`.
///
/// # Returns
///
/// A row-major `size x size` buffer, `None` where the line of sight is empty.
pub fn first_occupied_layer<T>(grid: &OccupancyGrid<T>, threshold: T) -> Vec<Option<usize>>
where
    T: PartialOrd + Copy,
{
    let size = grid.size();
    let area = size * size;
    let data = grid.as_slice();

    (0..area)
        .map(|pixel| (0..size).find(|&layer| data[layer * area + pixel] > threshold))
        .collect()
}

/// Render the iso-surface of a grid as a color-coded depth image.
///
/// Each pixel is colored by the depth of the first layer above `threshold`,
/// near surfaces in blue and far ones in red. Empty lines of sight are treated
/// as lying just in front of the first layer.
///
/// # Returns
///
/// A row-major `size x size` RGB buffer.
pub fn iso_surface<T>(grid: &OccupancyGrid<T>, threshold: T) -> Vec<[u8; 3]>
where
    T: PartialOrd + Copy,
{
    let size = grid.size() as f32;
    first_occupied_layer(grid, threshold)
        .into_iter()
        .map(|layer| {
            let layer = layer.map_or(-1.0, |l| l as f32);
            let depth = (layer + 0.5) / size;
            jet_color(depth * 2.0 - 1.0)
        })
        .collect()
}

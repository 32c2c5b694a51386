//! Per-color boundary classification layers

use std::collections::BTreeMap;

use ndarray::Array2;

/// Build one boundary-classification matrix per palette index present in
/// the image
///
/// Each interior cell of the index matrix contributes up to four corner
/// cells of its color's layer. The code written into a layer cell encodes
/// which diagonal neighbors of that corner share the pixel's color, using
/// one bit per quadrant; codes 0 and 15 mark cells fully inside or outside
/// a region, every other value lies on a region boundary.
///
/// Layers share the padded shape of the index matrix so the contour walk
/// can step onto the border without bounds checks.
pub fn build_layers(matrix: &Array2<i16>) -> BTreeMap<i16, Array2<u8>> {
    let (rows, cols) = matrix.dim();
    let mut layers: BTreeMap<i16, Array2<u8>> = BTreeMap::new();

    let cell = |y: usize, x: usize| -> i16 { matrix.get((y, x)).copied().unwrap_or(-1) };

    for y in 1..rows.saturating_sub(1) {
        for x in 1..cols.saturating_sub(1) {
            let value = cell(y, x);
            if value < 0 {
                continue;
            }

            let top_left = u8::from(cell(y - 1, x - 1) == value);
            let top = u8::from(cell(y - 1, x) == value);
            let top_right = u8::from(cell(y - 1, x + 1) == value);
            let left = u8::from(cell(y, x - 1) == value);
            let right = u8::from(cell(y, x + 1) == value);
            let bottom_left = u8::from(cell(y + 1, x - 1) == value);
            let bottom = u8::from(cell(y + 1, x) == value);
            let bottom_right = u8::from(cell(y + 1, x + 1) == value);

            let layer = layers
                .entry(value)
                .or_insert_with(|| Array2::zeros((rows, cols)));

            // Own lower-right corner is always classified
            if let Some(target) = layer.get_mut((y + 1, x + 1)) {
                *target = 1 + right * 2 + bottom_right * 4 + bottom * 8;
            }
            // Remaining corners only where the adjoining neighbor differs,
            // so a cell is written by exactly one owning pixel
            if left == 0 && let Some(target) = layer.get_mut((y + 1, x)) {
                *target = 2 + bottom * 4 + bottom_left * 8;
            }
            if top == 0 && let Some(target) = layer.get_mut((y, x + 1)) {
                *target = top_right * 2 + right * 4 + 8;
            }
            if top_left == 0 && let Some(target) = layer.get_mut((y, x)) {
                *target = top * 2 + 4 + left * 8;
            }
        }
    }

    layers
}

#[cfg(test)]
mod tests {
    use super::build_layers;
    use ndarray::Array2;

    #[test]
    fn test_single_pixel_region_corners() {
        // One pixel of color 1 surrounded by color 0, padded with -1
        let mut matrix = Array2::from_elem((5, 5), -1i16);
        for y in 1..4 {
            for x in 1..4 {
                matrix[(y, x)] = 0;
            }
        }
        matrix[(2, 2)] = 1;

        let layers = build_layers(&matrix);
        assert_eq!(layers.len(), 2);

        let layer = layers.get(&1).unwrap();
        // An isolated pixel has no same-color neighbors: its four corner
        // cells carry the pure corner codes
        assert_eq!(layer[(3, 3)], 1);
        assert_eq!(layer[(3, 2)], 2);
        assert_eq!(layer[(2, 3)], 8);
        assert_eq!(layer[(2, 2)], 4);
    }

    #[test]
    fn test_uniform_block_interior_is_saturated() {
        let mut matrix = Array2::from_elem((4, 4), -1i16);
        for y in 1..3 {
            for x in 1..3 {
                matrix[(y, x)] = 0;
            }
        }
        let layers = build_layers(&matrix);
        let layer = layers.get(&0).unwrap();
        // The shared corner of a 2x2 same-color block sees all quadrants set
        assert_eq!(layer[(2, 2)], 15);
        // The top-left start corner of the region carries code 4
        assert_eq!(layer[(1, 1)], 4);
    }
}

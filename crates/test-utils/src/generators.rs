//! Test data generators for synthetic raster stacks.
//!
//! Stacks are laid out `[time][row][column]` in a flat `Vec<f32>`, the order
//! the raster readers and the Zarr writers expect.

/// Offset of `(t, row, col)` in a flat stack.
pub fn stack_offset(rows: usize, columns: usize, t: usize, row: usize, col: usize) -> usize {
    (t * rows + row) * columns + col
}

/// Creates a stack with predictable values.
///
/// Each cell value is calculated as: `t * 100 + row * 10 + col`
///
/// # Example
///
/// ```
/// use test_utils::create_test_stack;
///
/// let stack = create_test_stack(2, 3, 4);
/// assert_eq!(stack.len(), 24);
/// assert_eq!(stack[0], 0.0);     // t=0, row=0, col=0
/// assert_eq!(stack[5], 11.0);    // t=0, row=1, col=1
/// assert_eq!(stack[12], 100.0);  // t=1, row=0, col=0
/// ```
pub fn create_test_stack(time_steps: usize, rows: usize, columns: usize) -> Vec<f32> {
    create_stack_with(time_steps, rows, columns, |t, row, col| {
        (t * 100 + row * 10 + col) as f64
    })
}

/// Creates a stack from a generator function of `(t, row, col)`.
///
/// Values are computed in `f64` and rounded to the nearest `f32`.
pub fn create_stack_with<F>(time_steps: usize, rows: usize, columns: usize, f: F) -> Vec<f32>
where
    F: Fn(usize, usize, usize) -> f64,
{
    let mut data = Vec::with_capacity(time_steps * rows * columns);
    for t in 0..time_steps {
        for row in 0..rows {
            for col in 0..columns {
                data.push(f(t, row, col) as f32);
            }
        }
    }
    data
}

/// Creates a stack filled with one value.
pub fn create_constant_stack(time_steps: usize, rows: usize, columns: usize, value: f32) -> Vec<f32> {
    vec![value; time_steps * rows * columns]
}

/// Sets the given `(t, row, col)` positions of a stack to `value`.
///
/// Positions outside the stack are ignored.
pub fn punch_holes(
    data: &mut [f32],
    rows: usize,
    columns: usize,
    positions: &[(usize, usize, usize)],
    value: f32,
) {
    for &(t, row, col) in positions {
        if row >= rows || col >= columns {
            continue;
        }
        let offset = stack_offset(rows, columns, t, row, col);
        if let Some(cell) = data.get_mut(offset) {
            *cell = value;
        }
    }
}

/// Extracts the series of one cell from a stack.
pub fn cell_series(data: &[f32], rows: usize, columns: usize, row: usize, col: usize) -> Vec<f32> {
    let steps = data.len() / (rows * columns).max(1);
    (0..steps)
        .map(|t| data[stack_offset(rows, columns, t, row, col)])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_test_stack() {
        let stack = create_test_stack(3, 2, 2);
        assert_eq!(stack.len(), 12);
        assert_eq!(stack[0], 0.0); // t=0, row=0, col=0
        assert_eq!(stack[3], 11.0); // t=0, row=1, col=1
        assert_eq!(stack[4], 100.0); // t=1, row=0, col=0
        assert_eq!(stack[11], 211.0); // t=2, row=1, col=1
    }

    #[test]
    fn test_create_constant_stack() {
        let stack = create_constant_stack(2, 3, 3, 42.0);
        assert_eq!(stack.len(), 18);
        assert!(stack.iter().all(|&v| v == 42.0));
    }

    #[test]
    fn test_punch_holes() {
        let mut stack = create_test_stack(2, 2, 2);
        punch_holes(&mut stack, 2, 2, &[(1, 0, 1), (5, 0, 0), (0, 3, 0)], f32::NAN);
        assert!(stack[5].is_nan()); // t=1, row=0, col=1
        assert_eq!(stack.iter().filter(|v| v.is_nan()).count(), 1);
    }

    #[test]
    fn test_cell_series() {
        let stack = create_test_stack(3, 2, 2);
        assert_eq!(cell_series(&stack, 2, 2, 1, 0), vec![10.0, 110.0, 210.0]);
    }
}

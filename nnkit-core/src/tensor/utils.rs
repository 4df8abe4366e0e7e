use std::cmp::max;

use crate::error::NnKitError;

/// Calculates the strides for a given shape.
/// Strides represent the number of elements to skip in the flattened data array
/// to move one step along each dimension.
///
/// Example:
/// shape = [2, 3] -> strides = [3, 1]
/// shape = [2, 2, 2] -> strides = [4, 2, 1]
pub fn calculate_strides(shape: &[usize]) -> Vec<usize> {
    if shape.is_empty() {
        return vec![];
    }
    let rank = shape.len();
    let mut strides = vec![1; rank];
    for i in (0..rank - 1).rev() {
        strides[i] = strides[i + 1] * shape[i + 1];
    }
    strides
}

/// Promotes a shape to rank two by prepending singleton dimensions.
pub(crate) fn canonical_shape(mut shape: Vec<usize>) -> Vec<usize> {
    while shape.len() < 2 {
        shape.insert(0, 1);
    }
    shape
}

/// Determines the output shape resulting from broadcasting two input shapes.
///
/// Follows NumPy broadcasting rules:
/// 1. If the shapes have different numbers of dimensions, prepend 1s to the shorter shape.
/// 2. Compare dimensions element-wise from right to left.
/// 3. Dimensions are compatible if they are equal, or one of them is 1.
pub fn broadcast_shapes(shape_a: &[usize], shape_b: &[usize]) -> Result<Vec<usize>, NnKitError> {
    let rank_a = shape_a.len();
    let rank_b = shape_b.len();
    let max_rank = max(rank_a, rank_b);
    let mut result_shape = vec![0; max_rank];

    for i in 0..max_rank {
        let dim_a = shape_a.get(rank_a.wrapping_sub(1 + i)).copied().unwrap_or(1);
        let dim_b = shape_b.get(rank_b.wrapping_sub(1 + i)).copied().unwrap_or(1);

        result_shape[max_rank - 1 - i] = if dim_a == dim_b || dim_b == 1 {
            dim_a
        } else if dim_a == 1 {
            dim_b
        } else {
            return Err(NnKitError::BroadcastError {
                shape1: shape_a.to_vec(),
                shape2: shape_b.to_vec(),
            });
        };
    }
    Ok(result_shape)
}

/// Converts a linear row-major index into multi-dimensional coordinates.
pub fn index_to_coord(index: usize, shape: &[usize]) -> Vec<usize> {
    let mut coord = vec![0; shape.len()];
    let mut current_index = index;
    for i in (0..shape.len()).rev() {
        if shape[i] == 0 {
            continue;
        }
        coord[i] = current_index % shape[i];
        current_index /= shape[i];
    }
    coord
}

/// Maps coordinates in a broadcast output back to a linear index in one of its inputs.
pub fn coord_to_index_broadcasted(
    target_coord: &[usize],
    original_shape: &[usize],
    original_strides: &[usize],
) -> usize {
    let rank_diff = target_coord.len().saturating_sub(original_shape.len());
    let mut index = 0;
    for i in 0..original_shape.len() {
        // A size-1 dimension was stretched, so it is always read at 0
        let effective_coord = if original_shape[i] == 1 {
            0
        } else {
            target_coord[rank_diff + i]
        };
        index += effective_coord * original_strides[i];
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculate_strides_simple() {
        assert_eq!(calculate_strides(&[2, 3]), vec![3, 1]);
        assert_eq!(calculate_strides(&[2, 2, 2]), vec![4, 2, 1]);
        assert_eq!(calculate_strides(&[]), Vec::<usize>::new());
    }

    #[test]
    fn test_canonical_shape() {
        assert_eq!(canonical_shape(vec![]), vec![1, 1]);
        assert_eq!(canonical_shape(vec![3]), vec![1, 3]);
        assert_eq!(canonical_shape(vec![2, 3]), vec![2, 3]);
        assert_eq!(canonical_shape(vec![2, 3, 4]), vec![2, 3, 4]);
    }

    #[test]
    fn test_broadcast_shapes() {
        assert_eq!(broadcast_shapes(&[4, 3], &[1, 3]).unwrap(), vec![4, 3]);
        assert_eq!(broadcast_shapes(&[4, 3], &[3]).unwrap(), vec![4, 3]);
        assert_eq!(broadcast_shapes(&[4, 1], &[1, 5]).unwrap(), vec![4, 5]);
        assert!(matches!(
            broadcast_shapes(&[4, 3], &[2, 3]),
            Err(NnKitError::BroadcastError { .. })
        ));
    }

    #[test]
    fn test_index_coord_round_trip() {
        let shape = [2, 3, 4];
        assert_eq!(index_to_coord(0, &shape), vec![0, 0, 0]);
        assert_eq!(index_to_coord(5, &shape), vec![0, 1, 1]);
        assert_eq!(index_to_coord(23, &shape), vec![1, 2, 3]);
    }

    #[test]
    fn test_coord_to_index_broadcasted() {
        // [1, 3] broadcast into [4, 3]: every row reads the single stored row.
        let strides = calculate_strides(&[1, 3]);
        assert_eq!(coord_to_index_broadcasted(&[2, 1], &[1, 3], &strides), 1);
        assert_eq!(coord_to_index_broadcasted(&[3, 2], &[1, 3], &strides), 2);
    }
}

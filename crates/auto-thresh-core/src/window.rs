use serde::{Deserialize, Serialize};

use crate::ThresholdError;

/// Footprint of a local neighbourhood, either one odd extent applied to
/// every axis or one odd extent per axis.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WindowShape {
    Scalar(usize),
    PerAxis(Vec<usize>),
}

impl WindowShape {
    /// Expand to one extent per axis, validating oddness and length.
    pub fn resolve(&self, ndim: usize) -> Result<Vec<usize>, ThresholdError> {
        let extents = match self {
            WindowShape::Scalar(size) => vec![*size; ndim],
            WindowShape::PerAxis(sizes) => {
                if sizes.len() != ndim {
                    return Err(ThresholdError::WindowDimensionMismatch {
                        got: sizes.len(),
                        ndim,
                    });
                }
                sizes.clone()
            }
        };
        for (axis, &size) in extents.iter().enumerate() {
            if size % 2 == 0 {
                return Err(ThresholdError::EvenWindow { axis, size });
            }
        }
        Ok(extents)
    }
}

impl From<usize> for WindowShape {
    fn from(size: usize) -> Self {
        WindowShape::Scalar(size)
    }
}

impl From<Vec<usize>> for WindowShape {
    fn from(sizes: Vec<usize>) -> Self {
        WindowShape::PerAxis(sizes)
    }
}

impl From<&[usize]> for WindowShape {
    fn from(sizes: &[usize]) -> Self {
        WindowShape::PerAxis(sizes.to_vec())
    }
}

impl<const N: usize> From<[usize; N]> for WindowShape {
    fn from(sizes: [usize; N]) -> Self {
        WindowShape::PerAxis(sizes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_broadcasts_to_every_axis() {
        let shape = WindowShape::from(5);
        assert_eq!(shape.resolve(3).unwrap(), vec![5, 5, 5]);
    }

    #[test]
    fn per_axis_extents_pass_through() {
        let shape = WindowShape::from(vec![3, 7]);
        assert_eq!(shape.resolve(2).unwrap(), vec![3, 7]);
    }

    #[test]
    fn length_mismatch_is_rejected() {
        let shape = WindowShape::from(vec![3, 5, 7]);
        assert_eq!(
            shape.resolve(2),
            Err(ThresholdError::WindowDimensionMismatch { got: 3, ndim: 2 })
        );
    }

    #[test]
    fn even_extents_are_rejected_with_axis() {
        let shape = WindowShape::from(vec![3, 4]);
        assert_eq!(
            shape.resolve(2),
            Err(ThresholdError::EvenWindow { axis: 1, size: 4 })
        );
        let scalar = WindowShape::from(2);
        assert_eq!(
            scalar.resolve(1),
            Err(ThresholdError::EvenWindow { axis: 0, size: 2 })
        );
    }
}

/// An error type for the algebra module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum AlgebraError {
    /// Error when a flat matrix buffer does not hold exactly 16 elements.
    #[error("Matrix buffer length ({0}) does not match 16 elements")]
    InvalidMatrixLength(usize),
}

/// A bit pattern that does not decode to any variant of the enum it was
/// handed to.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("unknown variant: {bits}")]
pub struct UnknownVariant<T: core::fmt::Debug + core::fmt::Display> {
    pub bits: T,
}

impl<T> UnknownVariant<T> {
    #[must_use]
    pub const fn new(bits: T) -> Self {
        Self { bits }
    }
}

/// Errors that can occur while deserializing a [`SnowflakeId`].
///
/// [`SnowflakeId`]: crate::SnowflakeId
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum SerdeError {
    /// The integer sets the reserved top bit, so it cannot be an ID produced
    /// by a generator.
    #[error("{raw} is not a valid snowflake id: reserved bit is set")]
    DecodeOverflow {
        /// The rejected integer.
        raw: u64,
    },
}

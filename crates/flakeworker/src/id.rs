use core::fmt;

/// A 63-bit Snowflake ID stored in a `u64`.
///
/// - 1 bit reserved (always zero, so the value also fits an `i64`)
/// - 41 bits timestamp (ms since the generator's epoch)
/// - 5 bits datacenter ID
/// - 5 bits worker ID
/// - 12 bits sequence
///
/// ```text
///  Bit Index:  63           63 62            22 21          17 16      12 11             0
///              +--------------+----------------+--------------+----------+---------------+
///  Field:      | reserved (1) | timestamp (41) | datacenter(5)| worker(5)| sequence (12) |
///              +--------------+----------------+--------------+----------+---------------+
///              |<------------------- MSB ---------- 64 bits --------- LSB ------------->|
/// ```
///
/// Ordering on `SnowflakeId` is ordering on the raw integer, so IDs sort by
/// timestamp first, then node, then sequence.
///
/// # Example
///
/// ```
/// use flakeworker::SnowflakeId;
///
/// let id = SnowflakeId::from_components(5, 10, 20, 1);
/// assert_eq!(id.timestamp(), 5);
/// assert_eq!(id.datacenter_id(), 10);
/// assert_eq!(id.worker_id(), 20);
/// assert_eq!(id.sequence(), 1);
/// assert_eq!(id.to_raw(), (5 << 22) | (10 << 17) | (20 << 12) | 1);
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SnowflakeId {
    id: u64,
}

impl SnowflakeId {
    /// Width of the timestamp field.
    pub const TIMESTAMP_BITS: u64 = 41;
    /// Width of the datacenter ID field.
    pub const DATACENTER_ID_BITS: u64 = 5;
    /// Width of the worker ID field.
    pub const WORKER_ID_BITS: u64 = 5;
    /// Width of the sequence field.
    pub const SEQUENCE_BITS: u64 = 12;

    /// Bitmask for the 41-bit timestamp field. Occupies bits 22 through 62.
    pub const TIMESTAMP_MASK: u64 = (1 << Self::TIMESTAMP_BITS) - 1;

    /// Bitmask for the 5-bit datacenter ID field. Occupies bits 17 through 21.
    pub const DATACENTER_ID_MASK: u64 = (1 << Self::DATACENTER_ID_BITS) - 1;

    /// Bitmask for the 5-bit worker ID field. Occupies bits 12 through 16.
    pub const WORKER_ID_MASK: u64 = (1 << Self::WORKER_ID_BITS) - 1;

    /// Bitmask for the 12-bit sequence field. Occupies bits 0 through 11.
    pub const SEQUENCE_MASK: u64 = (1 << Self::SEQUENCE_BITS) - 1;

    /// Number of bits to shift the timestamp to its position (bit 22).
    pub const TIMESTAMP_SHIFT: u64 =
        Self::DATACENTER_ID_SHIFT + Self::DATACENTER_ID_BITS;

    /// Number of bits to shift the datacenter ID to its position (bit 17).
    pub const DATACENTER_ID_SHIFT: u64 = Self::WORKER_ID_SHIFT + Self::WORKER_ID_BITS;

    /// Number of bits to shift the worker ID to its position (bit 12).
    pub const WORKER_ID_SHIFT: u64 = Self::SEQUENCE_SHIFT + Self::SEQUENCE_BITS;

    /// Number of bits to shift the sequence field (bit 0).
    pub const SEQUENCE_SHIFT: u64 = 0;

    /// Largest timestamp offset the layout can hold (~69 years of millis).
    pub const MAX_TIMESTAMP: u64 = Self::TIMESTAMP_MASK;
    /// Largest valid datacenter ID (31).
    pub const MAX_DATACENTER_ID: u64 = Self::DATACENTER_ID_MASK;
    /// Largest valid worker ID (31).
    pub const MAX_WORKER_ID: u64 = Self::WORKER_ID_MASK;
    /// Largest sequence value (4095); 4096 IDs fit in one millisecond.
    pub const MAX_SEQUENCE: u64 = Self::SEQUENCE_MASK;

    const RESERVED_MASK: u64 = !((Self::TIMESTAMP_MASK << Self::TIMESTAMP_SHIFT)
        | (Self::DATACENTER_ID_MASK << Self::DATACENTER_ID_SHIFT)
        | (Self::WORKER_ID_MASK << Self::WORKER_ID_SHIFT)
        | Self::SEQUENCE_MASK);

    /// Packs the four fields into an ID.
    ///
    /// Each field is masked to its width, so an out-of-range value can never
    /// bleed into a neighbouring field. Generators validate their inputs
    /// beforehand; the mask is the last line.
    pub const fn from_components(
        timestamp: u64,
        datacenter_id: u64,
        worker_id: u64,
        sequence: u64,
    ) -> Self {
        let timestamp = (timestamp & Self::TIMESTAMP_MASK) << Self::TIMESTAMP_SHIFT;
        let datacenter_id =
            (datacenter_id & Self::DATACENTER_ID_MASK) << Self::DATACENTER_ID_SHIFT;
        let worker_id = (worker_id & Self::WORKER_ID_MASK) << Self::WORKER_ID_SHIFT;
        let sequence = (sequence & Self::SEQUENCE_MASK) << Self::SEQUENCE_SHIFT;
        Self {
            id: timestamp | datacenter_id | worker_id | sequence,
        }
    }

    /// Wraps a raw value without validation. See [`Self::is_valid`].
    pub const fn from_raw(raw: u64) -> Self {
        Self { id: raw }
    }

    /// Returns the packed integer.
    pub const fn to_raw(&self) -> u64 {
        self.id
    }

    /// Returns the packed integer as an `i64`.
    ///
    /// Lossless for any valid ID since the reserved top bit is zero.
    pub const fn to_i64(&self) -> i64 {
        (self.id & !Self::RESERVED_MASK) as i64
    }

    /// Returns `true` if the reserved top bit is clear.
    pub const fn is_valid(&self) -> bool {
        self.id & Self::RESERVED_MASK == 0
    }

    /// Extracts the timestamp (ms since the epoch) from the packed ID.
    pub const fn timestamp(&self) -> u64 {
        (self.id >> Self::TIMESTAMP_SHIFT) & Self::TIMESTAMP_MASK
    }

    /// Extracts the datacenter ID from the packed ID.
    pub const fn datacenter_id(&self) -> u64 {
        (self.id >> Self::DATACENTER_ID_SHIFT) & Self::DATACENTER_ID_MASK
    }

    /// Extracts the worker ID from the packed ID.
    pub const fn worker_id(&self) -> u64 {
        (self.id >> Self::WORKER_ID_SHIFT) & Self::WORKER_ID_MASK
    }

    /// Extracts the sequence number from the packed ID.
    pub const fn sequence(&self) -> u64 {
        (self.id >> Self::SEQUENCE_SHIFT) & Self::SEQUENCE_MASK
    }

    /// Converts the timestamp back to Unix milliseconds given the epoch the
    /// ID was generated against.
    pub const fn unix_millis(&self, epoch: u64) -> u64 {
        epoch + self.timestamp()
    }

    /// Returns the ID as a zero-padded 19-digit string, which sorts
    /// lexicographically in the same order as the integers.
    pub fn to_padded_string(&self) -> String {
        format!("{:019}", self.id)
    }

    /// Returns true if the sequence can be incremented within this
    /// millisecond.
    pub const fn has_sequence_room(&self) -> bool {
        self.sequence() < Self::MAX_SEQUENCE
    }

    /// Returns a new ID with the sequence incremented.
    pub const fn increment_sequence(&self) -> Self {
        Self::from_components(
            self.timestamp(),
            self.datacenter_id(),
            self.worker_id(),
            self.sequence() + 1,
        )
    }

    /// Returns a new ID for a newer timestamp with the sequence reset to zero.
    pub const fn rollover_to_timestamp(&self, timestamp: u64) -> Self {
        Self::from_components(timestamp, self.datacenter_id(), self.worker_id(), 0)
    }
}

impl From<SnowflakeId> for u64 {
    fn from(id: SnowflakeId) -> Self {
        id.to_raw()
    }
}

impl fmt::Display for SnowflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl fmt::Debug for SnowflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnowflakeId")
            .field("id", &format_args!("{} (0x{:016x})", self.id, self.id))
            .field("timestamp", &self.timestamp())
            .field("datacenter_id", &self.datacenter_id())
            .field("worker_id", &self.worker_id())
            .field("sequence", &self.sequence())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_matches_documented_shifts() {
        assert_eq!(SnowflakeId::TIMESTAMP_SHIFT, 22);
        assert_eq!(SnowflakeId::DATACENTER_ID_SHIFT, 17);
        assert_eq!(SnowflakeId::WORKER_ID_SHIFT, 12);
        assert_eq!(SnowflakeId::MAX_DATACENTER_ID, 31);
        assert_eq!(SnowflakeId::MAX_WORKER_ID, 31);
        assert_eq!(SnowflakeId::MAX_SEQUENCE, 4095);
        assert_eq!(SnowflakeId::RESERVED_MASK, 1 << 63);
    }

    #[test]
    fn max_fields_fill_low_63_bits() {
        let id = SnowflakeId::from_components(
            SnowflakeId::MAX_TIMESTAMP,
            SnowflakeId::MAX_DATACENTER_ID,
            SnowflakeId::MAX_WORKER_ID,
            SnowflakeId::MAX_SEQUENCE,
        );
        assert_eq!(id.to_raw(), i64::MAX as u64);
        assert_eq!(id.to_i64(), i64::MAX);
        assert!(id.is_valid());
    }

    #[test]
    fn oversized_fields_are_masked() {
        let id = SnowflakeId::from_components(0, 32, 33, 4096);
        assert_eq!(id.datacenter_id(), 0);
        assert_eq!(id.worker_id(), 1);
        assert_eq!(id.sequence(), 0);
        assert_eq!(id.timestamp(), 0);
    }

    #[test]
    fn reserved_bit_is_invalid() {
        assert!(!SnowflakeId::from_raw(u64::MAX).is_valid());
        assert!(SnowflakeId::from_raw(i64::MAX as u64).is_valid());
    }

    #[test]
    fn transitions() {
        let id = SnowflakeId::from_components(7, 3, 4, 0);
        let next = id.increment_sequence();
        assert_eq!(next.sequence(), 1);
        assert_eq!(next.timestamp(), 7);
        assert!(next > id);

        let full = SnowflakeId::from_components(7, 3, 4, SnowflakeId::MAX_SEQUENCE);
        assert!(!full.has_sequence_room());
        let rolled = full.rollover_to_timestamp(8);
        assert_eq!(rolled.timestamp(), 8);
        assert_eq!(rolled.sequence(), 0);
        assert_eq!(rolled.datacenter_id(), 3);
        assert_eq!(rolled.worker_id(), 4);
        assert!(rolled > full);
    }

    #[test]
    fn formatting() {
        let id = SnowflakeId::from_components(5, 10, 20, 1);
        assert_eq!(id.to_string(), id.to_raw().to_string());
        assert_eq!(id.to_padded_string().len(), 19);
        assert_eq!(id.unix_millis(1_000), 1_005);
        let debug = format!("{id:?}");
        assert!(debug.contains("datacenter_id: 10"));
        assert!(debug.contains("worker_id: 20"));
    }
}

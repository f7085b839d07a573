use crate::{ConfigError, DEFAULT_EPOCH, SnowflakeId};

/// A validated node identity plus the epoch its IDs are measured from.
///
/// The pair `(datacenter_id, worker_id)` must be unique across every
/// generator that shares an epoch; assigning it is the job of whatever
/// configuration or coordination layer sits in front of this crate. Fields
/// are fixed once constructed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Node {
    datacenter_id: u64,
    worker_id: u64,
    epoch: u64,
}

impl Node {
    /// Validates and builds a node identity.
    ///
    /// `epoch` is in Unix milliseconds and should lie in the past; with 41
    /// timestamp bits the node can issue IDs for roughly 69 years after it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if either ID is larger than 31.
    ///
    /// # Example
    ///
    /// ```
    /// use flakeworker::{ConfigError, DEFAULT_EPOCH, Node};
    ///
    /// let node = Node::new(10, 20, DEFAULT_EPOCH).unwrap();
    /// assert_eq!(node.worker_id(), 20);
    ///
    /// assert!(matches!(
    ///     Node::new(32, 0, DEFAULT_EPOCH),
    ///     Err(ConfigError::DatacenterIdOutOfRange { datacenter_id: 32, .. })
    /// ));
    /// ```
    pub const fn new(datacenter_id: u64, worker_id: u64, epoch: u64) -> Result<Self, ConfigError> {
        if datacenter_id > SnowflakeId::MAX_DATACENTER_ID {
            return Err(ConfigError::DatacenterIdOutOfRange {
                datacenter_id,
                max: SnowflakeId::MAX_DATACENTER_ID,
            });
        }
        if worker_id > SnowflakeId::MAX_WORKER_ID {
            return Err(ConfigError::WorkerIdOutOfRange {
                worker_id,
                max: SnowflakeId::MAX_WORKER_ID,
            });
        }
        Ok(Self {
            datacenter_id,
            worker_id,
            epoch,
        })
    }

    /// The 5-bit datacenter ID.
    pub const fn datacenter_id(&self) -> u64 {
        self.datacenter_id
    }

    /// The 5-bit worker ID.
    pub const fn worker_id(&self) -> u64 {
        self.worker_id
    }

    /// The epoch in Unix milliseconds.
    pub const fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Composes an ID for this node. `timestamp` is relative to the epoch.
    pub(crate) const fn compose(&self, timestamp: u64, sequence: u64) -> SnowflakeId {
        SnowflakeId::from_components(timestamp, self.datacenter_id, self.worker_id, sequence)
    }
}

/// Unvalidated node settings as read from configuration.
///
/// Loaders (static files, environment, a coordination service) fill this in
/// and convert it with [`Node::try_from`]. With the `serde` feature it can be
/// deserialized directly; a missing `epoch` falls back to
/// [`DEFAULT_EPOCH`].
///
/// ```
/// use flakeworker::{Node, NodeConfig};
///
/// let config = NodeConfig {
///     datacenter_id: 1,
///     worker_id: 2,
///     ..NodeConfig::default()
/// };
/// let node = Node::try_from(config).unwrap();
/// assert_eq!(node.datacenter_id(), 1);
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct NodeConfig {
    /// Datacenter ID, 0-31.
    pub datacenter_id: u64,
    /// Worker ID, 0-31.
    pub worker_id: u64,
    /// Epoch in Unix milliseconds.
    #[cfg_attr(feature = "serde", serde(default = "default_epoch"))]
    pub epoch: u64,
}

#[cfg(feature = "serde")]
const fn default_epoch() -> u64 {
    DEFAULT_EPOCH
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            datacenter_id: 0,
            worker_id: 0,
            epoch: DEFAULT_EPOCH,
        }
    }
}

impl NodeConfig {
    /// Checks the settings without consuming them.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if either ID is out of range.
    pub const fn validate(&self) -> Result<Node, ConfigError> {
        Node::new(self.datacenter_id, self.worker_id, self.epoch)
    }
}

impl TryFrom<NodeConfig> for Node {
    type Error = ConfigError;

    fn try_from(config: NodeConfig) -> Result<Self, Self::Error> {
        config.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_every_five_bit_pair() {
        for datacenter_id in 0..=31 {
            for worker_id in 0..=31 {
                let node = Node::new(datacenter_id, worker_id, DEFAULT_EPOCH).unwrap();
                assert_eq!(node.datacenter_id(), datacenter_id);
                assert_eq!(node.worker_id(), worker_id);
                assert_eq!(node.epoch(), DEFAULT_EPOCH);
            }
        }
    }

    #[test]
    fn rejects_out_of_range_ids() {
        for bad in [32, 33, 1_000, u64::MAX] {
            assert_eq!(
                Node::new(bad, 0, DEFAULT_EPOCH),
                Err(ConfigError::DatacenterIdOutOfRange {
                    datacenter_id: bad,
                    max: 31
                })
            );
            assert_eq!(
                Node::new(0, bad, DEFAULT_EPOCH),
                Err(ConfigError::WorkerIdOutOfRange {
                    worker_id: bad,
                    max: 31
                })
            );
        }
        // datacenter is checked first
        assert!(matches!(
            Node::new(40, 40, DEFAULT_EPOCH),
            Err(ConfigError::DatacenterIdOutOfRange { .. })
        ));
    }

    #[test]
    fn config_converts_to_node() {
        let config = NodeConfig {
            datacenter_id: 31,
            worker_id: 0,
            epoch: 7,
        };
        let node = Node::try_from(config).unwrap();
        assert_eq!(node.epoch(), 7);

        let bad = NodeConfig {
            worker_id: 32,
            ..NodeConfig::default()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn compose_places_identity() {
        let node = Node::new(10, 20, 0).unwrap();
        let id = node.compose(5, 1);
        assert_eq!(id, SnowflakeId::from_components(5, 10, 20, 1));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn config_deserializes_with_default_epoch() {
        let config: NodeConfig =
            serde_json::from_str(r#"{"datacenter_id":3,"worker_id":4}"#).unwrap();
        assert_eq!(config.epoch, DEFAULT_EPOCH);
        assert_eq!(config.validate().unwrap().worker_id(), 4);
    }
}

pub mod as_native {
    //! Serialize a [`SnowflakeId`] as its integer value.
    //!
    //! ```
    //! use flakeworker::{SnowflakeId, as_native};
    //! use serde::{Deserialize, Serialize};
    //!
    //! #[derive(Serialize, Deserialize)]
    //! struct Event {
    //!     #[serde(with = "as_native")]
    //!     id: SnowflakeId,
    //! }
    //! ```
    //!
    //! [`SnowflakeId`]: crate::SnowflakeId
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use crate::{SerdeError, SnowflakeId};

    /// Serialize an ID as its native integer representation.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying serializer fails.
    pub fn serialize<S>(id: &SnowflakeId, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        id.to_raw().serialize(s)
    }

    /// Deserialize an ID from its native integer representation.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The underlying deserializer fails
    /// - The integer sets the reserved top bit
    pub fn deserialize<'de, D>(d: D) -> Result<SnowflakeId, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = u64::deserialize(d)?;
        let id = SnowflakeId::from_raw(raw);
        if !id.is_valid() {
            return Err(serde::de::Error::custom(SerdeError::DecodeOverflow { raw }));
        }
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SerdeError, SnowflakeId};
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    #[derive(PartialEq, Eq, Debug, Serialize, Deserialize)]
    struct Row {
        #[serde(with = "as_native")]
        event_id: SnowflakeId,
    }

    #[test]
    fn native_roundtrip() {
        let row = Row {
            event_id: SnowflakeId::from_components(5, 10, 20, 1),
        };

        let json = serde_json::to_string(&row).expect("serialize");
        assert_eq!(json, format!(r#"{{"event_id":{}}}"#, row.event_id.to_raw()));
        let back: Row = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, row);
    }

    #[test]
    fn native_decode_overflow() {
        let json = json!({ "event_id": u64::MAX });
        let err = serde_json::from_value::<Row>(json).expect_err("should fail");
        assert_eq!(
            err.to_string(),
            SerdeError::DecodeOverflow { raw: u64::MAX }.to_string()
        );
    }
}

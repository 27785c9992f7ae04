use std::fmt;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StopKind {
    Pickup,
    Delivery,
}

impl fmt::Display for StopKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopKind::Pickup => f.write_str("Pickup"),
            StopKind::Delivery => f.write_str("Delivery"),
        }
    }
}

/// 1 to 3. Carried for display only, nothing orders by it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(into = "u8")]
pub struct Priority(u8);

impl Priority {
    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Priority {
    type Error = StopFormError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1..=3 => Ok(Priority(value)),
            _ => Err(StopFormError::InvalidPriority(value)),
        }
    }
}

impl From<Priority> for u8 {
    fn from(value: Priority) -> Self {
        value.0
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Stop {
    pub kind: StopKind,
    pub address: String,
    #[serde(serialize_with = "serialize_hh_mm")]
    pub scheduled_time: NaiveTime,
    pub priority: Priority,
    pub comment: Option<String>,
}

impl Stop {
    pub fn formatted_time(&self) -> String {
        self.scheduled_time.format(TIME_FORMAT).to_string()
    }
}

const TIME_FORMAT: &str = "%H:%M";

fn serialize_hh_mm<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_str(&time.format(TIME_FORMAT))
}

/// Fields as posted by the add form.
#[derive(Clone, Debug, Deserialize)]
pub struct StopForm {
    pub kind: StopKind,
    pub time: String,
    pub priority: u8,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub comment: String,
}

impl TryFrom<StopForm> for Stop {
    type Error = StopFormError;

    fn try_from(form: StopForm) -> Result<Self, Self::Error> {
        let address = form.address.trim();
        if address.is_empty() {
            return Err(StopFormError::EmptyAddress);
        }

        // browsers send seconds too when the time input has a step below a minute
        let time = form.time.trim();
        let scheduled_time = NaiveTime::parse_from_str(time, TIME_FORMAT)
            .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M:%S"))
            .map_err(|source| StopFormError::InvalidTime {
                source,
                time: form.time.clone(),
            })?;

        let comment = form.comment.trim();

        Ok(Stop {
            kind: form.kind,
            address: address.to_string(),
            scheduled_time,
            priority: form.priority.try_into()?,
            comment: (!comment.is_empty()).then(|| comment.to_string()),
        })
    }
}

#[derive(thiserror::Error, Debug)]
pub enum StopFormError {
    #[error("the address is empty")]
    EmptyAddress,

    #[error("couldn't parse time {time:?}")]
    InvalidTime {
        source: chrono::ParseError,
        time: String,
    },

    #[error("priority must be 1, 2 or 3, got {0}")]
    InvalidPriority(u8),
}

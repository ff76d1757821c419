use std::str::FromStr;

use serde::Deserialize;

use crate::model::Instrument;

/// One subscription of the streaming service. Ids grow with every switch so
/// frames received under an older subscription can be told apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subscription {
    pub id: u64,
    pub instrument: Instrument,
}

impl Subscription {
    pub fn channel(&self) -> String {
        format!("{}@ticker", self.instrument.symbol())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Subscribe(Subscription),
}

/// Raw text frame tagged with the subscription it arrived under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub subscription: u64,
    pub text: String,
}

/// 24h rolling window ticker frame of the `<symbol>@ticker` stream.
/// Only the fields the tracker shows are kept, the rest are ignored.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Ticker {
    #[serde(rename = "p", with = "decimal_string")]
    pub price_change: f64,
    #[serde(rename = "P", with = "decimal_string")]
    pub price_change_percent: f64,
    #[serde(rename = "c")]
    pub close: String,
    #[serde(rename = "h")]
    pub high: String,
    #[serde(rename = "l")]
    pub low: String,
    #[serde(rename = "q")]
    pub quote_volume: String,
}

impl FromStr for Ticker {
    type Err = serde_json::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_str(s)
    }
}

mod decimal_string {
    use serde::{self, Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where D: Deserializer<'de> {
        let s = String::deserialize(deserializer)?;
        s.trim().parse().map_err(serde::de::Error::custom)
    }
}

use std::str::FromStr;

use async_channel::{Receiver, RecvError, SendError, Sender};
use strum::{EnumIter, IntoEnumIterator};

pub type DateTime = chrono::DateTime<chrono::FixedOffset>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Instrument {
    Bitcoin,
    Ethereum,
    BinanceCoin,
    Cardano,
    Ripple,
    Polkadot,
}

impl Instrument {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Bitcoin => "Bitcoin (BTC)",
            Self::Ethereum => "Ethereum (ETH)",
            Self::BinanceCoin => "Binance Coin (BNB)",
            Self::Cardano => "Cardano (ADA)",
            Self::Ripple => "Ripple (XRP)",
            Self::Polkadot => "Polkadot (DOT)",
        }
    }

    /// Exchange channel identifier, lowercase as the stream expects it.
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Bitcoin => "btcusdt",
            Self::Ethereum => "ethusdt",
            Self::BinanceCoin => "bnbusdt",
            Self::Cardano => "adausdt",
            Self::Ripple => "xrpusdt",
            Self::Polkadot => "dotusdt",
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Bitcoin => "BTC",
            Self::Ethereum => "ETH",
            Self::BinanceCoin => "BNB",
            Self::Cardano => "ADA",
            Self::Ripple => "XRP",
            Self::Polkadot => "DOT",
        }
    }

    /// Looks an instrument up by symbol (`ethusdt`) or code (`eth`), ignoring case.
    pub fn find(query: &str) -> Option<Self> {
        let query = query.trim();
        Self::iter().find(|i| i.symbol().eq_ignore_ascii_case(query) || i.code().eq_ignore_ascii_case(query))
    }
}

impl Default for Instrument {
    fn default() -> Self {
        Self::Bitcoin
    }
}

/// Answer of a platform permission prompt (calendar, location).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
}

impl FromStr for Permission {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "granted" => Ok(Self::Granted),
            "denied" => Ok(Self::Denied),
            other => Err(format!("unknown permission: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("service channel is closed")]
pub struct ChannelStopped;

impl<T> From<SendError<T>> for ChannelStopped {
    fn from(_: SendError<T>) -> Self {
        Self
    }
}

impl From<RecvError> for ChannelStopped {
    fn from(_: RecvError) -> Self {
        Self
    }
}

/// Client side of a background service: requests go in, responses come out.
pub struct ServiceHandle<Req, Resp> {
    sender: Sender<Req>,
    receiver: Receiver<Resp>,
}

impl<Req, Resp> ServiceHandle<Req, Resp> {
    pub fn new(sender: Sender<Req>, receiver: Receiver<Resp>) -> Self {
        Self { sender, receiver }
    }
    pub async fn send(&self, request: Req) -> Result<(), ChannelStopped> {
        self.sender.send(request).await?;
        Ok(())
    }
    pub async fn recv(&self) -> Result<Resp, ChannelStopped> {
        Ok(self.receiver.recv().await?)
    }
}

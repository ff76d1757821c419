use crate::model::Instrument;
use crate::streaming::entities::{Subscription, Ticker};

pub const PLACEHOLDER: &str = "--";

#[derive(Debug, Clone, PartialEq)]
pub struct TickerSnapshot {
    pub price_change: f64,
    pub price_change_percent: f64,
    pub close: String,
    pub high: String,
    pub low: String,
    pub quote_volume: String,
}

impl From<Ticker> for TickerSnapshot {
    fn from(t: Ticker) -> Self {
        Self {
            price_change: t.price_change,
            price_change_percent: t.price_change_percent,
            close: t.close,
            high: t.high,
            low: t.low,
            quote_volume: t.quote_volume,
        }
    }
}

impl TickerSnapshot {
    pub fn price(&self) -> String {
        format_price(&self.close)
    }

    pub fn change(&self) -> String {
        format!(
            "{} {} ({} {}%)",
            sign(self.price_change),
            self.price_change.abs(),
            sign(self.price_change_percent),
            self.price_change_percent.abs(),
        )
    }
}

/// `+` for positive, `-` for negative, nothing for zero (either sign) and NaN.
pub fn sign(value: f64) -> &'static str {
    if value > 0.0 {
        "+"
    } else if value < 0.0 {
        "-"
    } else {
        ""
    }
}

pub fn format_price(close: &str) -> String {
    match close.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => format!("R$ {:.2}", v),
        _ => format!("R$ {}", PLACEHOLDER),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Update {
    Applied,
    Stale,
    Malformed,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown instrument: {0}")]
pub struct UnknownInstrument(pub String);

pub struct TickerViewModel {
    selected: Instrument,
    subscription: u64,
    snapshot: Option<TickerSnapshot>,
}

impl TickerViewModel {
    pub fn new(selected: Instrument) -> Self {
        Self { selected, subscription: 0, snapshot: None }
    }

    pub fn selected(&self) -> Instrument {
        self.selected
    }

    pub fn snapshot(&self) -> Option<&TickerSnapshot> {
        self.snapshot.as_ref()
    }

    /// Subscription for the current selection, used to open the first stream.
    pub fn subscription(&self) -> Subscription {
        Subscription { id: self.subscription, instrument: self.selected }
    }

    /// Returns the subscription to open, or `None` when `query` names the
    /// instrument that is already selected.
    pub fn select_instrument(&mut self, query: &str) -> Result<Option<Subscription>, UnknownInstrument> {
        let instrument = Instrument::find(query).ok_or_else(|| UnknownInstrument(query.to_owned()))?;
        if instrument == self.selected {
            return Ok(None);
        }
        self.selected = instrument;
        self.subscription += 1;
        self.snapshot = None;
        Ok(Some(self.subscription()))
    }

    pub fn on_message(&mut self, subscription: u64, raw: &str) -> Update {
        if subscription != self.subscription {
            log::debug!("dropping frame of subscription #{}, current is #{}", subscription, self.subscription);
            return Update::Stale;
        }
        match raw.parse::<Ticker>() {
            Ok(ticker) => {
                self.snapshot = Some(ticker.into());
                Update::Applied
            }
            Err(e) => {
                log::warn!("error on parsing ticker: {} \n {:?}", raw, e);
                Update::Malformed
            }
        }
    }

    /// Display rows in screen order: current price, change, 24h low, 24h high.
    pub fn rows(&self) -> [(&'static str, String); 4] {
        match &self.snapshot {
            Some(s) => [
                ("Current price", s.price()),
                ("Change", s.change()),
                ("24h low", s.low.clone()),
                ("24h high", s.high.clone()),
            ],
            None => [
                ("Current price", format!("R$ {}", PLACEHOLDER)),
                ("Change", PLACEHOLDER.to_owned()),
                ("24h low", PLACEHOLDER.to_owned()),
                ("24h high", PLACEHOLDER.to_owned()),
            ],
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const ETH: &str = r#"{"p":"12.50","P":"0.85","c":"2450.30","h":"2500.00","l":"2400.00","q":"1000000"}"#;
    const BTC: &str = r#"{"p":"-300.10","P":"-0.71","c":"41950.00","h":"42600.00","l":"41700.50","q":"7300000"}"#;

    #[test]
    fn test_sign() {
        assert_eq!(sign(5.0), "+");
        assert_eq!(sign(-5.0), "-");
        assert_eq!(sign(0.0), "");
        assert_eq!(sign(-0.0), "");
        assert_eq!(sign(f64::NAN), "");
    }

    #[test]
    fn test_eth_scenario() {
        let mut vm = TickerViewModel::new(Instrument::default());
        let subscription = vm.select_instrument("ethusdt").unwrap().unwrap();
        assert_eq!(subscription.instrument, Instrument::Ethereum);
        assert_eq!(vm.on_message(subscription.id, ETH), Update::Applied);

        let snapshot = vm.snapshot().unwrap();
        assert_eq!(snapshot.price_change, 12.5);
        assert_eq!(snapshot.price_change_percent, 0.85);
        assert_eq!(snapshot.close, "2450.30");
        assert_eq!(snapshot.high, "2500.00");
        assert_eq!(snapshot.low, "2400.00");
        assert_eq!(snapshot.quote_volume, "1000000");
        assert_eq!(snapshot.price(), "R$ 2450.30");
        assert_eq!(snapshot.change(), "+ 12.5 (+ 0.85%)");
    }

    #[test]
    fn test_negative_and_zero_change() {
        let mut vm = TickerViewModel::new(Instrument::Bitcoin);
        vm.on_message(0, BTC);
        assert_eq!(vm.snapshot().unwrap().change(), "- 300.1 (- 0.71%)");

        vm.on_message(0, r#"{"p":"-0.00","P":"0.000","c":"1","h":"1","l":"1","q":"1"}"#);
        assert_eq!(vm.snapshot().unwrap().change(), " 0 ( 0%)");
    }

    #[test]
    fn test_malformed_keeps_snapshot() {
        let mut vm = TickerViewModel::new(Instrument::Bitcoin);
        assert_eq!(vm.on_message(0, BTC), Update::Applied);
        let before = vm.snapshot().cloned();

        assert_eq!(vm.on_message(0, "{"), Update::Malformed);
        assert_eq!(vm.on_message(0, r#"{"p":"x","P":"1","c":"1","h":"1","l":"1","q":"1"}"#), Update::Malformed);
        assert_eq!(vm.on_message(0, r#"{"p":"1","P":"1"}"#), Update::Malformed);
        assert_eq!(vm.snapshot().cloned(), before);
    }

    #[test]
    fn test_stale_frames_ignored() {
        let mut vm = TickerViewModel::new(Instrument::Bitcoin);
        let old = vm.subscription();
        let new = vm.select_instrument("ETH").unwrap().unwrap();
        assert_ne!(old.id, new.id);

        assert_eq!(vm.on_message(new.id, ETH), Update::Applied);
        let before = vm.snapshot().cloned();
        assert_eq!(vm.on_message(old.id, BTC), Update::Stale);
        assert_eq!(vm.snapshot().cloned(), before);
    }

    #[test]
    fn test_select_is_idempotent() {
        let mut vm = TickerViewModel::new(Instrument::Bitcoin);
        vm.on_message(0, BTC);
        assert_eq!(vm.select_instrument("btcusdt"), Ok(None));
        assert!(vm.snapshot().is_some());
        assert_eq!(vm.subscription().id, 0);

        assert!(vm.select_instrument("dot").unwrap().is_some());
        assert!(vm.snapshot().is_none());
        assert_eq!(vm.select_instrument("doge"), Err(UnknownInstrument("doge".to_owned())));
        assert_eq!(vm.selected(), Instrument::Polkadot);
    }

    #[test]
    fn test_price_placeholder() {
        assert_eq!(format_price("41950"), "R$ 41950.00");
        assert_eq!(format_price("0.126"), "R$ 0.13");
        assert_eq!(format_price("garbage"), "R$ --");
        assert_eq!(format_price(""), "R$ --");

        let mut vm = TickerViewModel::new(Instrument::Cardano);
        assert_eq!(vm.rows()[0].1, "R$ --");
        vm.on_message(0, r#"{"p":"1","P":"1","c":"n/a","h":"1","l":"0.5","q":"1"}"#);
        let rows = vm.rows();
        assert_eq!(rows[0].1, "R$ --");
        assert_eq!(rows[2], ("24h low", "0.5".to_owned()));
        assert_eq!(rows[3], ("24h high", "1".to_owned()));
    }
}

use std::fmt;

use strum::IntoEnumIterator;

use crate::calendar::EventId;
use crate::location::Position;
use crate::model::{DateTime, Instrument};
use crate::streaming::entities::Subscription;

pub enum Event {
    List,
    Select(String),
    Show,
    Title(String),
    ChooseDate,
    Confirm(String),
    Cancel,
    Add,
    Where,
    Help,
    Quit,
    Unknown(String),
}

impl From<&str> for Event {
    fn from(s: &str) -> Self {
        let s = s.trim();
        let (command, arg) = match s.split_once(char::is_whitespace) {
            Some((command, arg)) => (command, arg.trim()),
            None => (s, ""),
        };
        match command {
            "/list" => Self::List,
            "/select" => Self::Select(arg.to_owned()),
            "/show" => Self::Show,
            "/title" => Self::Title(arg.to_owned()),
            "/date" => Self::ChooseDate,
            "/confirm" => Self::Confirm(arg.to_owned()),
            "/cancel" => Self::Cancel,
            "/add" => Self::Add,
            "/where" => Self::Where,
            "/help" => Self::Help,
            "/quit" | "/exit" => Self::Quit,
            _ => Self::Unknown(s.to_owned()),
        }
    }
}

pub type Rows = [(&'static str, String); 4];

pub enum ResponseMessage {
    Dummy,
    Help,
    Subscribe(Subscription),
    Instruments(Instrument),
    Selected(Instrument),
    Ticker(Instrument, Rows),
    Volume(String),
    Draft { title: String, start: DateTime },
    PickerOpened,
    DateConfirmed(DateTime),
    PickerClosed,
    EventAdded(EventId),
    Location(Option<Position>),
    Err(String),
}

const HELP: &str = "\
/list                  instruments
/select <symbol|code>  follow another instrument
/show                  current figures and event draft
/title <text>          event name
/date                  choose the event date
/confirm <date>        YYYY-MM-DD HH:MM or RFC 3339
/cancel                close the date picker
/add                   add the event to the calendar
/where                 location found at startup
/quit";

fn format_date(date: &DateTime) -> String {
    date.format("%Y-%m-%d %H:%M %:z").to_string()
}

impl fmt::Display for ResponseMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ResponseMessage as RM;
        match self {
            RM::Dummy => write!(f, "Nothing to do here, try /help"),
            RM::Help => write!(f, "{}", HELP),
            RM::Subscribe(subscription) => write!(f, "Subscribing to {}", subscription.channel()),
            RM::Instruments(selected) => {
                let lines: Vec<_> = Instrument::iter()
                    .map(|i| {
                        let mark = if i == *selected { '*' } else { ' ' };
                        format!("{} {:<20} {}", mark, i.label(), i.symbol())
                    })
                    .collect();
                write!(f, "{}", lines.join("\n"))
            }
            RM::Selected(instrument) => write!(f, "Following {}", instrument.label()),
            RM::Ticker(instrument, rows) => {
                let rows: Vec<_> = rows.iter().map(|(label, value)| format!("{}: {}", label, value)).collect();
                write!(f, "{} | {}", instrument.label(), rows.join(" | "))
            }
            RM::Volume(volume) => write!(f, "24h quote volume: {}", volume),
            RM::Draft { title, start } => {
                let title: &str = if title.is_empty() { "(no name)" } else { title };
                write!(f, "Event: {} at {}", title, format_date(start))
            }
            RM::PickerOpened => write!(f, "Pick a date with /confirm <date> or /cancel"),
            RM::DateConfirmed(date) => write!(f, "Event date set to {}", format_date(date)),
            RM::PickerClosed => write!(f, "Date unchanged"),
            RM::EventAdded(id) => write!(f, "Event added to the calendar with ID: {}", id),
            RM::Location(Some(position)) => write!(f, "Location: {}", position),
            RM::Location(None) => write!(f, "Location unknown"),
            RM::Err(e) => write!(f, "Oops... {}", e),
        }
    }
}

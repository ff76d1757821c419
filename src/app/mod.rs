pub mod entities;

use async_channel::Sender;
use chrono::Local;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::calendar::{Calendar, JsonCalendar};
use crate::composer::{parse_start, EventComposer, Picker, PickerEvent};
use crate::config::Config;
use crate::location::{self, FixedLocator, Locator, Position};
use crate::model::{ChannelStopped, Instrument};
use crate::streaming::entities::{Request, Response, Subscription};
use crate::streaming::Streaming;
use crate::ticker::{TickerViewModel, Update};
use entities::*;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("terminal: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Stopped(#[from] ChannelStopped),
}

/// All screen state. Changes only through `on_event`, `on_stream` and
/// `set_location`.
pub struct App {
    ticker: TickerViewModel,
    composer: EventComposer,
    calendar: Box<dyn Calendar>,
    location: Option<Position>,
}

impl App {
    pub fn new(calendar: Box<dyn Calendar>) -> Self {
        Self {
            ticker: TickerViewModel::new(Instrument::default()),
            composer: EventComposer::new(Local::now().into()),
            calendar,
            location: None,
        }
    }

    pub fn subscription(&self) -> Subscription {
        self.ticker.subscription()
    }

    pub fn set_location(&mut self, position: Option<Position>) {
        self.location = position;
    }

    pub fn on_stream(&mut self, msg: Response) -> Option<ResponseMessage> {
        match self.ticker.on_message(msg.subscription, &msg.text) {
            Update::Applied => Some(self.ticker_rows()),
            Update::Stale | Update::Malformed => None,
        }
    }

    pub async fn on_event(&mut self, event: Event) -> Vec<ResponseMessage> {
        use Event as E;
        use ResponseMessage as RM;
        match event {
            E::List => vec![RM::Instruments(self.ticker.selected())],
            E::Select(query) => match self.ticker.select_instrument(&query) {
                Ok(Some(subscription)) => vec![RM::Subscribe(subscription), RM::Selected(subscription.instrument)],
                Ok(None) => vec![RM::Selected(self.ticker.selected())],
                Err(e) => vec![RM::Err(e.to_string())],
            },
            E::Show => {
                let mut messages = vec![self.ticker_rows()];
                if let Some(snapshot) = self.ticker.snapshot() {
                    messages.push(RM::Volume(snapshot.quote_volume.clone()));
                }
                messages.push(self.draft());
                messages
            }
            E::Title(title) => {
                self.composer.set_title(title);
                vec![self.draft()]
            }
            E::ChooseDate => {
                self.composer.on_picker(PickerEvent::Open);
                vec![RM::PickerOpened]
            }
            E::Confirm(value) => {
                if self.composer.picker() == Picker::Hidden {
                    return vec![RM::Dummy];
                }
                match parse_start(&value) {
                    Ok(start) => {
                        self.composer.on_picker(PickerEvent::Confirm(start));
                        vec![RM::DateConfirmed(start)]
                    }
                    Err(e) => vec![RM::Err(e.to_string())],
                }
            }
            E::Cancel => {
                if self.composer.picker() == Picker::Hidden {
                    return vec![RM::Dummy];
                }
                self.composer.on_picker(PickerEvent::Cancel);
                vec![RM::PickerClosed]
            }
            E::Add => match self.composer.submit(self.calendar.as_ref()).await {
                Ok(id) => vec![RM::EventAdded(id)],
                Err(e) => {
                    log::error!("error on adding event to calendar: {}", e);
                    vec![RM::Err(format!("the event was not added: {}", e))]
                }
            },
            E::Where => vec![RM::Location(self.location)],
            E::Help => vec![RM::Help],
            E::Quit | E::Unknown(_) => vec![RM::Dummy],
        }
    }

    fn ticker_rows(&self) -> ResponseMessage {
        ResponseMessage::Ticker(self.ticker.selected(), self.ticker.rows())
    }

    fn draft(&self) -> ResponseMessage {
        let draft = self.composer.draft();
        ResponseMessage::Draft { title: draft.title().to_owned(), start: draft.start() }
    }
}

/// One startup lookup handed back to the app loop. A closed loop only gets logged.
async fn report_location(locator: &dyn Locator, sender: Sender<Option<Position>>) {
    let position = location::locate(locator).await;
    if let Err(e) = sender.send(position).await {
        log::debug!("location is not delivered, app is gone: {}", e);
    }
}

pub async fn run(conf: Config) -> Result<(), AppError> {
    let calendar = JsonCalendar::new(&conf.calendar_dir, conf.calendar_access);
    if let Err(e) = calendar.ensure_container(&conf.calendar_container).await {
        log::error!("error on preparing calendar {}: {}", conf.calendar_dir.display(), e);
    }
    let mut app = App::new(Box::new(calendar));

    let streaming = Streaming::start(conf.streaming());
    streaming.send(Request::Subscribe(app.subscription())).await?;

    let (location_sender, location_receiver) = async_channel::bounded(1);
    let locator = FixedLocator::new(conf.position);
    tokio::spawn(async move { report_location(&locator, location_sender).await });

    println!("{}", ResponseMessage::Help);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let event = match line? {
                    Some(line) => Event::from(line.as_str()),
                    None => break,
                };
                if matches!(event, Event::Quit) {
                    break;
                }
                for msg in app.on_event(event).await {
                    if let ResponseMessage::Subscribe(subscription) = &msg {
                        streaming.send(Request::Subscribe(*subscription)).await?;
                    }
                    println!("{}", msg);
                }
            }
            msg = streaming.recv() => {
                if let Some(rows) = app.on_stream(msg?) {
                    println!("{}", rows);
                }
            }
            Ok(position) = location_receiver.recv() => app.set_location(position),
        }
    }
    log::info!("bye");
    Ok(())
}

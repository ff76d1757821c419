pub mod entities;

use std::time::Duration;

use async_channel::{Receiver, Sender};
use futures_util::StreamExt;
use tokio_tungstenite::{connect_async, tungstenite::Message};

use crate::model::{ChannelStopped, ServiceHandle};
use entities::*;

pub struct StreamingConf {
    /// Base websocket uri, the channel name is appended as the last path segment.
    pub uri: String,
    pub reconnect_interval: Duration,
}

/// Keeps one ticker channel open. Drops are retried forever with a fixed delay;
/// a subscribe request replaces the connection right away.
pub struct Streaming {
    conf: StreamingConf,
    sender: Sender<Response>,
    receiver: Receiver<Request>,
}

enum Session {
    Dropped,
    Switched(Subscription),
}

impl Streaming {
    pub fn start(conf: StreamingConf) -> ServiceHandle<Request, Response> {
        let (sender, r) = async_channel::bounded(100);
        let (s, receiver) = async_channel::bounded(100);
        let streaming = Self { conf, sender, receiver };
        tokio::spawn(async move {
            match streaming.run().await {
                Ok(()) => log::error!("Streaming finished without a reason"),
                Err(_) => log::info!("Streaming stopped because channel is closed"),
            };
        });
        ServiceHandle::new(s, r)
    }

    async fn run(self) -> Result<(), ChannelStopped> {
        let Request::Subscribe(mut subscription) = self.receiver.recv().await?;
        loop {
            match self.session(subscription).await? {
                Session::Switched(next) => subscription = next,
                Session::Dropped => {
                    log::warn!(
                        "stream {} dropped, reconnecting in {} ms",
                        subscription.channel(),
                        self.conf.reconnect_interval.as_millis()
                    );
                    tokio::select! {
                        _ = tokio::time::sleep(self.conf.reconnect_interval) => {}
                        request = self.receiver.recv() => {
                            let Request::Subscribe(next) = request?;
                            subscription = next;
                        }
                    }
                }
            }
        }
    }

    async fn session(&self, subscription: Subscription) -> Result<Session, ChannelStopped> {
        let url = format!("{}/{}", self.conf.uri.trim_end_matches('/'), subscription.channel());
        log::info!("connecting to {}", url);
        let mut websocket = match connect_async(url.as_str()).await {
            Ok((websocket, _response)) => websocket,
            Err(e) => {
                log::error!("error on connecting to {}: {}", url, e);
                return Ok(Session::Dropped);
            }
        };
        log::info!("subscribed to {} (#{})", subscription.channel(), subscription.id);
        loop {
            tokio::select! {
                msg = websocket.next() => match msg {
                    Some(Ok(Message::Text(text))) => {
                        log::trace!("frame #{}: {}", subscription.id, text);
                        self.sender.send(Response { subscription: subscription.id, text }).await?;
                    }
                    Some(Ok(Message::Close(frame))) => {
                        log::warn!("stream closed by server: {:?}", frame);
                        return Ok(Session::Dropped);
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        log::error!("error on stream {}: {}", subscription.channel(), e);
                        return Ok(Session::Dropped);
                    }
                    None => return Ok(Session::Dropped),
                },
                request = self.receiver.recv() => {
                    let Request::Subscribe(next) = request?;
                    if let Err(e) = websocket.close(None).await {
                        log::debug!("error on closing {}: {}", subscription.channel(), e);
                    }
                    return Ok(Session::Switched(next));
                }
            }
        }
    }
}

use axum::{
    response::{sse::Event, Sse},
    Router,
};
use futures_core::Stream;
use rand_core::{OsRng, RngCore};
use std::{
    convert::Infallible,
    pin::Pin,
    task::{Context, Poll},
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + 'static>> {
    env_logger::init();

    let router = Router::new().route("/v1/live/sse", axum::handler::get(event_stream));
    let arg = std::env::args().nth(1);
    let listen_uri = arg.as_deref().unwrap_or("0.0.0.0:3000");

    log::info!("Starting server on {}", listen_uri);

    axum::Server::bind(&listen_uri.parse()?)
        .serve(router.into_make_service())
        .await?;

    Ok(())
}

async fn event_stream() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    Sse::new(LiveTiming::default())
}

/// Endless feed shaped like a live timing session.
#[derive(Default)]
pub struct LiveTiming {
    counter: u64,
}

impl Stream for LiveTiming {
    type Item = Result<Event, Infallible>;
    fn poll_next(mut self: Pin<&mut Self>, _: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.counter += 1;
        let lap = self.counter;

        let event = match OsRng.next_u32() % 6 {
            0 => Event::default().event("update").data(
                serde_json::json!({
                    "raceControlMessages": [{ "lap": lap, "message": "TRACK CLEAR" }],
                    "lap": lap,
                })
                .to_string(),
            ),
            1 => Event::default().event("update").data(
                serde_json::json!({
                    "positionData": { "44": { "x": OsRng.next_u32() % 1000, "y": 12, "z": 0 } },
                    "timestamp": lap,
                })
                .to_string(),
            ),
            2 => Event::default().event("initial").data(
                serde_json::json!({
                    "sessionInfo": { "meeting": "Monza", "type": "Race" },
                    "trackStatus": "1",
                })
                .to_string(),
            ),
            3 => Event::default().data("{truncated"),
            4 => Event::default().comment("keep-alive"),
            5 => Event::default().retry(std::time::Duration::from_secs(1)),
            _ => unreachable!(),
        };

        let event = event.id(lap.to_string());
        log::debug!("Returning Event: {:?}", event);
        Poll::Ready(Some(Ok(event)))
    }
}

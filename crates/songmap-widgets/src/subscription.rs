//! Bridge from `std::sync::mpsc` worker channels to iced subscriptions
//!
//! ```ignore
//! fn subscription(&self) -> Subscription<Message> {
//!     mpsc_subscription(self.loader.receiver()).map(Message::Thumbnail)
//! }
//! ```

use std::any::TypeId;
use std::hash::Hash;
use std::sync::mpsc::Receiver;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use iced::advanced::subscription::{self, EventStream, Hasher, Recipe};
use iced::futures::stream::BoxStream;
use iced::Subscription;

/// Poll interval while the channel is empty
const POLL_INTERVAL: Duration = Duration::from_millis(5);

struct MpscRecipe<T> {
    /// Subscription identity: the receiver's address
    id: usize,
    receiver: Arc<Mutex<Receiver<T>>>,
}

impl<T: Send + 'static> Recipe for MpscRecipe<T> {
    type Output = T;

    fn hash(&self, state: &mut Hasher) {
        TypeId::of::<Self>().hash(state);
        self.id.hash(state);
    }

    fn stream(self: Box<Self>, _input: EventStream) -> BoxStream<'static, Self::Output> {
        Box::pin(iced::futures::stream::unfold(self.receiver, |rx| async move {
            loop {
                let next = match rx.lock() {
                    Ok(guard) => guard.try_recv(),
                    // A panicked holder leaves nothing more to deliver
                    Err(_) => return None,
                };
                match next {
                    Ok(item) => return Some((item, rx)),
                    Err(std::sync::mpsc::TryRecvError::Disconnected) => return None,
                    Err(std::sync::mpsc::TryRecvError::Empty) => {
                        tokio::time::sleep(POLL_INTERVAL).await;
                    }
                }
            }
        }))
    }
}

/// Subscription yielding every item sent on `receiver`
///
/// The stream ends once the sending side hangs up and the channel drains.
pub fn mpsc_subscription<T>(receiver: Arc<Mutex<Receiver<T>>>) -> Subscription<T>
where
    T: Send + 'static,
{
    let id = Arc::as_ptr(&receiver) as usize;
    subscription::from_recipe(MpscRecipe { id, receiver })
}

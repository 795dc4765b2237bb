//! # Events Module
//!
//! Progress events for whatever front end drives a run.
//!
//! ## Design
//! The pipeline emits events through a channel; the CLI spinner is one
//! subscriber, a GUI could be another. Runs without a listener use
//! [`null_sender`].
//!
//! ## Example
//! ```rust,ignore
//! let (sender, receiver) = EventChannel::new();
//!
//! std::thread::spawn(move || {
//!     for event in receiver.iter() {
//!         if let Event::Scan(ScanEvent::Progress(p)) = event {
//!             println!("{}: {} files", p.volume, p.files_recorded);
//!         }
//!     }
//! });
//!
//! pipeline.run_with_events(&sender)?;
//! ```

mod channel;
mod types;

pub use channel::{null_sender, EventChannel, EventReceiver, EventSender};
pub use types::*;

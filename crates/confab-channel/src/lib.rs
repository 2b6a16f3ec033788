// SPDX-FileCopyrightText: 2026 Confab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Push-event boundary for the Confab sync engine.
//!
//! [`parse_frame`] validates raw frames into [`PushEvent`]s, [`EventRouter`]
//! dispatches them into the store and its collaborators, and
//! [`ChannelAdapter`] owns the live subscription and receive pipeline.

pub mod adapter;
pub mod events;
pub mod router;

pub use adapter::{AdapterStatus, ChannelAdapter};
pub use events::{parse_frame, PushEvent};
pub use router::{EventRouter, RouteTotals};

// SPDX-FileCopyrightText: 2026 Confab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ordering and identity policy for buffered messages.
//!
//! Pure functions shared by every mutation path of the store. One comparator
//! drives single-message insertion and wholesale sorts alike, so there is no
//! second keying scheme to drift from.

use std::cmp::Ordering;

use confab_core::{Message, StoreMessage};

/// Total order over messages.
///
/// `message_number` wins when both operands carry it; otherwise `created_at`
/// decides. Exact ties fall back to `id` so the order is deterministic.
/// Transitivity holds whenever sequence numbers are assigned monotonically in
/// `created_at` within a conversation, which the server guarantees.
pub fn compare(a: &Message, b: &Message) -> Ordering {
    let primary = match (a.message_number, b.message_number) {
        (Some(x), Some(y)) => x.cmp(&y),
        _ => a.created_at.cmp(&b.created_at),
    };
    primary.then_with(|| a.id.cmp(&b.id))
}

/// Client-correlation identity: the incoming message carries the
/// `client_msg_id` of an optimistic write for the same conversation and role.
///
/// Checked before plain id equality so a confirmed write reconciles with its
/// placeholder even when the placeholder still holds a temporary id.
pub fn correlates(incoming: &Message, existing: &Message) -> bool {
    match (&incoming.client_msg_id, &existing.client_msg_id) {
        (Some(a), Some(b)) => {
            a == b && incoming.chat_id == existing.chat_id && incoming.role == existing.role
        }
        _ => false,
    }
}

/// Lowest-priority identity fallback: an existing *pending* message with the
/// same role, text, and conversation is treated as the same logical message.
///
/// Compatibility shim for optimistic writes that omitted `client_msg_id`; two
/// genuine duplicates inside the pending window would coalesce, so callers
/// should prefer setting `client_msg_id` on every optimistic write.
pub fn content_match(incoming: &Message, existing: &StoreMessage) -> bool {
    existing.pending
        && existing.message.role == incoming.role
        && existing.message.chat_id == incoming.chat_id
        && existing.message.text == incoming.text
}

/// Position at which `incoming` belongs in an already-sorted buffer.
///
/// Inserts after any equal-keyed neighbors, so repeated timestamps keep
/// arrival order.
pub fn insertion_index(buffer: &[StoreMessage], incoming: &Message) -> usize {
    buffer.partition_point(|m| compare(&m.message, incoming) != Ordering::Greater)
}

/// Sorts a buffer wholesale with the canonical comparator. Stable.
pub fn sort_buffer(buffer: &mut [StoreMessage]) {
    buffer.sort_by(|a, b| compare(&a.message, &b.message));
}

/// Whether a buffer is sorted under the canonical comparator.
pub fn is_sorted(buffer: &[StoreMessage]) -> bool {
    buffer
        .windows(2)
        .all(|w| compare(&w[0].message, &w[1].message) != Ordering::Greater)
}

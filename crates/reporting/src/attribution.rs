//! Cost and revenue attribution — per-influencer sums over payouts and
//! influencer-sourced tracking events.

use roi_core::{DateWindow, InfluencerId, Payout, TrackingEvent};
use std::collections::HashMap;

/// Sum `total_payout` per influencer. Payouts carry no date, so no window
/// applies.
pub fn aggregate_cost(payouts: &[Payout]) -> HashMap<InfluencerId, f64> {
    let mut cost = HashMap::new();
    for payout in payouts {
        *cost.entry(payout.influencer_id).or_insert(0.0) += payout.total_payout;
    }
    cost
}

/// Sum revenue per influencer over influencer-sourced events, optionally
/// restricted to `window`. Events without an influencer id are skipped.
pub fn aggregate_revenue(
    events: &[TrackingEvent],
    window: Option<DateWindow>,
) -> HashMap<InfluencerId, f64> {
    let mut revenue = HashMap::new();
    for event in in_window(events, window) {
        if let Some(id) = event.attributed_influencer() {
            *revenue.entry(id).or_insert(0.0) += event.revenue;
        }
    }
    revenue
}

/// Events whose transaction date falls inside `window` (all events when no
/// window is given).
pub fn in_window(
    events: &[TrackingEvent],
    window: Option<DateWindow>,
) -> impl Iterator<Item = &TrackingEvent> {
    events
        .iter()
        .filter(move |e| window.map_or(true, |w| w.contains(e.transaction_date)))
}

//! Proportional distribution of a length among tracks.
//!
//! Tracks with a zero proportion are fixed at their minimum. The rest share
//! what is left after gaps and fixed tracks, in proportion to their weights.
//! A flexible track whose share would fall below its minimum is pinned at the
//! minimum and the scan restarts over the remaining flexible tracks. Shares are
//! rounded half-to-even; the last flexible track takes the remainder, so the
//! allocation is exact whenever at least one flexible track exists.

use tracing::debug;

/// Minimum length and growth weight of one cell along the growth axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Track {
    pub(crate) min: i32,
    pub(crate) proportion: f32,
}

impl Track {
    pub(crate) const fn new(min: i32, proportion: f32) -> Self {
        Self { min, proportion }
    }

    fn is_flexible(&self) -> bool {
        self.proportion != 0.0
    }
}

/// Distribute `total` among `tracks`, separated by `gap`.
///
/// Returns `None` when the flexible tracks' proportions do not sum to a
/// positive number.
pub(crate) fn distribute(tracks: &[Track], total: i32, gap: i32) -> Option<Vec<i32>> {
    let mut lengths: Vec<i32> = tracks.iter().map(|t| t.min).collect();
    let gaps = gap * tracks.len().saturating_sub(1) as i32;

    let mut left = total - gaps;
    let mut flexible = Vec::with_capacity(tracks.len());
    for (i, track) in tracks.iter().enumerate() {
        if track.is_flexible() {
            flexible.push(i);
        } else {
            left -= track.min;
        }
    }

    while !flexible.is_empty() {
        match scan(tracks, &flexible, left)? {
            Scan::Settled(shares) => {
                for (&i, share) in flexible.iter().zip(shares) {
                    lengths[i] = share;
                }
                break;
            }
            Scan::Pinned(pos) => {
                let i = flexible.remove(pos);
                left -= tracks[i].min;
                debug!(track = i, min = tracks[i].min, "flexible track pinned at minimum");
            }
        }
    }

    Some(lengths)
}

enum Scan {
    Settled(Vec<i32>),
    Pinned(usize),
}

/// One pass over the flexible tracks in insertion order.
fn scan(tracks: &[Track], flexible: &[usize], left: i32) -> Option<Scan> {
    let mut p_left: f64 = flexible
        .iter()
        .map(|&i| f64::from(tracks[i].proportion))
        .sum();
    if p_left.is_nan() || p_left <= 0.0 {
        return None;
    }

    let mut remaining = left;
    let mut shares = Vec::with_capacity(flexible.len());
    let last = flexible.len() - 1;

    for (pos, &i) in flexible.iter().enumerate() {
        let track = tracks[i];
        let p = f64::from(track.proportion);
        let share = if pos == last {
            remaining
        } else {
            if p_left <= 0.0 {
                return None;
            }
            share_of(remaining, p, p_left)
        };

        if share < track.min {
            return Some(Scan::Pinned(pos));
        }

        shares.push(share);
        remaining -= share;
        p_left -= p;
    }

    Some(Scan::Settled(shares))
}

fn share_of(remaining: i32, proportion: f64, p_left: f64) -> i32 {
    (f64::from(remaining) * proportion / p_left).round_ties_even() as i32
}

//! # Duration Policy Engine
//!
//! Decides how long each symbol of a superpermutation should sound. Every position
//! receives a *duration class* in `[0, N-1]`; the emitter turns a class into ticks
//! with [`ticks_for_class`], so each class step doubles the note length.
//!
//! ## Policies
//! - [`DurationPolicy::EdgeWeight`] (default) - a note rings longer the sooner a
//!   legal permutation window closes after it.
//! - [`DurationPolicy::FreeSpace`] - a note rings longer the further away its own
//!   symbol recurs on either side.
//! - [`DurationPolicy::Even`] - every note gets the maximum class.
//!
//! ## Prefix override
//! The first `N-1` positions have no full window behind them, so whatever the
//! policy computes there is replaced by `N-1`.
//!
//! ## Clamping
//! Raw classes are computed signed. Edge-weight yields -1 for trailing positions
//! whose forward scan runs off the end of the sequence, and free-space goes
//! negative when a symbol repeats right next to itself. Both clamp to 0, the
//! shortest note.

use crate::sequence::{is_legal_window, SymbolSequence};

/// Exponent offset of the tick formula: class `c` lasts `2^(c + 10 - N)` ticks.
const TICK_EXPONENT_BASE: i32 = 10;

/// Selectable duration policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DurationPolicy {
    #[default]
    EdgeWeight,
    FreeSpace,
    Even,
}

impl DurationPolicy {
    /// Look a policy up by its command line name.
    ///
    /// Names other than `edge-weight` and `free-space` select [`DurationPolicy::Even`].
    ///
    /// ```
    /// use superperm2midi::DurationPolicy;
    ///
    /// assert_eq!(DurationPolicy::from_name("free-space"), DurationPolicy::FreeSpace);
    /// assert_eq!(DurationPolicy::from_name("staccato"), DurationPolicy::Even);
    /// ```
    pub fn from_name(name: &str) -> Self {
        match name.trim() {
            "edge-weight" => DurationPolicy::EdgeWeight,
            "free-space" => DurationPolicy::FreeSpace,
            "even" => DurationPolicy::Even,
            other => {
                log::debug!("Unknown note length policy '{}', using even", other);
                DurationPolicy::Even
            }
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            DurationPolicy::EdgeWeight => "edge-weight",
            DurationPolicy::FreeSpace => "free-space",
            DurationPolicy::Even => "even",
        }
    }
}

/// Per-symbol duration classes, parallel to a [`SymbolSequence`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DurationAssignment {
    classes: Vec<u8>,
    alphabet_size: usize,
}

impl DurationAssignment {
    pub fn classes(&self) -> &[u8] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Tick length of every note, in sequence order.
    pub fn ticks(&self) -> impl Iterator<Item = u32> + '_ {
        self.classes
            .iter()
            .map(move |&class| ticks_for_class(class, self.alphabet_size))
    }
}

/// Compute the duration class of every symbol under `policy`.
///
/// # Example
/// ```
/// use superperm2midi::{assign_durations, DurationPolicy, SymbolSequence};
///
/// let seq = SymbolSequence::parse("0123012301230").unwrap();
/// let durations = assign_durations(&seq, DurationPolicy::EdgeWeight);
///
/// assert_eq!(durations.len(), 13);
/// assert_eq!(&durations.classes()[..3], &[3, 3, 3]);
/// ```
pub fn assign_durations(sequence: &SymbolSequence, policy: DurationPolicy) -> DurationAssignment {
    let n = sequence.alphabet_size();
    let max_class = (n - 1) as i32;

    let raw: Vec<i32> = match policy {
        DurationPolicy::EdgeWeight => edge_weight(sequence),
        DurationPolicy::FreeSpace => free_space(sequence),
        DurationPolicy::Even => vec![max_class; sequence.len()],
    };

    let classes = raw
        .into_iter()
        .enumerate()
        .map(|(i, class)| {
            if i < n - 1 {
                max_class as u8
            } else {
                class.clamp(0, max_class) as u8
            }
        })
        .collect();

    DurationAssignment {
        classes,
        alphabet_size: n,
    }
}

/// Scan forward from each position for the first legal window that closes within
/// N steps; the sooner it closes, the longer the note.
fn edge_weight(sequence: &SymbolSequence) -> Vec<i32> {
    let n = sequence.alphabet_size();
    let len = sequence.len();

    (0..len)
        .map(|i| {
            let weight = (i + 1..=i + n)
                .position(|end| {
                    end >= n
                        && end < len
                        && sequence.window(end).is_some_and(is_legal_window)
                })
                .unwrap_or(n);
            n as i32 - weight as i32 - 1
        })
        .collect()
}

/// Count the steps on each side of a symbol before it reappears or the sequence
/// ends, looking at most N-1 steps each way.
fn free_space(sequence: &SymbolSequence) -> Vec<i32> {
    let n = sequence.alphabet_size();
    let symbols = sequence.symbols();

    symbols
        .iter()
        .enumerate()
        .map(|(i, &symbol)| {
            let left = (1..n)
                .take_while(|&j| i >= j && symbols[i - j] != symbol)
                .count();
            let right = (1..n)
                .take_while(|&j| symbols.get(i + j).is_some_and(|&s| s != symbol))
                .count();
            (left + right) as i32 - n as i32 + 1
        })
        .collect()
}

/// Length in ticks of a note of the given class: `2^(class + 10 - N)`.
///
/// A negative exponent saturates to a single tick.
pub fn ticks_for_class(class: u8, alphabet_size: usize) -> u32 {
    let exponent = class as i32 + TICK_EXPONENT_BASE - alphabet_size as i32;
    1u32 << exponent.clamp(0, 27)
}

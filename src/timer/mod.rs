//! Advanced 16-bit PWM counters.
//!
//! Two counter groups share one interrupt line each and own four
//! compare/capture channels apiece:
//!
//! - Counter A: channels 1..4, each with a primary and a complementary
//!   output, dead-time insertion, and fault (break) protection.
//! - Counter B: channels 5..8, primary outputs only. Absent on chips that
//!   expose four channels.
//!
//! Every channel can alternatively serve as a capture input, and adjacent
//! channel pairs can drive their counter as a quadrature encoder.

use crate::time::Hertz;

pub mod advanced_pwm;
pub mod low_level;
pub mod pins;
pub mod regs;

#[cfg(test)]
pub(crate) mod mock;

pub use advanced_pwm::{
    AdvancedPwm, CounterConfig, ExternalTriggerConfig, FaultConfig, OutputConfig, PwmChannel,
};

/// Compare/capture channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    /// Channel 1, counter A.
    Ch1,
    /// Channel 2, counter A.
    Ch2,
    /// Channel 3, counter A.
    Ch3,
    /// Channel 4, counter A.
    Ch4,
    /// Channel 5, counter B.
    Ch5,
    /// Channel 6, counter B.
    Ch6,
    /// Channel 7, counter B.
    Ch7,
    /// Channel 8, counter B.
    Ch8,
}

impl Channel {
    /// Get the channel index (0..7).
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Get the channel for an index (0..7).
    pub fn from_index(index: usize) -> Option<Channel> {
        match index {
            0 => Some(Channel::Ch1),
            1 => Some(Channel::Ch2),
            2 => Some(Channel::Ch3),
            3 => Some(Channel::Ch4),
            4 => Some(Channel::Ch5),
            5 => Some(Channel::Ch6),
            6 => Some(Channel::Ch7),
            7 => Some(Channel::Ch8),
            _ => None,
        }
    }

    /// The counter group this channel belongs to.
    pub fn counter(&self) -> Counter {
        if self.index() < 4 {
            Counter::A
        } else {
            Counter::B
        }
    }

    /// Index within the owning counter group (0..3).
    pub fn local_index(&self) -> usize {
        self.index() % 4
    }

    /// The sibling of this channel within its fixed channel pair.
    ///
    /// Pairs share a counter input: (1,2), (3,4), (5,6), (7,8).
    pub fn paired(&self) -> Channel {
        Channel::from_index(self.index() ^ 1).unwrap()
    }

    /// Whether this channel has a complementary output. Only counter A
    /// channels do.
    pub fn has_complementary(&self) -> bool {
        self.index() < 4
    }
}

/// Counter group identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Counter {
    /// Counter A, owning channels 1..4.
    A,
    /// Counter B, owning channels 5..8.
    B,
}

impl Counter {
    /// Get the counter index (0..1).
    pub fn index(&self) -> usize {
        *self as usize
    }
}

/// Number of compare/capture channels a chip exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChannelCount {
    /// Counter A only, channels 1..4.
    Four,
    /// Both counter groups, channels 1..8.
    Eight,
}

impl ChannelCount {
    /// Number of channels.
    pub fn channels(&self) -> usize {
        match self {
            ChannelCount::Four => 4,
            ChannelCount::Eight => 8,
        }
    }

    /// Number of counter groups.
    pub fn counters(&self) -> usize {
        match self {
            ChannelCount::Four => 1,
            ChannelCount::Eight => 2,
        }
    }
}

/// Chip capability description, selected once at construction.
///
/// Replaces per-variant conditional compilation: the driver branches on
/// this data at run time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChipConfig {
    /// System clock feeding the counter prescalers.
    pub sysclk: Hertz,
    /// How many channels the chip exposes.
    pub channels: ChannelCount,
    /// Whether the package bonds out P1.2. Small packages route the
    /// channel 2 primary output to P5.4 instead.
    pub has_p12: bool,
}

impl ChipConfig {
    /// Capability description with the common pinout (P1.2 present).
    pub fn new(sysclk: Hertz, channels: ChannelCount) -> Self {
        Self {
            sysclk,
            channels,
            has_p12: true,
        }
    }
}

/// What a channel is currently used for.
///
/// The interrupt dispatcher reads this to decide how to interpret a
/// channel's compare/capture event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChannelUsage {
    /// Not configured.
    #[default]
    Unused,
    /// PWM output. Quadrature encoder inputs also carry this tag, so
    /// their edges dispatch as plain channel events.
    PwmOutput,
    /// Quadrature encoder input.
    Encoder,
    /// Capture input.
    Capture,
}

/// Counter-level interrupt events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CounterEvent {
    /// Trigger input event.
    Trigger,
    /// Commutation event.
    Commutation,
    /// Update (period rollover) event.
    Update,
    /// Break input asserted.
    Fault,
}

/// Event callbacks, implemented by the surrounding application.
///
/// Invoked from the interrupt dispatch path, so implementations should be
/// short and must not call back into the driver for the same counter.
pub trait EventHandler {
    /// A channel compare or capture fired. `captured` and `counting_down`
    /// are zero unless the channel is tagged [`ChannelUsage::Capture`].
    fn on_channel_event(&mut self, channel: Channel, captured: u16, counting_down: bool);

    /// A counter-level event fired.
    fn on_counter_event(&mut self, counter: Counter, event: CounterEvent);
}

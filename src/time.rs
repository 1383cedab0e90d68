//! Time units.

/// Hertz
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Hertz(pub u32);

impl Hertz {
    /// Create a `Hertz` from a raw Hz value.
    pub const fn hz(hertz: u32) -> Self {
        Self(hertz)
    }

    /// Create a `Hertz` from a kHz value.
    pub const fn khz(kilohertz: u32) -> Self {
        Self(kilohertz * 1_000)
    }

    /// Create a `Hertz` from a MHz value.
    pub const fn mhz(megahertz: u32) -> Self {
        Self(megahertz * 1_000_000)
    }
}

/// Shortcut for [`Hertz::hz`].
pub const fn hz(hertz: u32) -> Hertz {
    Hertz::hz(hertz)
}

/// Shortcut for [`Hertz::khz`].
pub const fn khz(kilohertz: u32) -> Hertz {
    Hertz::khz(kilohertz)
}

/// Shortcut for [`Hertz::mhz`].
pub const fn mhz(megahertz: u32) -> Hertz {
    Hertz::mhz(megahertz)
}

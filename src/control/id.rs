//! Channel identifiers and channel sets.

use bitflags::bitflags;

/// One monitored resource.
///
/// The discriminant is the channel's wire code in the C ABI.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChannelId {
    /// Health percentage.
    Health = 0,
    /// Stamina percentage.
    Stamina = 1,
    /// Magicka percentage.
    Magicka = 2,
}

impl ChannelId {
    /// All channels, in tick order.
    pub const ALL: [Self; 3] = [Self::Health, Self::Stamina, Self::Magicka];

    /// Channel for a wire code.
    pub const fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(Self::Health),
            1 => Some(Self::Stamina),
            2 => Some(Self::Magicka),
            _ => None,
        }
    }

    /// Wire code.
    #[inline]
    pub const fn code(self) -> u32 {
        self as u32
    }

    /// Display name, also the settings section title.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Health => "Health",
            Self::Stamina => "Stamina",
            Self::Magicka => "Magicka",
        }
    }

    /// Effect the host is asked to drive when settings name none.
    pub const fn default_effect_id(self) -> &'static str {
        match self {
            Self::Health => "StatFXImodHealth",
            Self::Stamina => "StatFXImodStam",
            Self::Magicka => "StatFXImodMag",
        }
    }

    /// Single-channel mask.
    #[inline]
    pub const fn mask(self) -> ChannelMask {
        match self {
            Self::Health => ChannelMask::HEALTH,
            Self::Stamina => ChannelMask::STAMINA,
            Self::Magicka => ChannelMask::MAGICKA,
        }
    }
}

impl std::fmt::Display for ChannelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

bitflags! {
    /// A set of channels.
    ///
    /// # Example
    /// ```
    /// use statfx::ChannelMask;
    /// let drained = ChannelMask::STAMINA | ChannelMask::MAGICKA;
    /// assert!(!drained.contains(ChannelMask::HEALTH));
    /// ```
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ChannelMask: u32 {
        /// Health channel
        const HEALTH = 0b0000_0001;
        /// Stamina channel
        const STAMINA = 0b0000_0010;
        /// Magicka channel
        const MAGICKA = 0b0000_0100;
    }
}

impl std::fmt::Debug for ChannelMask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        bitflags::parser::to_writer(self, f)
    }
}

impl FromIterator<ChannelId> for ChannelMask {
    fn from_iter<I: IntoIterator<Item = ChannelId>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::empty(), |mask, channel| mask | channel.mask())
    }
}

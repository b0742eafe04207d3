//! Hue cycle that walks the six edges of the RGB cube.
//!
//! Starting at yellow, each leg ramps a single channel toward 0 or 1:
//!
//! | Leg | Channel | Direction |
//! |-----|---------|-----------|
//! | 0   | green   | down      |
//! | 1   | blue    | up        |
//! | 2   | red     | down      |
//! | 3   | green   | up        |
//! | 4   | blue    | down      |
//! | 5   | red     | up        |
//!
//! The tick that crosses a boundary clamps the channel onto it and moves to
//! the next leg. The color handed out by that tick is the clamped one.

/// Per-tick channel increment: 31 device levels per leg, six legs.
pub const STEP: f64 = 1.0 / (31.0 * 6.0);

/// An RGB color with channels in `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    /// Starting color of the cycle.
    pub const YELLOW: Rgb = Rgb {
        r: 1.0,
        g: 1.0,
        b: 0.0,
    };

    /// Read one channel.
    pub fn channel(&self, channel: Channel) -> f64 {
        match channel {
            Channel::Red => self.r,
            Channel::Green => self.g,
            Channel::Blue => self.b,
        }
    }

    fn channel_mut(&mut self, channel: Channel) -> &mut f64 {
        match channel {
            Channel::Red => &mut self.r,
            Channel::Green => &mut self.g,
            Channel::Blue => &mut self.b,
        }
    }

    /// Whether at least one channel sits exactly on a cube face.
    pub fn on_cube_surface(&self) -> bool {
        [self.r, self.g, self.b]
            .iter()
            .any(|&c| c == 0.0 || c == 1.0)
    }
}

/// A single color channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Red,
    Green,
    Blue,
}

/// One edge of the hue hexagon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Leg {
    GreenDown = 0,
    BlueUp = 1,
    RedDown = 2,
    GreenUp = 3,
    BlueDown = 4,
    RedUp = 5,
}

impl Leg {
    /// All legs in cycle order.
    pub const ALL: &'static [Leg] = &[
        Leg::GreenDown,
        Leg::BlueUp,
        Leg::RedDown,
        Leg::GreenUp,
        Leg::BlueDown,
        Leg::RedUp,
    ];

    /// Position in the cycle (0..=5).
    pub fn index(&self) -> u8 {
        *self as u8
    }

    /// The leg that follows this one, wrapping 5 → 0.
    pub fn next(&self) -> Leg {
        Self::ALL[(self.index() as usize + 1) % Self::ALL.len()]
    }

    /// Channel ramped during this leg.
    pub fn channel(&self) -> Channel {
        match self {
            Self::GreenDown | Self::GreenUp => Channel::Green,
            Self::BlueUp | Self::BlueDown => Channel::Blue,
            Self::RedDown | Self::RedUp => Channel::Red,
        }
    }

    /// Whether the channel ramps toward 1.
    pub fn is_rising(&self) -> bool {
        matches!(self, Self::BlueUp | Self::GreenUp | Self::RedUp)
    }
}

/// Color cycle state machine.
#[derive(Debug, Clone)]
pub struct ColorCycler {
    color: Rgb,
    leg: Leg,
}

impl Default for ColorCycler {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorCycler {
    /// Start at yellow on leg 0.
    pub fn new() -> Self {
        Self {
            color: Rgb::YELLOW,
            leg: Leg::GreenDown,
        }
    }

    /// Current color.
    pub fn color(&self) -> Rgb {
        self.color
    }

    /// Leg the next tick will advance.
    pub fn leg(&self) -> Leg {
        self.leg
    }

    /// Advance one tick and return the new color.
    pub fn tick(&mut self) -> Rgb {
        let leg = self.leg;
        let value = self.color.channel_mut(leg.channel());

        if leg.is_rising() {
            *value += STEP;
            if *value >= 1.0 {
                *value = 1.0;
                self.leg = leg.next();
            }
        } else {
            *value -= STEP;
            if *value <= 0.0 {
                *value = 0.0;
                self.leg = leg.next();
            }
        }

        self.color
    }
}

impl Iterator for ColorCycler {
    type Item = Rgb;

    fn next(&mut self) -> Option<Rgb> {
        Some(self.tick())
    }
}

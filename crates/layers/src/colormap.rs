use colorous::Gradient;

/// Perceptually uniform colormaps offered by the dashboard.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Colormap {
    #[default]
    Viridis,
    Inferno,
    Plasma,
    Magma,
    Cividis,
}

impl Colormap {
    pub const ALL: [Colormap; 5] = [
        Colormap::Viridis,
        Colormap::Inferno,
        Colormap::Plasma,
        Colormap::Magma,
        Colormap::Cividis,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Colormap::Viridis => "viridis",
            Colormap::Inferno => "inferno",
            Colormap::Plasma => "plasma",
            Colormap::Magma => "magma",
            Colormap::Cividis => "cividis",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.name() == name)
    }

    fn gradient(self) -> Gradient {
        match self {
            Colormap::Viridis => colorous::VIRIDIS,
            Colormap::Inferno => colorous::INFERNO,
            Colormap::Plasma => colorous::PLASMA,
            Colormap::Magma => colorous::MAGMA,
            Colormap::Cividis => colorous::CIVIDIS,
        }
    }

    /// Color for a normalized position.
    ///
    /// `t` is clamped to [0, 1]; reversal flips the position, not the map.
    pub fn resolve(self, t: f64, reversed: bool) -> [u8; 3] {
        let mut t = t.clamp(0.0, 1.0);
        if reversed {
            t = 1.0 - t;
        }
        let c = self.gradient().eval_continuous(t);
        [c.r, c.g, c.b]
    }
}

#[cfg(test)]
mod tests {
    use super::Colormap;

    #[test]
    fn names_round_trip() {
        for cmap in Colormap::ALL {
            assert_eq!(Colormap::from_name(cmap.name()), Some(cmap));
        }
        assert_eq!(Colormap::from_name("jet"), None);
    }

    #[test]
    fn endpoints_differ() {
        for cmap in Colormap::ALL {
            assert_ne!(cmap.resolve(0.0, false), cmap.resolve(1.0, false));
        }
    }

    #[test]
    fn resolve_clamps_out_of_range() {
        let c = Colormap::Viridis;
        assert_eq!(c.resolve(-0.5, false), c.resolve(0.0, false));
        assert_eq!(c.resolve(1.5, false), c.resolve(1.0, false));
    }

    #[test]
    fn reversal_flips_endpoints_and_is_involutive() {
        let c = Colormap::Plasma;
        assert_eq!(c.resolve(0.0, true), c.resolve(1.0, false));
        assert_eq!(c.resolve(1.0, true), c.resolve(0.0, false));
        // Reversing twice is identity.
        for i in 0..=10 {
            let t = i as f64 / 10.0;
            assert_eq!(c.resolve(1.0 - (1.0 - t), false), c.resolve(t, false));
        }
    }
}

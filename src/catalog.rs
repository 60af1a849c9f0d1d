/// Declares a fixed option set: ordered `ALL`, display `label()`, wrapping
/// `next()`/`prev()` for the form selectors and a `Default`.
macro_rules! choice_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident default $default:ident {
            $($variant:ident => $label:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }

            pub fn index(self) -> usize {
                Self::ALL.iter().position(|c| *c == self).unwrap_or(0)
            }

            pub fn next(self) -> Self {
                Self::ALL[(self.index() + 1) % Self::ALL.len()]
            }

            pub fn prev(self) -> Self {
                let len = Self::ALL.len();
                Self::ALL[(self.index() + len - 1) % len]
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

choice_enum! {
    /// Opponent sides offered by the form.
    pub enum Team default India {
        India => "India",
        Australia => "Australia",
        England => "England",
        SouthAfrica => "South Africa",
        NewZealand => "New Zealand",
        Pakistan => "Pakistan",
        SriLanka => "Sri Lanka",
        WestIndies => "West Indies",
        Bangladesh => "Bangladesh",
        Afghanistan => "Afghanistan",
    }
}

choice_enum! {
    pub enum Conditions default ClearSkies {
        ClearSkies => "Clear Skies",
        Overcast => "Overcast",
        Humid => "Humid",
        RainyForecast => "Rainy Forecast",
        Windy => "Windy",
    }
}

choice_enum! {
    pub enum MatchFormat default T20International {
        T20International => "T20 International",
        Odi => "ODI",
        TestMatch => "Test Match",
        T20League => "T20 League",
    }
}

choice_enum! {
    pub enum TossContext default BattingFirst {
        BattingFirst => "Batting First",
        BattingSecond => "Batting Second (Chasing)",
    }
}

choice_enum! {
    pub enum FormLevel default Good {
        Excellent => "Excellent",
        Good => "Good",
        Average => "Average",
        Poor => "Poor",
    }
}

choice_enum! {
    pub enum PitchNature default Flat {
        Green => "Green (Pace/Swing)",
        Flat => "Flat (Batting Paradise)",
        Dusty => "Dusty (Spin)",
        Bouncy => "Bouncy (Hard)",
        Slow => "Slow (Low Bounce)",
    }
}

choice_enum! {
    pub enum MatchType default Day {
        Day => "Day Match",
        DayNight => "Day/Night (Floodlights)",
    }
}

choice_enum! {
    pub enum PlayerRole default AggressiveOpener {
        AggressiveOpener => "Aggressive Opener",
        TopOrderAnchor => "Top-Order Anchor",
        MiddleOrderFinisher => "Middle-Order Finisher",
        LowerOrderHitter => "Lower-Order Hitter",
    }
}

choice_enum! {
    pub enum PressureLevel default Normal {
        Normal => "Normal (League)",
        High => "High (Qualifier/Semi)",
        Extreme => "Extreme (Final)",
    }
}

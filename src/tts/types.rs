use std::fmt::Display;

macro_rules! decl_clamped_int {
    {$(#[$meta:meta])* $name:ident($base:ty) in $min:literal..$max:literal, default $default:literal} => {
        $(#[$meta])*
        #[derive(Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
        pub struct $name($base);

        impl $name {
            /// Clamps the given value to the interval
            #[doc = concat!("[", stringify!($min), ", ", stringify!($max), "]")]
            /// and constructs a new instance from it.
            pub fn new(value: $base) -> Self {
                Self(value.clamp($min, $max))
            }

            /// Returns the value encapsulated by this instance.
            pub fn value(&self) -> $base {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self($default)
            }
        }

        impl From<$base> for $name {
            fn from(source: $base) -> Self {
                Self::new(source)
            }
        }

        impl From<i32> for $name {
            fn from(source: i32) -> Self {
                Self::new(<$base>::try_from(source.max(0)).unwrap_or(<$base>::MAX))
            }
        }

        impl From<$name> for $base {
            fn from(source: $name) -> Self {
                source.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

decl_clamped_int! {
    /// Speech rate in words per minute, represented as a value in the interval [80, 450].
    Rate(u32) in 80..450, default 200
}

decl_clamped_int! {
    /// Base voice pitch, represented as a value in the interval [0, 99], with 50 being normal pitch.
    Pitch(u32) in 0..99, default 50
}

/// Voice volume, represented as a value in the interval [0.0, 1.0], with 1.0 being full volume.
#[derive(Debug, PartialEq, PartialOrd, Clone, Copy)]
pub struct Volume(f32);

impl Volume {
    /// Clamps the given value to the interval [0.0, 1.0] and constructs a new instance from it.
    /// NaN is treated as silence.
    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            Self(0.0)
        } else {
            Self(value.clamp(0.0, 1.0))
        }
    }

    /// Returns the value encapsulated by this instance.
    pub fn value(&self) -> f32 {
        self.0
    }

    /// The volume as a percentage, rounded to the nearest integer.
    pub fn percent(&self) -> u32 {
        (self.0 * 100.0).round() as u32
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self(1.0)
    }
}

impl From<f32> for Volume {
    fn from(source: f32) -> Self {
        Self::new(source)
    }
}

impl From<f64> for Volume {
    fn from(source: f64) -> Self {
        Self::new(source as f32)
    }
}

impl From<Volume> for f32 {
    fn from(source: Volume) -> Self {
        source.0
    }
}

impl Display for Volume {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

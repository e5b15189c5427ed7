//! Values the device derives on its own when asked for `auto`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

const AUTO: &str = "auto";

/// Either the literal `auto` or an explicit value.
///
/// On the wire this is the string `"auto"` or the value's string form.
/// Generators resolve `Auto` exactly once, from device facts.
///
/// # Example
///
/// ```rust
/// use cumulus_driver::model::AutoValue;
///
/// let rd: AutoValue<String> = "auto".parse().unwrap();
/// assert!(rd.is_auto());
/// assert_eq!(rd.resolve(|| "192.168.0.106:71".to_string()), "192.168.0.106:71");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AutoValue<T> {
    /// Let the driver derive the value.
    Auto,
    /// Use this value as-is.
    Explicit(T),
}

impl<T> AutoValue<T> {
    /// Check if this is the `auto` sentinel.
    pub fn is_auto(&self) -> bool {
        matches!(self, AutoValue::Auto)
    }

    /// Get the explicit value, if any.
    pub fn explicit(&self) -> Option<&T> {
        match self {
            AutoValue::Auto => None,
            AutoValue::Explicit(value) => Some(value),
        }
    }

    /// Resolve to a concrete value, deriving `Auto` with `derive`.
    pub fn resolve(&self, derive: impl FnOnce() -> T) -> T
    where
        T: Clone,
    {
        match self {
            AutoValue::Auto => derive(),
            AutoValue::Explicit(value) => value.clone(),
        }
    }
}

impl<T> Default for AutoValue<T> {
    fn default() -> Self {
        AutoValue::Auto
    }
}

impl<T> From<T> for AutoValue<T> {
    fn from(value: T) -> Self {
        AutoValue::Explicit(value)
    }
}

impl<T: fmt::Display> fmt::Display for AutoValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AutoValue::Auto => f.write_str(AUTO),
            AutoValue::Explicit(value) => fmt::Display::fmt(value, f),
        }
    }
}

impl<T: FromStr> FromStr for AutoValue<T> {
    type Err = T::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case(AUTO) {
            Ok(AutoValue::Auto)
        } else {
            s.trim().parse().map(AutoValue::Explicit)
        }
    }
}

impl<T: fmt::Display> Serialize for AutoValue<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de, T> Deserialize<'de> for AutoValue<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/*
 *  clock.rs
 *
 *  BitClock - just a bit more
 *  (c) 2020-26 Stuart Hunter
 *
 *  Wall clock access and the per-tick time snapshot
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use chrono::{Datelike, Local, Timelike};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Broken-down wall clock time, as an RTC would report it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeFields {
    pub day: u8,    // 1-31
    pub hour: u8,   // 0-23
    pub minute: u8, // 0-59
    pub second: u8, // 0-59
}

impl TimeFields {
    pub fn new(day: u8, hour: u8, minute: u8, second: u8) -> Self {
        Self { day, hour, minute, second }
    }

    /// Fields of any chrono date/time
    pub fn from_datetime<T: Datelike + Timelike>(t: &T) -> Self {
        Self {
            day: t.day() as u8,
            hour: t.hour() as u8,
            minute: t.minute() as u8,
            // chrono reports a leap second as 59 plus extra nanos
            second: t.second().min(59) as u8,
        }
    }
}

/// Everything one render pass needs, read once at the start of the tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSnapshot {
    pub day_of_month: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub is_24h: bool,
}

impl TimeSnapshot {
    pub fn new(fields: TimeFields, is_24h: bool) -> Self {
        Self {
            day_of_month: fields.day,
            hour: fields.hour,
            minute: fields.minute,
            second: fields.second,
            is_24h,
        }
    }

    /// Hour as it should appear on the face
    pub fn display_hour(&self) -> u8 {
        display_hour(self.hour, self.is_24h)
    }
}

/// 24h passes the hour through; 12h folds it to 1-12 with midnight and noon as 12.
pub fn display_hour(hour: u8, is_24h: bool) -> u8 {
    if is_24h {
        return hour;
    }
    match hour % 12 {
        0 => 12,
        h => h,
    }
}

/// User preference for the hour column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
pub enum HourFormat {
    /// Follow the locale in the environment
    #[default]
    #[serde(rename = "auto")]
    #[value(name = "auto")]
    Auto,
    #[serde(rename = "12h")]
    #[value(name = "12h")]
    H12,
    #[serde(rename = "24h")]
    #[value(name = "24h")]
    H24,
}

impl HourFormat {
    /// Resolve to a concrete style. `Auto` consults the locale on every call.
    pub fn is_24h_style(self) -> bool {
        match self {
            HourFormat::H12 => false,
            HourFormat::H24 => true,
            HourFormat::Auto => locale_prefers_24h(current_time_locale().as_deref()),
        }
    }
}

// Territories whose conventional clock is 12-hour
const TWELVE_HOUR_LOCALES: &[&str] = &[
    "en_US", "en_CA", "en_AU", "en_NZ", "en_PH", "en_IN", "es_US", "hi_IN", "ko_KR",
];

/// First non-empty of LC_ALL, LC_TIME, LANG (POSIX precedence)
fn current_time_locale() -> Option<String> {
    ["LC_ALL", "LC_TIME", "LANG"]
        .iter()
        .filter_map(|k| std::env::var(k).ok())
        .find(|v| !v.is_empty())
}

/// `None`, "C" and "POSIX" all mean 24-hour.
pub fn locale_prefers_24h(locale: Option<&str>) -> bool {
    let Some(locale) = locale else { return true };
    // strip ".UTF-8" and "@modifier"
    let name = locale
        .split(['.', '@'])
        .next()
        .unwrap_or_default();
    !TWELVE_HOUR_LOCALES.contains(&name)
}

/// The host clock as seen by the render loop.
///
/// Both queries are made fresh on every tick; implementations must not
/// cache the preference because the user may change it at any time.
pub trait ClockSource {
    /// Current wall clock fields
    fn now(&self) -> TimeFields;

    /// Whether the hour column should use 24-hour style
    fn is_24h_style(&self) -> bool;

    /// Read both queries into one immutable snapshot
    fn snapshot(&self) -> TimeSnapshot {
        TimeSnapshot::new(self.now(), self.is_24h_style())
    }
}

impl<T: ClockSource + ?Sized> ClockSource for Box<T> {
    fn now(&self) -> TimeFields {
        (**self).now()
    }

    fn is_24h_style(&self) -> bool {
        (**self).is_24h_style()
    }
}

/// System local time via chrono
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock {
    format: HourFormat,
}

impl LocalClock {
    pub fn new(format: HourFormat) -> Self {
        Self { format }
    }
}

impl ClockSource for LocalClock {
    fn now(&self) -> TimeFields {
        TimeFields::from_datetime(&Local::now())
    }

    fn is_24h_style(&self) -> bool {
        self.format.is_24h_style()
    }
}

/// A clock stuck at one instant, for screenshots and tests
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    fields: TimeFields,
    format: HourFormat,
}

impl FixedClock {
    pub fn new(fields: TimeFields, format: HourFormat) -> Self {
        Self { fields, format }
    }
}

impl ClockSource for FixedClock {
    fn now(&self) -> TimeFields {
        self.fields
    }

    fn is_24h_style(&self) -> bool {
        self.format.is_24h_style()
    }
}

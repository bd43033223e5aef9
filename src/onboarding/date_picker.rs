//! Date selection control.
//!
//! Holds the current value and forwards every change to a callback. No
//! min/max constraint is applied.

use super::model::StartDate;

/// A single-date entry control.
pub struct DatePicker<'a> {
    value: Option<StartDate>,
    on_change: Box<dyn FnMut(Option<StartDate>) + Send + 'a>,
}

impl<'a> DatePicker<'a> {
    pub fn new<F>(value: Option<StartDate>, on_change: F) -> Self
    where
        F: FnMut(Option<StartDate>) + Send + 'a,
    {
        Self {
            value,
            on_change: Box::new(on_change),
        }
    }

    pub fn value(&self) -> Option<StartDate> {
        self.value
    }

    /// Set a new value and notify the callback.
    pub fn set(&mut self, value: Option<StartDate>) {
        self.value = value;
        (self.on_change)(value);
    }

    /// Apply raw text typed into the control.
    ///
    /// Empty input clears the selection. Text that is not a calendar date
    /// leaves the value untouched and does not notify the callback.
    pub fn input(&mut self, raw: &str) -> Result<Option<StartDate>, chrono::ParseError> {
        let raw = raw.trim();
        let value = if raw.is_empty() {
            None
        } else {
            Some(StartDate::parse(raw)?)
        };
        self.set(value);
        Ok(value)
    }
}

impl std::fmt::Debug for DatePicker<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatePicker").field("value", &self.value).finish()
    }
}

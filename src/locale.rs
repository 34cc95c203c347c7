//! The active locale and its two-tier change notification.
//!
//! Resource caches subscribe to the first tier and everything that renders
//! text subscribes to the second. A change is delivered to the whole first
//! tier before the second tier hears about it, so beans never re-pull a
//! string from a cache that still holds the previous locale.

use crate::error::LocaleError;
use crate::notify::Notifier;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

pub const BASE_LANGUAGE: &str = "en";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Locale(String);

impl Locale {
    pub fn new(tag: &str) -> Result<Self, LocaleError> {
        let tag = tag.trim();
        if tag.is_empty() {
            return Err(LocaleError::Empty);
        }

        let mut parts = Vec::new();
        for (idx, part) in tag.split(['-', '_']).enumerate() {
            if part.is_empty()
                || part.len() > 8
                || !part.chars().all(|c| c.is_ascii_alphanumeric())
            {
                return Err(LocaleError::Invalid(tag.to_string()));
            }
            parts.push(match idx {
                0 => part.to_ascii_lowercase(),
                _ if part.len() == 2 => part.to_ascii_uppercase(),
                _ => part.to_string(),
            });
        }

        if !parts[0].chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(LocaleError::Invalid(tag.to_string()));
        }
        Ok(Self(parts.join("-")))
    }

    pub fn tag(&self) -> &str {
        &self.0
    }

    pub fn language(&self) -> &str {
        self.0.split('-').next().unwrap_or(BASE_LANGUAGE)
    }

    /// Full tag, bare language, then the base language, without repeats.
    pub fn fallbacks(&self) -> Vec<&str> {
        let mut chain = vec![self.tag()];
        for candidate in [self.language(), BASE_LANGUAGE] {
            if !chain.contains(&candidate) {
                chain.push(candidate);
            }
        }
        chain
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self(BASE_LANGUAGE.to_string())
    }
}

impl FromStr for Locale {
    type Err = LocaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Locale {
    type Error = LocaleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<Locale> for String {
    fn from(locale: Locale) -> Self {
        locale.0
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleEvent {
    pub old: Locale,
    pub new: Locale,
}

/// Implement `locale_changed` for the transition itself, or only
/// `refresh_locale` when the new value is looked up elsewhere.
pub trait LocaleListener: Send + Sync {
    fn locale_changed(&self, _event: &LocaleEvent) {
        self.refresh_locale();
    }

    fn refresh_locale(&self) {}
}

impl<F> LocaleListener for F
where
    F: Fn(&LocaleEvent) + Send + Sync,
{
    fn locale_changed(&self, event: &LocaleEvent) {
        self(event)
    }
}

pub struct LocaleBus {
    current: RwLock<Locale>,
    resources: Notifier<dyn LocaleListener>,
    beans: Notifier<dyn LocaleListener>,
}

impl LocaleBus {
    pub fn new(initial: Locale) -> Self {
        Self {
            current: RwLock::new(initial),
            resources: Notifier::new(),
            beans: Notifier::new(),
        }
    }

    pub fn locale(&self) -> Locale {
        self.current.read().clone()
    }

    /// Returns false, without notifying anyone, when `locale` is already active.
    pub fn set_locale(&self, locale: Locale) -> bool {
        let old = {
            let mut current = self.current.write();
            if *current == locale {
                return false;
            }
            std::mem::replace(&mut *current, locale.clone())
        };

        debug!(old = %old, new = %locale, "locale changed");
        let event = LocaleEvent { old, new: locale };
        let resource_event = event.clone();
        self.resources
            .fire(move |listener| listener.locale_changed(&resource_event));
        self.beans.fire(move |listener| listener.locale_changed(&event));
        true
    }

    pub fn add_resource_listener(&self, listener: Arc<dyn LocaleListener>) {
        self.resources.subscribe(listener);
    }

    pub fn remove_resource_listener(&self, listener: &Arc<dyn LocaleListener>) -> bool {
        self.resources.unsubscribe(listener)
    }

    pub fn add_listener(&self, listener: Arc<dyn LocaleListener>) {
        self.beans.subscribe(listener);
    }

    pub fn remove_listener(&self, listener: &Arc<dyn LocaleListener>) -> bool {
        self.beans.unsubscribe(listener)
    }

    pub fn resource_listeners(&self) -> Vec<Arc<dyn LocaleListener>> {
        self.resources.listeners()
    }

    pub fn listeners(&self) -> Vec<Arc<dyn LocaleListener>> {
        self.beans.listeners()
    }

    pub fn shutdown(&self) {
        self.resources.clear();
        self.beans.clear();
    }
}

impl Default for LocaleBus {
    fn default() -> Self {
        Self::new(Locale::default())
    }
}

impl fmt::Debug for LocaleBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocaleBus")
            .field("current", &*self.current.read())
            .field("resources", &self.resources)
            .field("beans", &self.beans)
            .finish()
    }
}

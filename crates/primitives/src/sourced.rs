/// Where a value handed out by a fail-soft fetcher came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
    /// The value was fetched from upstream during this call.
    Fetched,
    /// The value was served from a cache entry still within its time-to-live.
    Cached,
    /// The upstream call failed and the value is a default or a last-known value.
    Fallback,
}

/// A value tagged with its [`Origin`].
#[derive(Debug, Clone, PartialEq)]
pub struct Sourced<T> {
    /// The value.
    pub value: T,
    /// Where the value came from.
    pub origin: Origin,
}

impl<T> Sourced<T> {
    /// Returns a freshly fetched value.
    pub const fn fetched(value: T) -> Self {
        Self { value, origin: Origin::Fetched }
    }

    /// Returns a value served from cache.
    pub const fn cached(value: T) -> Self {
        Self { value, origin: Origin::Cached }
    }

    /// Returns a fallback value.
    pub const fn fallback(value: T) -> Self {
        Self { value, origin: Origin::Fallback }
    }

    /// Returns true if the upstream fetch failed.
    pub fn is_fallback(&self) -> bool {
        self.origin == Origin::Fallback
    }

    /// Consumes the wrapper, returning the value.
    pub fn into_value(self) -> T {
        self.value
    }
}

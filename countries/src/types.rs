//! Domain types shared by both screens.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A country as the repository stores it
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    /// Common name, also the lookup key
    pub name: String,
    /// Capital city
    #[serde(default)]
    pub capital: String,
    /// Geographic region
    #[serde(default)]
    pub region: String,
    /// Population count
    #[serde(default)]
    pub population: u64,
    /// Flag emoji or image reference
    #[serde(default)]
    pub flag: String,
    /// Whether the user marked the country as a favorite
    #[serde(default)]
    pub is_favorite: bool,
}

impl Country {
    /// Creates a country with only a name set
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            capital: String::new(),
            region: String::new(),
            population: 0,
            flag: String::new(),
            is_favorite: false,
        }
    }

    /// Sets the favorite flag
    #[must_use]
    pub const fn with_favorite(mut self, is_favorite: bool) -> Self {
        self.is_favorite = is_favorite;
        self
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.flag.is_empty() {
            write!(f, "{}", self.name)?;
        } else {
            write!(f, "{} {}", self.flag, self.name)?;
        }
        if self.is_favorite {
            write!(f, " ★")?;
        }
        Ok(())
    }
}

/// Which countries the list screen shows
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterType {
    /// Every country
    #[default]
    All,
    /// Only favorites
    Favorite,
}

impl FilterType {
    /// Whether `country` passes this filter
    #[must_use]
    pub const fn matches(self, country: &Country) -> bool {
        match self {
            Self::All => true,
            Self::Favorite => country.is_favorite,
        }
    }
}

/// Transient message shown after a favorite toggle
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageType {
    /// The country was added to favorites
    AddedToFavorite,
    /// The country was removed from favorites
    RemovedFromFavorite,
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AddedToFavorite => write!(f, "Added to favorites"),
            Self::RemovedFromFavorite => write!(f, "Removed from favorites"),
        }
    }
}

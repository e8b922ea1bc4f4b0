//! Place records: lodging and attractions.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Coordinates, DomainError};

/// Highest allowed rating, for places and comments alike.
pub const MAX_RATING: f64 = 5.0;

/// Unique, totally ordered identifier of a place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Lodging,
    Attraction,
}

impl Category {
    /// Parse a category label.
    ///
    /// Accepts the English labels and the Spanish labels found in legacy
    /// data files, ignoring case and surrounding whitespace.
    ///
    /// # Examples
    ///
    /// ```
    /// use tour_server::domain::Category;
    ///
    /// assert_eq!(Category::parse("Hospedaje").unwrap(), Category::Lodging);
    /// assert_eq!(Category::parse("turístico").unwrap(), Category::Attraction);
    /// assert!(Category::parse("Museum").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s.trim().to_lowercase().as_str() {
            "lodging" | "hospedaje" => Ok(Category::Lodging),
            "attraction" | "turístico" | "turistico" => Ok(Category::Attraction),
            _ => Err(DomainError::UnknownCategory(s.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Lodging => "Lodging",
            Category::Attraction => "Attraction",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A visitor comment attached to a place. Not used by routing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub user: String,
    pub rating: f64,
    pub text: String,
}

impl Comment {
    pub fn new(
        user: impl Into<String>,
        rating: f64,
        text: impl Into<String>,
    ) -> Result<Self, DomainError> {
        check_rating(rating)?;
        Ok(Self {
            user: user.into(),
            rating,
            text: text.into(),
        })
    }
}

/// A place that can be indexed and visited.
///
/// Equality and ordering consider only the identifier: two entities with
/// the same id are the same place, whatever their other fields say.
#[derive(Debug, Clone)]
pub struct Entity {
    id: EntityId,
    name: String,
    category: Category,
    location: Coordinates,
    price: f64,
    rating: f64,
    visit_hours: Option<f64>,
    comments: Vec<Comment>,
}

impl Entity {
    /// Create a validated entity.
    ///
    /// `visit_hours` may only be given for attractions.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: EntityId,
        name: impl Into<String>,
        category: Category,
        lat: f64,
        lon: f64,
        price: f64,
        rating: f64,
        visit_hours: Option<f64>,
    ) -> Result<Self, DomainError> {
        let location = Coordinates::new(lat, lon)?;

        if !price.is_finite() || price < 0.0 {
            return Err(DomainError::InvalidPrice(price));
        }
        check_rating(rating)?;

        if let Some(hours) = visit_hours {
            if category == Category::Lodging {
                return Err(DomainError::UnexpectedVisitDuration(id));
            }
            if !hours.is_finite() || hours < 0.0 {
                return Err(DomainError::InvalidVisitDuration(hours));
            }
        }

        Ok(Self {
            id,
            name: name.into(),
            category,
            location,
            price,
            rating,
            visit_hours,
            comments: Vec::new(),
        })
    }

    /// Create a lodging entity.
    pub fn lodging(
        id: u64,
        name: impl Into<String>,
        lat: f64,
        lon: f64,
        price: f64,
        rating: f64,
    ) -> Result<Self, DomainError> {
        Self::new(
            EntityId(id),
            name,
            Category::Lodging,
            lat,
            lon,
            price,
            rating,
            None,
        )
    }

    /// Create an attraction entity with an estimated visit duration in hours.
    pub fn attraction(
        id: u64,
        name: impl Into<String>,
        lat: f64,
        lon: f64,
        price: f64,
        rating: f64,
        visit_hours: f64,
    ) -> Result<Self, DomainError> {
        Self::new(
            EntityId(id),
            name,
            Category::Attraction,
            lat,
            lon,
            price,
            rating,
            Some(visit_hours),
        )
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn is_attraction(&self) -> bool {
        self.category == Category::Attraction
    }

    pub fn location(&self) -> Coordinates {
        self.location
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn rating(&self) -> f64 {
        self.rating
    }

    pub fn visit_hours(&self) -> Option<f64> {
        self.visit_hours
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    /// Append a comment. Comments are never edited or removed.
    pub fn add_comment(&mut self, comment: Comment) {
        self.comments.push(comment);
    }

    /// Hours spent at this place when it is part of a route.
    ///
    /// Lodging contributes nothing; an attraction without an estimate
    /// contributes zero.
    pub fn route_hours(&self) -> f64 {
        match self.category {
            Category::Attraction => self.visit_hours.unwrap_or(0.0),
            Category::Lodging => 0.0,
        }
    }

    /// Money spent at this place when it is part of a route.
    pub fn route_cost(&self) -> f64 {
        match self.category {
            Category::Attraction => self.price,
            Category::Lodging => 0.0,
        }
    }

    /// Score contributed to a route that visits this place.
    pub fn route_score(&self) -> f64 {
        match self.category {
            Category::Attraction => self.rating,
            Category::Lodging => 0.0,
        }
    }

    /// Multi-line label used when rendering the index as a diagram.
    pub fn label(&self) -> String {
        let mut lines = vec![
            format!("ID: {}", self.id),
            self.name.clone(),
            format!("Category: {}", self.category),
            format!("Price: ${}", self.price),
            format!("Rating: {}", self.rating),
        ];
        if self.is_attraction() {
            if let Some(hours) = self.visit_hours {
                lines.push(format!("Time: {hours}h"));
            }
        }
        lines.join("\n")
    }
}

impl PartialEq for Entity {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Entity {}

impl PartialOrd for Entity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.id)
    }
}

fn check_rating(rating: f64) -> Result<(), DomainError> {
    if !(0.0..=MAX_RATING).contains(&rating) {
        return Err(DomainError::InvalidRating(rating));
    }
    Ok(())
}

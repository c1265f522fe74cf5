//! Clothing box catalog: search, category filter, sorting and the cart counter

use std::fmt;
use std::str::FromStr;

use log::info;
use serde::{Deserialize, Serialize};

use crate::messages::added_to_cart;

/// Category value that disables the category filter
pub const ALL_CATEGORIES: &str = "All";

const BUILTIN_BOXES: &str = include_str!("../data/boxes.json");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClothingBox {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub long_description: String,
    pub category: String,
    /// Euros
    pub price: u32,
    pub original_value: u32,
    pub rating: f32,
    pub reviews: u32,
    pub images: Vec<String>,
}

impl ClothingBox {
    /// Discount against the original value, rounded to a whole percent
    pub fn savings_percent(&self) -> u32 {
        if self.original_value == 0 || self.price >= self.original_value {
            return 0;
        }
        let saved = (self.original_value - self.price) as f64;
        (saved / self.original_value as f64 * 100.0).round() as u32
    }

    fn matches_search(&self, query: &str) -> bool {
        [&self.name, &self.description, &self.category]
            .iter()
            .any(|field| field.to_lowercase().contains(query))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOption {
    /// Most reviewed first
    #[default]
    Popular,
    PriceAsc,
    PriceDesc,
    Rating,
}

impl FromStr for SortOption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "popular" => Ok(SortOption::Popular),
            "price-asc" => Ok(SortOption::PriceAsc),
            "price-desc" => Ok(SortOption::PriceDesc),
            "rating" => Ok(SortOption::Rating),
            other => Err(format!(
                "unknown sort option '{}' (expected popular, price-asc, price-desc or rating)",
                other
            )),
        }
    }
}

impl fmt::Display for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SortOption::Popular => "popular",
            SortOption::PriceAsc => "price-asc",
            SortOption::PriceDesc => "price-desc",
            SortOption::Rating => "rating",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Default)]
pub struct CatalogQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub sort: SortOption,
}

pub struct Catalog {
    boxes: Vec<ClothingBox>,
}

impl Catalog {
    pub fn new(boxes: Vec<ClothingBox>) -> Self {
        Self { boxes }
    }

    /// The boxes shipped with the storefront
    pub fn builtin() -> Result<Self, serde_json::Error> {
        Ok(Self::new(serde_json::from_str(BUILTIN_BOXES)?))
    }

    pub fn boxes(&self) -> &[ClothingBox] {
        &self.boxes
    }

    pub fn find(&self, id: &str) -> Option<&ClothingBox> {
        self.boxes.iter().find(|b| b.id == id)
    }

    /// Distinct categories in catalog order
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = Vec::new();
        for b in &self.boxes {
            if !categories.contains(&b.category.as_str()) {
                categories.push(&b.category);
            }
        }
        categories
    }

    /// A blank search is ignored; otherwise the query is matched as typed,
    /// surrounding spaces included.
    pub fn query(&self, query: &CatalogQuery) -> Vec<&ClothingBox> {
        let search = query
            .search
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(str::to_lowercase);
        let category = query
            .category
            .as_deref()
            .filter(|c| *c != ALL_CATEGORIES);

        let mut boxes: Vec<&ClothingBox> = self
            .boxes
            .iter()
            .filter(|b| search.as_deref().map_or(true, |q| b.matches_search(q)))
            .filter(|b| category.map_or(true, |c| b.category == c))
            .collect();

        match query.sort {
            SortOption::PriceAsc => boxes.sort_by_key(|b| b.price),
            SortOption::PriceDesc => boxes.sort_by(|a, b| b.price.cmp(&a.price)),
            SortOption::Rating => boxes.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
            SortOption::Popular => boxes.sort_by(|a, b| b.reviews.cmp(&a.reviews)),
        }
        boxes
    }

    /// "N box trouvée(s)" line shown above the results
    pub fn results_label(count: usize, search: Option<&str>) -> String {
        let noun = if count == 1 { "box trouvée" } else { "box trouvées" };
        match search.map(str::trim).filter(|s| !s.is_empty()) {
            Some(search) => format!("{} {} pour \"{}\"", count, noun, search),
            None => format!("{} {}", count, noun),
        }
    }
}

#[derive(Debug, Default)]
pub struct Cart {
    count: usize,
}

impl Cart {
    pub fn count(&self) -> usize {
        self.count
    }

    /// Adds a box and returns the confirmation shown to the user
    pub fn add(&mut self, b: &ClothingBox) -> String {
        self.count += 1;
        info!("[cart] Added {} ({} item(s))", b.id, self.count);
        added_to_cart(&b.name)
    }
}

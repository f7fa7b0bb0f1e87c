//! Stock product photos and where a logo sits on each of them.
//!
//! Logo areas are expressed in percent of the photo so the same catalog works at
//! any preview size; `LogoArea::resolve` turns them into pixels.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Logo placement on a product photo, in percent of the photo's size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogoArea {
    pub top: f32,
    pub left: f32,
    pub width: f32,
    pub height: f32,
    /// In-plane rotation baked into the product shot (e.g. a tilted mug).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation_deg: Option<f32>,
}

/// Absolute logo box on a photo of known size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub rotation_deg: f32,
}

impl LogoArea {
    pub fn new(top: f32, left: f32, width: f32, height: f32) -> Self {
        Self {
            top,
            left,
            width,
            height,
            rotation_deg: None,
        }
    }

    pub fn with_rotation(mut self, degrees: f32) -> Self {
        self.rotation_deg = Some(degrees);
        self
    }

    /// Validate percentages and that the box stays inside the photo.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let fields = [
            ("top", self.top),
            ("left", self.left),
            ("width", self.width),
            ("height", self.height),
        ];

        for (name, value) in fields {
            if !value.is_finite() || !(0.0..=100.0).contains(&value) {
                tracing::error!(field = name, value = value, "logo area value out of range");
                return Err(CatalogError::InvalidPercent {
                    field: name.to_string(),
                    value,
                });
            }
        }

        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(CatalogError::EmptyLogoArea);
        }

        if self.left + self.width > 100.0 || self.top + self.height > 100.0 {
            tracing::error!(area = ?self, "logo area extends past the photo");
            return Err(CatalogError::OutOfFrame);
        }

        if let Some(rotation) = self.rotation_deg {
            if !rotation.is_finite() {
                return Err(CatalogError::InvalidPercent {
                    field: "rotation_deg".into(),
                    value: rotation,
                });
            }
        }

        Ok(())
    }

    /// Pixel box of this area on a `photo_width` x `photo_height` photo.
    pub fn resolve(&self, photo_width: u32, photo_height: u32) -> PixelRect {
        let scale = |percent: f32, extent: u32| -> u32 {
            ((percent / 100.0) * extent as f32).round().max(0.0) as u32
        };

        PixelRect {
            x: scale(self.left, photo_width),
            y: scale(self.top, photo_height),
            width: scale(self.width, photo_width),
            height: scale(self.height, photo_height),
            rotation_deg: self.rotation_deg.unwrap_or(0.0),
        }
    }
}

/// A stock photo the logo can be previewed on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MockupProduct {
    pub id: String,
    pub name: String,
    pub url: String,
    pub logo_area: LogoArea,
}

/// The built-in stock products.
pub fn default_products() -> Vec<MockupProduct> {
    vec![
        MockupProduct {
            id: "mug-1".into(),
            name: "Classic White Mug".into(),
            url: "https://images.unsplash.com/photo-1514228742587-6b1558fcca3d?auto=format&fit=crop&q=80&w=800".into(),
            logo_area: LogoArea::new(35.0, 30.0, 35.0, 35.0).with_rotation(-5.0),
        },
        MockupProduct {
            id: "tshirt-1".into(),
            name: "Plain White Tee".into(),
            url: "https://images.unsplash.com/photo-1521572163474-6864f9cf17ab?auto=format&fit=crop&q=80&w=800".into(),
            logo_area: LogoArea::new(25.0, 28.0, 20.0, 20.0),
        },
        MockupProduct {
            id: "totebag-1".into(),
            name: "Canvas Tote Bag".into(),
            url: "https://images.unsplash.com/photo-1597484662317-c92534dd2589?auto=format&fit=crop&q=80&w=800".into(),
            logo_area: LogoArea::new(40.0, 35.0, 30.0, 30.0),
        },
    ]
}

/// Validated, non-empty list of products with unique ids.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Catalog {
    products: Vec<MockupProduct>,
}

impl Catalog {
    pub fn new(products: Vec<MockupProduct>) -> Result<Self, CatalogError> {
        if products.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::new();
        for product in &products {
            if product.id.trim().is_empty() {
                return Err(CatalogError::EmptyId);
            }
            if !seen.insert(product.id.as_str()) {
                tracing::error!(id = %product.id, "duplicate product id in catalog");
                return Err(CatalogError::DuplicateProduct {
                    id: product.id.clone(),
                });
            }
            product.logo_area.validate()?;
        }

        tracing::debug!(products = products.len(), "catalog loaded");
        Ok(Self { products })
    }

    /// Parse a catalog from a JSON array of products.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let products: Vec<MockupProduct> = serde_json::from_str(json)?;
        Self::new(products)
    }

    pub fn products(&self) -> &[MockupProduct] {
        &self.products
    }

    /// The product preselected when the studio opens.
    pub fn first(&self) -> &MockupProduct {
        &self.products[0]
    }

    pub fn get(&self, id: &str) -> Result<&MockupProduct, CatalogError> {
        self.products
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| CatalogError::UnknownProduct { id: id.to_string() })
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            products: default_products(),
        }
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog has no products")]
    Empty,

    #[error("product id cannot be empty")]
    EmptyId,

    #[error("duplicate product id: {id}")]
    DuplicateProduct { id: String },

    #[error("unknown product id: {id}")]
    UnknownProduct { id: String },

    #[error("invalid logo area '{field}': {value} (must be in [0, 100])")]
    InvalidPercent { field: String, value: f32 },

    #[error("logo area must have a positive width and height")]
    EmptyLogoArea,

    #[error("logo area extends past the edge of the photo")]
    OutOfFrame,

    #[error("parse catalog json: {0}")]
    Json(#[from] serde_json::Error),
}

use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::errors::{ClientError, Result};
use crate::format::merged_query_param_url;
use crate::types::{PropertySpecs, PropertyType};

/// image used when a listing has no photos
pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/400x300";

pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// property listing as served by the products endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub contract_id: Option<u64>,
    pub staff_id: String,
    pub category_id: String,
    pub title: String,
    pub slug: String,
    pub address: String,
    pub description: Option<String>,
    #[serde(default)]
    pub is_tag: bool,
    #[serde(default)]
    pub total_units: u32,
    pub status: i32,
    pub price: Money,
    #[serde(default)]
    pub map_link: String,
    pub video_link: Option<String>,
    #[serde(default)]
    pub bedrooms: u32,
    #[serde(default)]
    pub bathrooms: u32,
    #[serde(default)]
    pub floors: u32,
    #[serde(default)]
    pub garages: u32,
    #[serde(default)]
    pub certificate: String,
    #[serde(default)]
    pub land_area: String,
    #[serde(default)]
    pub building_area: String,
    pub electricity: Option<String>,
    #[serde(default)]
    pub water_source: String,
    #[serde(default)]
    pub show: bool,
    #[serde(default)]
    pub total_clicks: u64,
    pub longitude: Option<String>,
    pub latitude: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default)]
    pub is_favorite: bool,
    pub staff: Option<Staff>,
    pub category: Option<Category>,
    #[serde(default)]
    pub images: Vec<ProductImage>,
    #[serde(default)]
    pub sub_categories: Vec<SubCategory>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Staff {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub username: String,
    pub phone: String,
    pub photo: Option<String>,
    pub tiktok_username: Option<String>,
    pub instagram_username: Option<String>,
    pub facebook_username: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductImage {
    pub id: u64,
    pub image: String,
    pub name: String,
    #[serde(default)]
    pub show: bool,
    #[serde(default)]
    pub sequence: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: u64,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub status: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubCategory {
    pub id: u64,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub status: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginationLink {
    pub url: Option<String>,
    pub label: String,
    pub active: bool,
}

/// one page of products
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pagination {
    pub current_page: u32,
    pub data: Vec<Product>,
    pub from: Option<u32>,
    pub last_page: u32,
    #[serde(default)]
    pub links: Vec<PaginationLink>,
    pub next_page_url: Option<String>,
    pub per_page: u32,
    pub prev_page_url: Option<String>,
    pub to: Option<u32>,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductResponse {
    pub code: u16,
    pub status: bool,
    pub message: String,
    pub results: Pagination,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubCategoryResponse {
    pub code: u16,
    pub status: bool,
    pub message: String,
    pub results: Vec<SubCategory>,
}

impl Product {
    /// beds, baths and the numeric prefix of the building area
    pub fn specs(&self) -> PropertySpecs {
        PropertySpecs {
            beds: self.bedrooms,
            baths: self.bathrooms,
            area: leading_integer(&self.building_area),
        }
    }

    pub fn cover_image(&self) -> &str {
        self.images
            .first()
            .map(|i| i.image.as_str())
            .unwrap_or(PLACEHOLDER_IMAGE)
    }

    pub fn property_type(&self) -> PropertyType {
        self.category
            .as_ref()
            .map(|c| PropertyType::from_category_name(&c.name))
            .unwrap_or_default()
    }

    pub fn listing_code(&self) -> String {
        self.id.to_string()
    }
}

impl Pagination {
    /// page to request next for infinite scrolling
    pub fn next_page(&self) -> Option<u32> {
        if self.current_page < self.last_page {
            Some(self.current_page + 1)
        } else {
            None
        }
    }
}

impl ProductResponse {
    pub fn from_json(raw: &str) -> Result<Self> {
        let response: ProductResponse = serde_json::from_str(raw)?;
        if !response.status {
            return Err(ClientError::MalformedResponse {
                message: response.message,
            });
        }
        Ok(response)
    }
}

impl SubCategoryResponse {
    pub fn from_json(raw: &str) -> Result<Self> {
        let response: SubCategoryResponse = serde_json::from_str(raw)?;
        if !response.status {
            return Err(ClientError::MalformedResponse {
                message: response.message,
            });
        }
        Ok(response)
    }
}

/// products listing request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductQuery {
    pub page: u32,
    pub limit: u32,
    pub sub_category: Option<u64>,
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
            sub_category: None,
        }
    }
}

impl ProductQuery {
    pub fn with_sub_category(mut self, sub_category: Option<u64>) -> Self {
        self.sub_category = sub_category;
        self
    }

    /// same filter, following page
    pub fn next(self, pagination: &Pagination) -> Option<Self> {
        pagination.next_page().map(|page| Self { page, ..self })
    }

    pub fn path(&self) -> String {
        merged_query_param_url(
            "/products",
            &[
                ("page", Some(self.page.to_string())),
                ("limit", Some(self.limit.to_string())),
                // a zero id means "all"
                ("sub_category", self.sub_category.filter(|id| *id != 0).map(|id| id.to_string())),
            ],
        )
    }
}

fn leading_integer(text: &str) -> u32 {
    let digits: String = text
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(0)
}

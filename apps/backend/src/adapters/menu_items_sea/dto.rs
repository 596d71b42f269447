//! DTOs for menu_items_sea adapter.

#[derive(Debug, Clone)]
pub struct MenuItemCreate {
    pub restaurant_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub category: Option<String>,
    pub is_available: bool,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct MenuItemUpdate {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub price_cents: Option<i64>,
    pub category: Option<Option<String>>,
    pub is_available: Option<bool>,
    pub image_url: Option<Option<String>>,
}

/// favorites persisted to a directory
use property_kpr_rs::{
    ClientConfig, FavoriteProperty, FavoritesStore, FileStore, ProductResponse, SafeTimeProvider,
    TimeSource,
};

const PAGE: &str = r#"{
    "code": 200, "status": true, "message": "ok",
    "results": {
        "current_page": 1, "last_page": 1, "per_page": 10, "total": 1,
        "from": 1, "to": 1, "next_page_url": null, "prev_page_url": null,
        "data": [{
            "id": 12, "contract_id": null, "staff_id": "1", "category_id": "1",
            "title": "Rumah Asri Bogor", "slug": "rumah-asri-bogor",
            "address": "Jl. Pajajaran 10, Bogor", "description": null, "status": 1,
            "price": 650000000, "bedrooms": 3, "bathrooms": 2, "building_area": "95 m2",
            "electricity": null, "longitude": null, "latitude": null,
            "created_at": "2024-10-11T08:00:00Z", "updated_at": "2024-10-11T08:00:00Z",
            "staff": null, "category": {"id": 1, "name": "Rumah", "slug": "rumah", "status": true}
        }]
    }
}"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = ClientConfig::default();
    let time = SafeTimeProvider::new(TimeSource::System);
    let dir = std::env::temp_dir().join("property-kpr-demo");

    let page = ProductResponse::from_json(PAGE)?;
    let mut favorites = FavoritesStore::open(FileStore::open(&dir)?, &config.storage_keys)?;
    for product in &page.results.data {
        favorites.toggle(FavoriteProperty::from_product(product), &time)?;
    }

    let ids: Vec<String> = favorites.list().iter().map(|f| f.id.clone()).collect();
    match favorites.share_message(&ids) {
        Some(message) => println!("{}", message),
        None => println!("no favorites saved (run again to add)"),
    }
    println!("state kept in {}", dir.display());

    Ok(())
}

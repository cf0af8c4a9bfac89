//! Demo catalog: four categories and four frames.
//!
//! Seeding upserts by id, so running it twice leaves one copy of each row.

use anyhow::Result;
use tracing::info;

use stylist_core::models::Product;

use crate::sqlite_store::SqliteStore;

pub const CATEGORIES: &[(&str, &str)] = &[
    ("Casual", "Kính mắt phong cách thường ngày"),
    ("Formal", "Kính mắt phong cách công sở, lịch sự"),
    ("Sport", "Kính mắt thể thao"),
    ("Fashion", "Kính mắt thời trang"),
];

struct SeedProduct {
    id: &'static str,
    sku: &'static str,
    name: &'static str,
    price: i64,
    description: &'static str,
    style: &'static str,
    material: &'static str,
    face_shapes: &'static str,
    category: &'static str,
    keywords: &'static str,
}

const PRODUCTS: &[SeedProduct] = &[
    SeedProduct {
        id: "model1",
        sku: "rayban_wayfarer_black",
        name: "Rayban Wayfarer",
        price: 250_000,
        description: "Kính mắt Rayban Wayfarer màu đen cổ điển",
        style: "Square",
        material: "Plastic",
        face_shapes: "Round,Oval",
        category: "Casual",
        keywords: "rayban,wayfarer,black,casual,classic",
    },
    SeedProduct {
        id: "model2",
        sku: "rayban_round_cuivre_pinkBrownDegrade",
        name: "Rayban Round",
        price: 300_000,
        description: "Kính mắt Rayban Round màu đồng với tròng kính hồng nâu",
        style: "Round",
        material: "Metal",
        face_shapes: "Square,Heart",
        category: "Fashion",
        keywords: "rayban,round,pink,brown,fashion,metal",
    },
    SeedProduct {
        id: "model3",
        sku: "oakley_holbrook_matte_black",
        name: "Oakley Holbrook",
        price: 350_000,
        description: "Kính mắt Oakley Holbrook màu đen mờ cho hoạt động thể thao",
        style: "Square",
        material: "Plastic",
        face_shapes: "Round,Oval",
        category: "Sport",
        keywords: "oakley,holbrook,black,sport,active",
    },
    SeedProduct {
        id: "model4",
        sku: "persol_649_havana",
        name: "Persol 649",
        price: 400_000,
        description: "Kính mắt Persol 649 màu Havana sang trọng",
        style: "Aviator",
        material: "Acetate",
        face_shapes: "Square,Oval",
        category: "Formal",
        keywords: "persol,649,havana,formal,luxury",
    },
];

impl SeedProduct {
    fn to_product(&self) -> Product {
        Product {
            id: self.id.to_string(),
            sku: self.sku.to_string(),
            name: self.name.to_string(),
            price: self.price,
            description: Some(self.description.to_string()),
            category: Some(self.category.to_string()),
            style: Some(self.style.to_string()),
            material: Some(self.material.to_string()),
            face_shape_recommendation: Some(self.face_shapes.to_string()),
            keywords: Some(self.keywords.to_string()),
            image_url: Some(format!("https://example.com/images/{}.jpg", self.sku)),
            is_available: true,
            deleted_at: None,
        }
    }
}

/// The demo products, in catalog order.
pub fn demo_products() -> Vec<Product> {
    PRODUCTS.iter().map(SeedProduct::to_product).collect()
}

/// Upsert the demo categories and products. Returns the product count.
pub async fn seed(store: &SqliteStore) -> Result<usize> {
    for (name, description) in CATEGORIES {
        store.ensure_category(name, Some(description)).await?;
    }
    let products = demo_products();
    for product in &products {
        store.upsert_product(product).await?;
    }
    info!(products = products.len(), "seeded demo catalog");
    Ok(products.len())
}

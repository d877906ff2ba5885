//! Catalog seeding for development environments.

use rust_decimal::Decimal;
use sqlx::PgPool;

use super::CommandError;

struct SeedProduct {
    name: &'static str,
    brand: &'static str,
    price: Decimal,
    short_description: &'static str,
    long_description: &'static str,
    stock: i32,
    category: &'static str,
}

fn sample_products() -> Vec<SeedProduct> {
    vec![
        SeedProduct {
            name: "Stoneware Mug",
            brand: "Kiln & Co",
            price: Decimal::new(24_99, 2),
            short_description: "Hand-glazed 350ml mug",
            long_description: "A hand-glazed stoneware mug that keeps coffee warm \
                and survives the dishwasher.",
            stock: 120,
            category: "kitchen",
        },
        SeedProduct {
            name: "Linen Throw",
            brand: "North Loom",
            price: Decimal::new(89_00, 2),
            short_description: "Washed linen throw, 130x170cm",
            long_description: "Stonewashed linen throw in natural flax. Gets softer \
                with every wash.",
            stock: 40,
            category: "living",
        },
        SeedProduct {
            name: "Cast Iron Skillet",
            brand: "Hearth",
            price: Decimal::new(64_50, 2),
            short_description: "26cm pre-seasoned skillet",
            long_description: "Pre-seasoned cast iron skillet. Oven safe, induction \
                ready, built to outlive its owner.",
            stock: 75,
            category: "kitchen",
        },
        SeedProduct {
            name: "Desk Lamp",
            brand: "Lumen Works",
            price: Decimal::new(129_00, 2),
            short_description: "Adjustable brass desk lamp",
            long_description: "Solid brass desk lamp with a dimmable warm LED and a \
                weighted base.",
            stock: 25,
            category: "lighting",
        },
        SeedProduct {
            name: "Canvas Tote",
            brand: "Field Supply",
            price: Decimal::new(34_00, 2),
            short_description: "Heavy canvas tote bag",
            long_description: "18oz waxed canvas tote with leather handles and an \
                interior pocket.",
            stock: 200,
            category: "accessories",
        },
    ]
}

/// Seed the catalog with sample products. Skips products whose name already
/// exists so the command can be re-run.
///
/// # Errors
///
/// Returns an error if the database is unreachable or an insert fails.
pub async fn run() -> Result<(), CommandError> {
    let pool = super::connect().await?;

    let mut inserted = 0_u32;
    for product in sample_products() {
        if insert_if_missing(&pool, &product).await? {
            inserted += 1;
        }
    }

    tracing::info!(inserted, "Seeding complete");
    Ok(())
}

async fn insert_if_missing(pool: &PgPool, product: &SeedProduct) -> Result<bool, CommandError> {
    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM products WHERE name = $1 AND brand = $2)",
    )
    .bind(product.name)
    .bind(product.brand)
    .fetch_one(pool)
    .await?;

    if exists {
        tracing::debug!(name = product.name, "Already seeded, skipping");
        return Ok(false);
    }

    let image = format!(
        "https://cdn.clover.market/seed/{}.jpg",
        product.name.to_lowercase().replace(' ', "-")
    );

    sqlx::query(
        "INSERT INTO products
             (name, brand, price, short_description, long_description,
              stock, category, cover_image, other_images)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
    )
    .bind(product.name)
    .bind(product.brand)
    .bind(product.price)
    .bind(product.short_description)
    .bind(product.long_description)
    .bind(product.stock)
    .bind(product.category)
    .bind(&image)
    .bind(vec![image.clone()])
    .execute(pool)
    .await?;

    Ok(true)
}

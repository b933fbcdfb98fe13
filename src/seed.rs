use dotenvy::dotenv;
use sqlx::PgPool;

struct SeedProduct {
    id: i32,
    name: &'static str,
    price: f64,
    description: &'static str,
    image_url: &'static str,
}

struct SeedCustomer {
    id: i32,
    name: &'static str,
    email: &'static str,
    password: &'static str,
}

fn get_seed_data() -> (Vec<SeedProduct>, Vec<SeedCustomer>) {
    let products = vec![
        SeedProduct {
            id: 1,
            name: "Espresso Cup",
            price: 12.50,
            description: "Porcelain cup, 80ml",
            image_url: "https://cdn.example.com/img/espresso-cup.jpg",
        },
        SeedProduct {
            id: 2,
            name: "French Press",
            price: 29.90,
            description: "Borosilicate glass, 1l",
            image_url: "https://cdn.example.com/img/french-press.jpg",
        },
        SeedProduct {
            id: 3,
            name: "Moka Pot",
            price: 34.00,
            description: "Aluminium stovetop brewer, 6 cups",
            image_url: "https://cdn.example.com/img/moka-pot.jpg",
        },
        SeedProduct {
            id: 4,
            name: "Hand Grinder",
            price: 45.00,
            description: "Ceramic burr grinder",
            image_url: "https://cdn.example.com/img/hand-grinder.jpg",
        },
        SeedProduct {
            id: 5,
            name: "Filter Papers",
            price: 4.25,
            description: "Pack of 100, size 02",
            image_url: "https://cdn.example.com/img/filter-papers.jpg",
        },
    ];

    let customers = vec![
        SeedCustomer {
            id: 1,
            name: "Ada Bergmann",
            email: "ada.bergmann@example.com",
            password: "not-a-real-password",
        },
        SeedCustomer {
            id: 2,
            name: "Joao Silva",
            email: "joao.silva@example.com",
            password: "not-a-real-password",
        },
        SeedCustomer {
            id: 3,
            name: "Mei Tanaka",
            email: "mei.tanaka@example.com",
            password: "not-a-real-password",
        },
    ];

    (products, customers)
}

async fn seed_database(pool: &PgPool) -> Result<(), sqlx::Error> {
    let (products, customers) = get_seed_data();

    for product in products {
        sqlx::query(
            "INSERT INTO products (id, name, price, description, image_url)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (id) DO NOTHING",
        )
        .bind(product.id)
        .bind(product.name)
        .bind(product.price)
        .bind(product.description)
        .bind(product.image_url)
        .execute(pool)
        .await?;
    }

    for customer in customers {
        sqlx::query(
            "INSERT INTO customers (id, name, email, password)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (id) DO NOTHING",
        )
        .bind(customer.id)
        .bind(customer.name)
        .bind(customer.email)
        .bind(customer.password)
        .execute(pool)
        .await?;
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    dotenv().ok();
    let database_url = std::env::var("DATABASE_URL")?;
    let pool = PgPool::connect(&database_url).await?;
    seed_database(&pool).await?;
    println!("Seeded sample catalog and customers");
    Ok(())
}

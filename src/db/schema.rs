//! SQL DDL and seed rows for the inventory database (SQLite).

/// Items with a quantity strictly below this count as low stock.
pub const LOW_STOCK_THRESHOLD: i64 = 10;

/// Username of the account seeded alongside the `users` table.
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";

pub const USERS_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT UNIQUE NOT NULL,
    password TEXT NOT NULL
)
"#;

pub const STOCK_ITEMS_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS stock_items (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    quantity INTEGER NOT NULL DEFAULT 0,
    price REAL NOT NULL DEFAULT 0,
    description TEXT NULL,
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
)
"#;

/// A row inserted into `stock_items` when the table is first created.
#[derive(Debug, Clone, Copy)]
pub struct SampleItem {
    pub name: &'static str,
    pub quantity: i64,
    pub price: f64,
    pub description: &'static str,
}

pub const SAMPLE_ITEMS: [SampleItem; 5] = [
    SampleItem {
        name: "Laptop",
        quantity: 15,
        price: 999.99,
        description: "14-inch business laptop",
    },
    SampleItem {
        name: "Wireless Mouse",
        quantity: 50,
        price: 25.50,
        description: "2.4 GHz ergonomic mouse",
    },
    SampleItem {
        name: "USB-C Cable",
        quantity: 5,
        price: 12.99,
        description: "1 m braided charging cable",
    },
    SampleItem {
        name: "Monitor",
        quantity: 8,
        price: 249.00,
        description: "27-inch IPS display",
    },
    SampleItem {
        name: "Keyboard",
        quantity: 30,
        price: 45.00,
        description: "Mechanical keyboard, US layout",
    },
];

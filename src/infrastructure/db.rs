use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};

pub async fn init_db(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(database_url).await?;

    // Run migrations manually (simple SQL)
    run_migrations(&db).await?;

    Ok(db)
}

/// Schema statements, applied in order. Every statement is idempotent.
/// Money columns hold canonical decimal strings; dates are `YYYY-MM-DD`
/// and timestamps `YYYY-MM-DD HH:MM:SS`.
const MIGRATIONS: &[&str] = &[
    // Catalog
    r#"
    CREATE TABLE IF NOT EXISTS tours (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        description TEXT,
        schedule_description TEXT,
        price TEXT NOT NULL DEFAULT '0',
        duration INTEGER,
        image_url TEXT,
        min_pax INTEGER,
        max_pax INTEGER,
        rating REAL NOT NULL DEFAULT 0,
        featured INTEGER NOT NULL DEFAULT 0,
        youtube_url TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS tour_attributes (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        tour_id INTEGER NOT NULL,
        kind TEXT NOT NULL,
        value TEXT NOT NULL,
        FOREIGN KEY (tour_id) REFERENCES tours(id) ON DELETE CASCADE
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_tour_attributes_tour ON tour_attributes(tour_id, kind)",
    r#"
    CREATE TABLE IF NOT EXISTS categories (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        description TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS tour_categories (
        tour_id INTEGER NOT NULL,
        category_id INTEGER NOT NULL,
        PRIMARY KEY (tour_id, category_id),
        FOREIGN KEY (tour_id) REFERENCES tours(id) ON DELETE CASCADE,
        FOREIGN KEY (category_id) REFERENCES categories(id) ON DELETE CASCADE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS tour_pricing (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        tour_id INTEGER NOT NULL,
        customer_type TEXT NOT NULL,
        price TEXT NOT NULL,
        round_trip INTEGER NOT NULL DEFAULT 0,
        FOREIGN KEY (tour_id) REFERENCES tours(id) ON DELETE CASCADE
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_tour_pricing_tour ON tour_pricing(tour_id)",
    r#"
    CREATE TABLE IF NOT EXISTS additional_services (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        description TEXT,
        price TEXT NOT NULL DEFAULT '0',
        price_unit TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS tour_additional_services (
        tour_id INTEGER NOT NULL,
        additional_service_id INTEGER NOT NULL,
        PRIMARY KEY (tour_id, additional_service_id),
        FOREIGN KEY (tour_id) REFERENCES tours(id) ON DELETE CASCADE,
        FOREIGN KEY (additional_service_id) REFERENCES additional_services(id) ON DELETE CASCADE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS tour_reviews (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        tour_id INTEGER NOT NULL,
        platform TEXT,
        rating REAL NOT NULL DEFAULT 0,
        comment TEXT,
        reviewer_name TEXT,
        review_date TEXT NOT NULL,
        FOREIGN KEY (tour_id) REFERENCES tours(id) ON DELETE CASCADE
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_tour_reviews_tour ON tour_reviews(tour_id)",
    // Bookings
    r#"
    CREATE TABLE IF NOT EXISTS bookings (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        tour_id INTEGER NOT NULL,
        customer_name TEXT NOT NULL,
        customer_email TEXT NOT NULL,
        departure_date TEXT NOT NULL,
        end_date TEXT,
        pickup_location TEXT,
        pickup_address TEXT,
        total_price TEXT NOT NULL,
        booking_time TEXT NOT NULL,
        status TEXT NOT NULL DEFAULT 'PENDING',
        payment_id TEXT,
        whatsapp_number TEXT,
        note_for_meetup TEXT,
        FOREIGN KEY (tour_id) REFERENCES tours(id)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_bookings_email ON bookings(customer_email)",
    "CREATE INDEX IF NOT EXISTS idx_bookings_status_time ON bookings(status, booking_time)",
    r#"
    CREATE TABLE IF NOT EXISTS booking_pricing_options (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        booking_id INTEGER NOT NULL,
        pricing_option_id INTEGER NOT NULL,
        customer_type TEXT NOT NULL,
        round_trip INTEGER NOT NULL DEFAULT 0,
        quantity INTEGER NOT NULL,
        price TEXT NOT NULL,
        subtotal TEXT NOT NULL,
        FOREIGN KEY (booking_id) REFERENCES bookings(id) ON DELETE CASCADE
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_booking_pricing_options_booking ON booking_pricing_options(booking_id)",
    r#"
    CREATE TABLE IF NOT EXISTS booking_additional_services (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        booking_id INTEGER NOT NULL,
        additional_service_id INTEGER,
        service_name TEXT NOT NULL,
        service_type TEXT,
        price TEXT NOT NULL,
        quantity INTEGER NOT NULL,
        subtotal TEXT NOT NULL,
        FOREIGN KEY (booking_id) REFERENCES bookings(id) ON DELETE CASCADE,
        FOREIGN KEY (additional_service_id) REFERENCES additional_services(id) ON DELETE SET NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_booking_additional_services_booking ON booking_additional_services(booking_id)",
    r#"
    CREATE TABLE IF NOT EXISTS payments (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        booking_id INTEGER NOT NULL,
        payment_method TEXT NOT NULL,
        transaction_id TEXT,
        amount TEXT NOT NULL,
        currency TEXT NOT NULL,
        payment_status TEXT NOT NULL DEFAULT 'PENDING',
        payment_time TEXT,
        FOREIGN KEY (booking_id) REFERENCES bookings(id) ON DELETE CASCADE
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_payments_booking ON payments(booking_id)",
    // Accounts
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        email TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        full_name TEXT NOT NULL,
        phone_number TEXT,
        role TEXT NOT NULL DEFAULT 'USER',
        created_at TEXT NOT NULL
    )
    "#,
];

async fn run_migrations(db: &DatabaseConnection) -> Result<(), DbErr> {
    for sql in MIGRATIONS {
        db.execute(Statement::from_string(
            db.get_database_backend(),
            sql.to_string(),
        ))
        .await?;
    }

    tracing::debug!("Applied {} schema statements", MIGRATIONS.len());
    Ok(())
}

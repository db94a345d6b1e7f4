use actix_cors::Cors;
use actix_session::config::PersistentSession;
use actix_session::storage::CookieSessionStore;
use actix_session::SessionMiddleware;
use actix_web::cookie::Key;
use actix_web::{cookie, http};
use std::sync::Arc;
use std::{env, fs};
use toml::Value;

use crate::constants::VIEWER_ID_KEY;
use crate::db::{DesignStore, SqliteDesignStore};
use crate::services::generator::{DesignGenerator, StaticGenerator};

#[derive(Clone)]
pub struct App {
    pub config: Value,
    pub store: Arc<dyn DesignStore>,
    pub generator: Arc<dyn DesignGenerator>,
}

impl App {
    pub fn new() -> Self {
        dotenv::dotenv().ok();

        let env = env::var("ENV").expect("ENV must be set");
        let config_file = format!("config.{}.toml", env);

        let contents = fs::read_to_string(config_file).expect("Unable to read file");
        let config = contents.parse::<Value>().expect("Unable to parse TOML");
        let store = open_design_store(&config);

        Self {
            config,
            store,
            generator: Arc::new(StaticGenerator::default()),
        }
    }

    pub fn with_resources(
        config: Value,
        store: Arc<dyn DesignStore>,
        generator: Arc<dyn DesignGenerator>,
    ) -> Self {
        Self {
            config,
            store,
            generator,
        }
    }
}

pub fn open_design_store(config: &Value) -> Arc<dyn DesignStore> {
    let database_url = config["database_url"]
        .as_str()
        .expect("Missing database_url");

    let store = SqliteDesignStore::open(database_url)
        .unwrap_or_else(|e| panic!("Unable to open database {}.\n{}", database_url, e));

    Arc::new(store)
}

pub fn get_cors(app: &App) -> Cors {
    let allowed_origin = app.config["allowed_origin"]
        .as_str()
        .expect("Missing allowed_origin")
        .to_string();

    Cors::default()
        .allowed_origin(allowed_origin.as_str())
        .supports_credentials()
        .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
        .allowed_headers(vec![
            http::header::AUTHORIZATION,
            http::header::ACCEPT,
            http::header::ORIGIN,
            http::header::USER_AGENT,
            http::header::DNT,
            http::header::CONTENT_TYPE,
            http::header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
        ])
        .expose_headers(vec![
            http::header::LOCATION,
            http::header::ACCESS_CONTROL_ALLOW_ORIGIN,
        ])
        .max_age(86400)
}

pub fn get_port(app: &App) -> u16 {
    app.config["port"].as_integer().expect("Missing port") as u16
}

pub fn get_secret_key(app: &App) -> Key {
    let secret_key = app.config["secret_key"]
        .as_str()
        .expect("Missing secret_key")
        .to_string();

    Key::from(secret_key.as_ref())
}

pub fn get_session_middleware(app: &App) -> SessionMiddleware<CookieSessionStore> {
    let secret_key = get_secret_key(app);
    let expiration = app.config["session_expiration_in_days"]
        .as_integer()
        .expect("Missing session_expiration");
    let ttl = PersistentSession::default().session_ttl(cookie::time::Duration::days(expiration));

    SessionMiddleware::builder(CookieSessionStore::default(), secret_key)
        .cookie_name(VIEWER_ID_KEY.to_string())
        .session_lifecycle(ttl)
        .cookie_secure(false)
        .build()
}
